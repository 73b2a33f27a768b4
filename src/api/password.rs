use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use crate::error::AppError;
use crate::security::verify_password;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CheckPasswordRequest {
    pub password: Option<String>,
}

pub fn password_routes() -> Router<AppState> {
    Router::new().route("/check-password", post(check_password))
}

/// POST /api/check-password - Compare against the configured access password
async fn check_password(
    State(state): State<AppState>,
    Json(request): Json<CheckPasswordRequest>,
) -> Response {
    let Some(password) = request.password.filter(|p| !p.is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "valid": false, "error": "Password is required" })),
        )
            .into_response();
    };

    let Some(expected) = state.config.access_password.as_deref() else {
        return AppError::NotConfigured("ACCESS_PASSWORD is not set".to_string()).into_response();
    };

    if verify_password(&password, expected) {
        (StatusCode::OK, Json(json!({ "valid": true }))).into_response()
    } else {
        tracing::warn!("Password check failed");
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "valid": false, "error": "Invalid password" })),
        )
            .into_response()
    }
}
