use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use crate::error::{AppError, Result};
use crate::models::{CreateDonationRequest, Donation};
use crate::state::AppState;

pub fn donation_routes() -> Router<AppState> {
    Router::new()
        .route("/donation", post(create_donation))
        .route("/donations", get(list_donations))
}

async fn store_donation(
    state: &AppState,
    payload: std::result::Result<Json<CreateDonationRequest>, JsonRejection>,
) -> Result<Donation> {
    let Json(request) = payload.map_err(|r| AppError::Validation(r.body_text()))?;
    let donation = Donation::from_request(request)?;
    state.store.create_donation(&donation).await?;
    Ok(donation)
}

/// POST /api/donation - Record a donation.
/// Any failure, malformed bodies and validation included, is answered with 500 and `success: false`.
async fn create_donation(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CreateDonationRequest>, JsonRejection>,
) -> Response {
    match store_donation(&state, payload).await {
        Ok(donation) => (
            StatusCode::CREATED,
            Json(json!({ "success": true, "donation": donation })),
        )
            .into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "Donation rejected");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

#[derive(serde::Deserialize)]
struct ListDonationsQuery {
    limit: Option<usize>,
}

/// GET /api/donations - Most recent donations
async fn list_donations(
    State(state): State<AppState>,
    Query(query): Query<ListDonationsQuery>,
) -> Result<Json<Vec<Donation>>> {
    let limit = query.limit.unwrap_or(20).min(100);
    let donations = state.store.list_donations(limit).await?;
    Ok(Json(donations))
}
