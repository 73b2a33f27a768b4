use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use crate::error::AppError;
use crate::models::SendEmailRequest;
use crate::outreach::{OutreachResult, PendingResendInfo};
use crate::state::AppState;

pub const NO_NEW_RECIPIENTS_MESSAGE: &str =
    "No new recipients to send emails to. All recipients have already been contacted.";

pub fn outreach_routes() -> Router<AppState> {
    Router::new()
        .route("/send-email", post(send_email))
        .route("/resends", get(list_resends))
}

/// POST /api/send-email - Send outreach emails to a list of recipients.
///
/// Pre-flight problems, malformed bodies included, answer 400. Once dispatch starts the answer is 200
/// and each recipient's status is in `results`.
async fn send_email(
    State(state): State<AppState>,
    payload: Result<Json<SendEmailRequest>, JsonRejection>,
) -> Response {
    let result = match payload {
        Ok(Json(request)) => state.outreach.send(&request).await,
        Err(rejection) => Err(AppError::Validation(rejection.body_text())),
    };

    match result {
        Ok(OutreachResult::NoNewRecipients { suppressed }) => (
            StatusCode::OK,
            Json(json!({
                "message": NO_NEW_RECIPIENTS_MESSAGE,
                "suppressed": suppressed,
            })),
        )
            .into_response(),
        Ok(OutreachResult::Dispatched {
            outcomes,
            rejected,
            suppressed,
        }) => {
            let sent = outcomes.iter().filter(|o| o.is_sent()).count();
            (
                StatusCode::OK,
                Json(json!({
                    "message": format!("Processed {} recipient(s), {} sent", outcomes.len(), sent),
                    "results": outcomes,
                    "rejected": rejected,
                    "suppressed": suppressed,
                })),
            )
                .into_response()
        }
        Err(e @ (AppError::Validation(_) | AppError::NoValidRecipients)) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": e.to_string() })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Send-email request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "message": "Failed to send emails",
                    "error": e.to_string(),
                })),
            )
                .into_response()
        }
    }
}

/// GET /api/resends - Delayed resends that have not fired yet
async fn list_resends(State(state): State<AppState>) -> Json<Vec<PendingResendInfo>> {
    Json(state.outreach.scheduler().pending())
}
