use axum::{extract::State, routing::get, Json, Router};

use crate::error::Result;
use crate::models::Currency;
use crate::state::AppState;

pub fn currency_routes() -> Router<AppState> {
    Router::new().route("/currencies", get(list_currencies))
}

/// GET /api/currencies - Full donation currency catalog
async fn list_currencies(State(state): State<AppState>) -> Result<Json<Vec<Currency>>> {
    let currencies = state.store.list_currencies().await?;
    Ok(Json(currencies))
}
