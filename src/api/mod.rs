pub mod currencies;
pub mod donations;
pub mod health;
pub mod outreach;
pub mod password;

use axum::Router;

use crate::state::AppState;

/// Create the API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api", api_routes())
        .merge(health::health_routes())
        .with_state(state)
}

/// API routes
fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(currencies::currency_routes())
        .merge(donations::donation_routes())
        .merge(outreach::outreach_routes())
        .merge(password::password_routes())
}
