//! Top-level router.

use axum::routing::get;
use axum::Router;

use super::booking::booking_routes;
use super::catalog::catalog_routes;
use super::payment::{payment_session_routes, webhook_routes};
use super::state::AppState;

/// All `/api` routes, before state is attached.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/classes", catalog_routes())
        .nest("/bookings", booking_routes())
        .nest("/payment-sessions", payment_session_routes())
        .merge(webhook_routes())
}

/// The full application: `/health` plus everything under `/api`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api", api_routes())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
