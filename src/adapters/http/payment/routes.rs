//! Axum router for payment endpoints.

use axum::routing::{get, post};
use axum::Router;

use super::super::state::AppState;
use super::handlers::{create_payment_session, get_payment_session, handle_payment_webhook};

/// Routes mounted at `/api/payment-sessions`.
pub fn payment_session_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_payment_session))
        .route("/:id", get(get_payment_session))
}

/// Webhook endpoints, mounted at `/api`.
///
/// `/stripe/webhook` is kept as an alias for dashboards configured
/// against the old path.
pub fn webhook_routes() -> Router<AppState> {
    Router::new()
        .route("/payment-webhook", post(handle_payment_webhook))
        .route("/stripe/webhook", post(handle_payment_webhook))
}
