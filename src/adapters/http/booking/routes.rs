//! Axum router for booking endpoints.

use axum::routing::{get, post};
use axum::Router;

use super::super::state::AppState;
use super::handlers::{confirm_booking, create_booking, get_booking};

/// Routes mounted at `/api/bookings`.
pub fn booking_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_booking))
        .route("/:id", get(get_booking))
        .route("/:id/confirm", post(confirm_booking))
}
