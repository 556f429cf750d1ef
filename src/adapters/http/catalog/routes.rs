//! Axum router for class catalog endpoints.

use axum::routing::get;
use axum::Router;

use super::super::state::AppState;
use super::handlers::{create_class, get_class, list_classes, update_class};

/// Routes mounted at `/api/classes`.
///
/// `GET /:id` accepts a UUID or a slug; `PATCH /:id` needs the UUID.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_classes).post(create_class))
        .route("/:id", get(get_class).patch(update_class))
}
