//! HTTP adapters - REST API implementations.
//!
//! One sub-module per resource, each with its DTOs, handlers, and routes.
//! They share [`AppState`] and map failures through [`ApiError`].

pub mod booking;
pub mod catalog;
mod error;
mod extract;
pub mod payment;
mod router;
mod state;

pub use error::{ApiError, ErrorResponse};
pub use extract::{OptionalUser, USER_ID_HEADER};
pub use router::{api_routes, router};
pub use state::{AppState, WebhookSettings};
