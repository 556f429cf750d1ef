//! HTTP adapter for payments.
//!
//! - `POST /api/payment-sessions` - Open a Stripe Checkout session
//! - `GET /api/payment-sessions/:id` - Session status
//! - `POST /api/payment-webhook` - Stripe webhooks (signature verified)

pub mod dto;
mod handlers;
mod routes;

pub use handlers::SIGNATURE_HEADER;
pub use routes::{payment_session_routes, webhook_routes};
