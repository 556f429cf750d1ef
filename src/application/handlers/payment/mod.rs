//! Payment handlers.
//!
//! ## Commands
//! - Creating a checkout session for a class
//! - Processing Stripe webhook deliveries
//! - Pruning the webhook event log
//!
//! ## Queries
//! - Checkout session status

mod create_payment_session;
mod get_payment_session;
mod handle_payment_webhook;
mod prune_webhook_events;

// Commands
pub use create_payment_session::{
    CreatePaymentSessionCommand, CreatePaymentSessionHandler, CreatePaymentSessionResult,
};
pub use handle_payment_webhook::{
    HandlePaymentWebhookCommand, HandlePaymentWebhookHandler, HandlePaymentWebhookResult,
};
pub use prune_webhook_events::PruneWebhookEventsHandler;

// Queries
pub use get_payment_session::{GetPaymentSessionHandler, GetPaymentSessionQuery};
