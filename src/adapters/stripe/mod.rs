//! Stripe payment provider adapter.
//!
//! Implements the `PaymentProvider` port for Stripe Checkout. Webhook
//! signature verification lives in `domain::payment` so that it can be
//! tested without HTTP.
//!
//! # Configuration
//!
//! - `DANCE_BOOKING__PAYMENT__STRIPE_API_KEY`: Stripe secret API key

mod mock_payment_provider;
mod stripe_adapter;

pub use mock_payment_provider::{MethodCall, MockPaymentProvider};
pub use stripe_adapter::{StripeConfig, StripePaymentAdapter, DEFAULT_API_BASE_URL};
