//! Payments - checkout sessions and Stripe webhook reconciliation.

mod checkout;
pub mod metadata;
mod reconciler;
mod stripe_event;
mod webhook_errors;
mod webhook_processor;
mod webhook_verifier;

pub use checkout::{
    build_checkout_request, CheckoutMode, CheckoutOrder, CheckoutSettings, PRODUCT_NAME,
    SESSION_ID_PLACEHOLDER,
};
pub use metadata::CorrelationMetadata;
pub use reconciler::{
    BookingWebhookDispatcher, ChargeRefundedHandler, CheckoutCompletedHandler,
    CheckoutExpiredHandler, PaymentFailedHandler, PaymentSucceededHandler,
};
pub use stripe_event::{
    ChargeObject, CheckoutSessionObject, CustomerDetails, PaymentIntentObject, StripeEvent,
    StripeEventData, StripeEventType,
};
pub use webhook_errors::WebhookError;
pub use webhook_processor::{IdempotentWebhookProcessor, WebhookDispatcher, WebhookEventHandler};
pub use webhook_verifier::{
    signature_header, SignatureHeader, StripeWebhookVerifier, DEFAULT_TOLERANCE_SECS,
};
