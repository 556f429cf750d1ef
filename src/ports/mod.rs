//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Persistence Ports
//!
//! - `ClassOccurrenceRepository` - Class catalog
//! - `BookingRepository` - Bookings, unique by payment reference
//! - `WebhookEventRepository` - Stripe webhook idempotency tracking
//!
//! ## External Services
//!
//! - `PaymentProvider` - Checkout session creation and lookup
//! - `Clock` - Current time

mod booking_repository;
mod class_occurrence_repository;
mod clock;
mod payment_provider;
mod webhook_event_repository;

pub use booking_repository::BookingRepository;
pub use class_occurrence_repository::{ClassListFilter, ClassOccurrenceRepository};
pub use clock::{Clock, FixedClock, SystemClock};
pub use payment_provider::{
    CheckoutLineItem, CheckoutSession, CheckoutSessionRequest, PaymentError, PaymentErrorCode,
    PaymentProvider,
};
pub use webhook_event_repository::{
    SaveResult, WebhookEventRecord, WebhookEventRepository, WebhookOutcome, WebhookResult,
};
