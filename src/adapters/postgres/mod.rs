//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresClassOccurrenceRepository` - Class schedule with unique slugs
//! - `PostgresBookingRepository` - Bookings with unique payment references
//! - `PostgresWebhookEventRepository` - Processed Stripe event log
//!
//! Schema lives in `migrations/` and is applied at startup.

mod booking_repository;
mod class_occurrence_repository;
mod webhook_event_repository;

pub use booking_repository::PostgresBookingRepository;
pub use class_occurrence_repository::PostgresClassOccurrenceRepository;
pub use webhook_event_repository::PostgresWebhookEventRepository;
