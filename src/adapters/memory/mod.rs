//! In-memory repositories.
//!
//! Used by tests and by the binary when no database is configured. They
//! enforce the same uniqueness rules as the Postgres schema: unique slugs,
//! unique payment references, and one record per webhook event id.

mod booking_repository;
mod class_occurrence_repository;
mod webhook_event_repository;

pub use booking_repository::InMemoryBookingRepository;
pub use class_occurrence_repository::InMemoryClassOccurrenceRepository;
pub use webhook_event_repository::InMemoryWebhookEventRepository;
