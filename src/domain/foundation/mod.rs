//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, money helpers, the timestamp value object, and the
//! error types that form the vocabulary of the booking domain.

mod errors;
mod ids;
mod money;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{BookingId, ClassOccurrenceId, UserId};
pub use money::{to_major_units, to_minor_units, CurrencyCode};
pub use timestamp::Timestamp;
