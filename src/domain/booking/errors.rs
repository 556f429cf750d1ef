//! Booking-specific error types.

use thiserror::Error;

use crate::domain::foundation::{ClassOccurrenceId, DomainError, ErrorCode, ValidationError};

use super::BookingStatus;

/// Why a class falls outside the bookable window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowViolation {
    /// The class has already started.
    Past,
    /// The class starts after the booking horizon.
    BeyondHorizon { horizon_days: u32 },
}

impl std::fmt::Display for WindowViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WindowViolation::Past => write!(f, "Cannot book past classes"),
            WindowViolation::BeyondHorizon { horizon_days } if *horizon_days % 7 == 0 => {
                let weeks = horizon_days / 7;
                let unit = if weeks == 1 { "week" } else { "weeks" };
                write!(f, "Cannot book classes more than {} {} in advance", weeks, unit)
            }
            WindowViolation::BeyondHorizon { horizon_days } => {
                write!(f, "Cannot book classes more than {} days in advance", horizon_days)
            }
        }
    }
}

/// Errors raised while creating, confirming, or transitioning bookings.
#[derive(Debug, Clone, Error)]
pub enum BookingError {
    #[error("Booking not found: {0}")]
    NotFound(String),

    #[error("Class occurrence not found")]
    ClassNotFound(ClassOccurrenceId),

    #[error("{0}")]
    InvalidWindow(WindowViolation),

    #[error("Class is fully booked")]
    ClassFull { class_id: ClassOccurrenceId },

    #[error("Cannot move booking from {from} to {to}")]
    InvalidTransition { from: BookingStatus, to: BookingStatus },

    #[error("Payment has not completed for session {session_id}")]
    PaymentIncomplete { session_id: String },

    /// The payment provider could not open or read a checkout session.
    /// Details are logged; callers only see a generic message.
    #[error("Could not create checkout session")]
    PaymentSession { reason: String, retryable: bool },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Infrastructure(DomainError),
}

impl BookingError {
    pub fn not_found(id: impl std::fmt::Display) -> Self {
        BookingError::NotFound(id.to_string())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            BookingError::NotFound(_) => ErrorCode::BookingNotFound,
            BookingError::ClassNotFound(_) => ErrorCode::ClassNotFound,
            BookingError::InvalidWindow(_) => ErrorCode::InvalidWindow,
            BookingError::ClassFull { .. } => ErrorCode::ClassFull,
            BookingError::InvalidTransition { .. } => ErrorCode::InvalidStateTransition,
            BookingError::PaymentIncomplete { .. } => ErrorCode::Conflict,
            BookingError::PaymentSession { .. } => ErrorCode::PaymentSessionFailed,
            BookingError::Validation(_) => ErrorCode::ValidationFailed,
            BookingError::Infrastructure(e) => e.code,
        }
    }
}

impl From<DomainError> for BookingError {
    fn from(err: DomainError) -> Self {
        BookingError::Infrastructure(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fourteen_day_horizon_reads_as_two_weeks() {
        let err = BookingError::InvalidWindow(WindowViolation::BeyondHorizon { horizon_days: 14 });
        assert_eq!(err.to_string(), "Cannot book classes more than 2 weeks in advance");
    }

    #[test]
    fn odd_horizon_reads_in_days() {
        let v = WindowViolation::BeyondHorizon { horizon_days: 10 };
        assert_eq!(v.to_string(), "Cannot book classes more than 10 days in advance");
        let v = WindowViolation::BeyondHorizon { horizon_days: 7 };
        assert_eq!(v.to_string(), "Cannot book classes more than 1 week in advance");
    }

    #[test]
    fn past_message() {
        assert_eq!(
            BookingError::InvalidWindow(WindowViolation::Past).to_string(),
            "Cannot book past classes"
        );
    }

    #[test]
    fn payment_session_hides_provider_detail() {
        let err = BookingError::PaymentSession {
            reason: "api key rejected".to_string(),
            retryable: false,
        };
        assert_eq!(err.to_string(), "Could not create checkout session");
        assert_eq!(err.code(), ErrorCode::PaymentSessionFailed);
    }

    #[test]
    fn codes_follow_variants() {
        assert_eq!(
            BookingError::ClassNotFound(ClassOccurrenceId::new()).code(),
            ErrorCode::ClassNotFound
        );
        assert_eq!(
            BookingError::ClassFull { class_id: ClassOccurrenceId::new() }.code(),
            ErrorCode::ClassFull
        );
        let db = DomainError::new(ErrorCode::DatabaseError, "down");
        assert_eq!(BookingError::from(db).code(), ErrorCode::DatabaseError);
    }
}
