//! Webhook error types for Stripe webhook handling.
//!
//! Verification failures are rejected with 400. Everything that goes wrong
//! after a delivery has been authenticated is a business failure: it is
//! logged and recorded, and the delivery is still acknowledged.

use axum::http::StatusCode;
use thiserror::Error;

use crate::domain::booking::BookingError;
use crate::domain::foundation::DomainError;

/// Errors that occur during webhook processing.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// Webhook signature verification failed.
    #[error("Invalid signature")]
    InvalidSignature,

    /// Webhook timestamp is older than the tolerance window.
    #[error("Timestamp out of range")]
    TimestampOutOfRange,

    /// Event timestamp is in the future beyond clock skew tolerance.
    #[error("Invalid timestamp")]
    InvalidTimestamp,

    /// Failed to parse webhook payload or signature header.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Required metadata field missing from webhook event.
    #[error("Missing metadata: {0}")]
    MissingMetadata(&'static str),

    /// Required field missing from webhook payload.
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    #[error("Booking not found: {0}")]
    BookingNotFound(String),

    #[error("Class occurrence not found: {0}")]
    ClassNotFound(String),

    /// Attempted state transition is not valid.
    #[error("Invalid state transition: {0}")]
    InvalidTransition(String),

    /// Event was intentionally ignored (not an error condition).
    #[error("Event ignored: {0}")]
    Ignored(String),

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(String),
}

impl WebhookError {
    /// True for failures that mean the delivery could not be authenticated
    /// or read. These are the only errors surfaced to the sender.
    pub fn is_verification_failure(&self) -> bool {
        matches!(
            self,
            WebhookError::InvalidSignature
                | WebhookError::TimestampOutOfRange
                | WebhookError::InvalidTimestamp
                | WebhookError::ParseError(_)
        )
    }

    /// Returns true if the failure is likely transient.
    pub fn is_retryable(&self) -> bool {
        matches!(self, WebhookError::Database(_))
    }

    /// Maps the error to the HTTP status returned to Stripe.
    ///
    /// Business failures are acknowledged with 200 so the delivery is not
    /// retried against a state that will not change.
    pub fn status_code(&self) -> StatusCode {
        if self.is_verification_failure() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::OK
        }
    }
}

impl From<DomainError> for WebhookError {
    fn from(err: DomainError) -> Self {
        WebhookError::Database(err.to_string())
    }
}

impl From<BookingError> for WebhookError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::NotFound(id) => WebhookError::BookingNotFound(id),
            BookingError::ClassNotFound(id) => WebhookError::ClassNotFound(id.to_string()),
            BookingError::InvalidTransition { .. } => WebhookError::InvalidTransition(err.to_string()),
            BookingError::Infrastructure(e) => WebhookError::Database(e.to_string()),
            other => WebhookError::Ignored(other.to_string()),
        }
    }
}
