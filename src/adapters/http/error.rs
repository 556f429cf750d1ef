//! API error type and JSON error body.
//!
//! Every handler returns `Result<_, ApiError>`. Module errors convert into it
//! with `?`, and `IntoResponse` picks the status code and public error code.
//! Infrastructure detail is logged, never returned.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::domain::booking::BookingError;
use crate::domain::catalog::CatalogError;
use crate::domain::foundation::{DomainError, ErrorCode, ValidationError};

/// Error body returned by every endpoint except the webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug)]
pub enum ApiError {
    Catalog(CatalogError),
    Booking(BookingError),
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        ApiError::Catalog(err)
    }
}

impl From<BookingError> for ApiError {
    fn from(err: BookingError) -> Self {
        ApiError::Booking(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Booking(BookingError::Validation(err))
    }
}

impl ApiError {
    /// Status, public code, and public message.
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            ApiError::Catalog(err) => match err {
                CatalogError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string()),
                CatalogError::SlugExhausted { .. } => {
                    (StatusCode::CONFLICT, "SLUG_EXHAUSTED", err.to_string())
                }
                CatalogError::InvalidTitle(_) | CatalogError::Validation(_) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_FAILED", err.to_string())
                }
                CatalogError::Infrastructure(inner) => infrastructure(inner),
            },
            ApiError::Booking(err) => match err {
                BookingError::NotFound(_) | BookingError::ClassNotFound(_) => {
                    (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string())
                }
                BookingError::InvalidWindow(_) => {
                    (StatusCode::BAD_REQUEST, "INVALID_WINDOW", err.to_string())
                }
                BookingError::ClassFull { .. } => {
                    (StatusCode::CONFLICT, "CLASS_FULL", err.to_string())
                }
                BookingError::InvalidTransition { .. } => {
                    (StatusCode::CONFLICT, "INVALID_STATE_TRANSITION", err.to_string())
                }
                BookingError::PaymentIncomplete { .. } => {
                    (StatusCode::CONFLICT, "PAYMENT_INCOMPLETE", err.to_string())
                }
                BookingError::PaymentSession { .. } => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "PAYMENT_SESSION_ERROR",
                    err.to_string(),
                ),
                BookingError::Validation(_) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_FAILED", err.to_string())
                }
                BookingError::Infrastructure(inner) => infrastructure(inner),
            },
        }
    }
}

fn infrastructure(err: &DomainError) -> (StatusCode, &'static str, String) {
    match err.code {
        ErrorCode::ClassNotFound | ErrorCode::BookingNotFound => {
            (StatusCode::NOT_FOUND, "NOT_FOUND", err.message.clone())
        }
        ErrorCode::Conflict => (StatusCode::CONFLICT, "CONFLICT", err.message.clone()),
        ErrorCode::ValidationFailed => {
            (StatusCode::BAD_REQUEST, "VALIDATION_FAILED", err.message.clone())
        }
        _ => {
            tracing::error!(code = %err.code, error = %err, "Request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "Internal server error".to_string(),
            )
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Booking(BookingError::PaymentSession { reason, retryable }) = &self {
            tracing::error!(reason = %reason, retryable, "Payment provider request failed");
        }
        let (status, code, message) = self.parts();
        (status, Json(ErrorResponse::new(code, message))).into_response()
    }
}
