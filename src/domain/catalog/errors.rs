//! Catalog error types.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, ValidationError};

/// Errors raised while creating, updating, or looking up class occurrences.
#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    /// The class occurrence does not exist.
    #[error("Class occurrence not found: {0}")]
    NotFound(String),

    /// Every candidate suffix for a slug is already taken.
    #[error("Could not find a free slug for '{base}' after {attempts} attempts")]
    SlugExhausted { base: String, attempts: u32 },

    /// The title produces an empty slug.
    #[error("Title '{0}' does not contain any characters usable in a URL")]
    InvalidTitle(String),

    /// A field failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Storage failure.
    #[error("{0}")]
    Infrastructure(DomainError),
}

impl CatalogError {
    pub fn not_found(id: impl Into<String>) -> Self {
        CatalogError::NotFound(id.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            CatalogError::NotFound(_) => ErrorCode::ClassNotFound,
            CatalogError::SlugExhausted { .. } => ErrorCode::SlugExhausted,
            CatalogError::InvalidTitle(_) | CatalogError::Validation(_) => {
                ErrorCode::ValidationFailed
            }
            CatalogError::Infrastructure(err) => err.code,
        }
    }
}

impl From<DomainError> for CatalogError {
    fn from(err: DomainError) -> Self {
        CatalogError::Infrastructure(err)
    }
}
