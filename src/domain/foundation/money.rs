//! Currency amounts and ISO currency codes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

/// Converts a decimal major-unit price (e.g. pounds) into minor units (pence).
///
/// Rounds to the nearest minor unit, so `19.999` becomes `2000`.
pub fn to_minor_units(field: &str, amount: f64) -> Result<i64, ValidationError> {
    if !amount.is_finite() {
        return Err(ValidationError::invalid_format(field, "must be a finite number"));
    }
    if amount <= 0.0 {
        return Err(ValidationError::invalid_format(field, "must be greater than zero"));
    }
    let minor = (amount * 100.0).round();
    if minor < 1.0 {
        return Err(ValidationError::invalid_format(field, "is less than one minor unit"));
    }
    if minor > i64::MAX as f64 {
        return Err(ValidationError::invalid_format(field, "is too large"));
    }
    Ok(minor as i64)
}

/// Converts minor units back into a decimal major-unit amount.
pub fn to_major_units(minor: i64) -> f64 {
    minor as f64 / 100.0
}

/// Upper-case ISO 4217 currency code such as `GBP`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Validates and normalizes a three-letter currency code.
    pub fn new(code: impl AsRef<str>) -> Result<Self, ValidationError> {
        let code = code.as_ref().trim();
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ValidationError::invalid_format(
                "currency",
                "must be a three-letter ISO code",
            ));
        }
        Ok(Self(code.to_ascii_uppercase()))
    }

    /// British pounds, the storefront's default.
    pub fn gbp() -> Self {
        Self("GBP".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lower-case form expected by Stripe's API.
    pub fn to_provider_code(&self) -> String {
        self.0.to_ascii_lowercase()
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CurrencyCode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}
