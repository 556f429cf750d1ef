//! Payment configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::adapters::stripe::DEFAULT_API_BASE_URL;
use crate::domain::foundation::CurrencyCode;
use crate::domain::payment::{CheckoutMode, DEFAULT_TOLERANCE_SECS};

use super::error::ValidationError;

/// Payment configuration (Stripe)
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Stripe secret API key
    pub stripe_api_key: SecretString,

    /// Stripe webhook signing secret
    pub stripe_webhook_secret: SecretString,

    /// Stripe API base URL
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// ISO 4217 currency charged for classes
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Hosted redirect or embedded widget
    #[serde(default)]
    pub checkout_mode: CheckoutMode,

    /// Maximum age of a signed webhook, in seconds
    #[serde(default = "default_webhook_tolerance")]
    pub webhook_tolerance_secs: i64,

    /// Days a processed webhook id is kept for deduplication
    #[serde(default = "default_webhook_retention")]
    pub webhook_retention_days: u32,
}

impl PaymentConfig {
    /// Check if using Stripe test mode
    pub fn is_test_mode(&self) -> bool {
        self.stripe_api_key.expose_secret().starts_with("sk_test_")
    }

    /// Check if using Stripe live mode
    pub fn is_live_mode(&self) -> bool {
        self.stripe_api_key.expose_secret().starts_with("sk_live_")
    }

    /// Parsed charge currency
    pub fn currency_code(&self) -> Result<CurrencyCode, ValidationError> {
        CurrencyCode::new(&self.currency).map_err(|_| ValidationError::InvalidCurrency)
    }

    /// Validate payment configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        let api_key = self.stripe_api_key.expose_secret();
        let webhook_secret = self.stripe_webhook_secret.expose_secret();

        if api_key.is_empty() {
            return Err(ValidationError::MissingRequired("PAYMENT__STRIPE_API_KEY"));
        }
        if webhook_secret.is_empty() {
            return Err(ValidationError::MissingRequired("PAYMENT__STRIPE_WEBHOOK_SECRET"));
        }
        if !api_key.starts_with("sk_") && !api_key.starts_with("rk_") {
            return Err(ValidationError::InvalidStripeKey);
        }
        if !webhook_secret.starts_with("whsec_") {
            return Err(ValidationError::InvalidStripeWebhookSecret);
        }
        if !(1..=3600).contains(&self.webhook_tolerance_secs) {
            return Err(ValidationError::InvalidWebhookTolerance);
        }
        if self.webhook_retention_days == 0 {
            return Err(ValidationError::InvalidWebhookRetention);
        }
        self.currency_code()?;

        Ok(())
    }
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_currency() -> String {
    "GBP".to_string()
}

fn default_webhook_tolerance() -> i64 {
    DEFAULT_TOLERANCE_SECS
}

fn default_webhook_retention() -> u32 {
    90
}
