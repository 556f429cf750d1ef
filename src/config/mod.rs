//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables carry the `DANCE_BOOKING`
//! prefix and nested values are separated by double underscores.
//!
//! # Example
//!
//! ```no_run
//! use dance_booking::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod booking;
mod database;
mod error;
mod payment;
mod server;

pub use booking::BookingConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use payment::PaymentConfig;
pub use server::{Environment, ServerConfig};

use std::path::Path;

use serde::Deserialize;

use crate::domain::booking::BookingWindow;
use crate::domain::payment::CheckoutSettings;

const ENV_PREFIX: &str = "DANCE_BOOKING";

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// PostgreSQL connection; in-memory storage when absent
    #[serde(default)]
    pub database: Option<DatabaseConfig>,

    /// Payment configuration (Stripe)
    pub payment: PaymentConfig,

    /// Booking window and storefront settings
    #[serde(default)]
    pub booking: BookingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Loads `.env` if present, then reads `DANCE_BOOKING__*` variables.
    ///
    /// - `DANCE_BOOKING__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `DANCE_BOOKING__PAYMENT__STRIPE_API_KEY=...` -> `payment.stripe_api_key = ...`
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_environment()
    }

    /// Load configuration after reading the given env file
    ///
    /// Variables already present in the process environment win over the file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        dotenvy::from_path(path.as_ref())?;
        Self::from_environment()
    }

    fn from_environment() -> Result<Self, ConfigError> {
        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix(ENV_PREFIX)
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        if let Some(database) = &self.database {
            database.validate()?;
        }
        self.payment.validate()?;
        self.booking.validate(&self.server.environment)?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }

    /// Checkout settings shared by every payment session
    pub fn checkout_settings(&self) -> Result<CheckoutSettings, ValidationError> {
        Ok(CheckoutSettings {
            public_base_url: self.booking.base_url().to_string(),
            currency: self.payment.currency_code()?,
            mode: self.payment.checkout_mode,
        })
    }

    /// Admission window for new bookings
    pub fn booking_window(&self) -> BookingWindow {
        BookingWindow::new(self.booking.horizon_days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::payment::CheckoutMode;
    use secrecy::ExposeSecret;
    use std::env;
    use std::io::Write;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "DANCE_BOOKING__PAYMENT__STRIPE_API_KEY",
        "DANCE_BOOKING__PAYMENT__STRIPE_WEBHOOK_SECRET",
        "DANCE_BOOKING__PAYMENT__CHECKOUT_MODE",
        "DANCE_BOOKING__DATABASE__URL",
        "DANCE_BOOKING__SERVER__PORT",
        "DANCE_BOOKING__SERVER__ENVIRONMENT",
        "DANCE_BOOKING__BOOKING__HORIZON_DAYS",
        "DANCE_BOOKING__BOOKING__PUBLIC_BASE_URL",
    ];

    fn set_minimal_env() {
        env::set_var("DANCE_BOOKING__PAYMENT__STRIPE_API_KEY", "sk_test_xxx");
        env::set_var("DANCE_BOOKING__PAYMENT__STRIPE_WEBHOOK_SECRET", "whsec_xxx");
    }

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.expect("config should load");
        assert_eq!(config.payment.stripe_api_key.expose_secret(), "sk_test_xxx");
        assert!(config.database.is_none());
        assert_eq!(config.booking.horizon_days, 14);
        assert_eq!(config.payment.currency, "GBP");
    }

    #[test]
    fn test_validate_full_config() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.unwrap().validate().is_ok());
    }

    #[test]
    fn test_missing_payment_section_fails_to_load() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        assert!(AppConfig::load().is_err());
    }

    #[test]
    fn test_nested_overrides() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("DANCE_BOOKING__SERVER__PORT", "3000");
        env::set_var("DANCE_BOOKING__DATABASE__URL", "postgres://localhost/dance");
        env::set_var("DANCE_BOOKING__PAYMENT__CHECKOUT_MODE", "embedded");
        env::set_var("DANCE_BOOKING__BOOKING__HORIZON_DAYS", "30");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(
            config.database.as_ref().map(|d| d.url.as_str()),
            Some("postgres://localhost/dance")
        );
        assert_eq!(config.payment.checkout_mode, CheckoutMode::Embedded);
        assert_eq!(config.booking_window().horizon_days(), 30);
    }

    #[test]
    fn test_is_production() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("DANCE_BOOKING__SERVER__ENVIRONMENT", "production");
        env::set_var("DANCE_BOOKING__BOOKING__PUBLIC_BASE_URL", "https://dance.example");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.is_production());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_checkout_settings_from_config() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("DANCE_BOOKING__BOOKING__PUBLIC_BASE_URL", "https://dance.example/");
        let result = AppConfig::load();
        clear_env();

        let settings = result.unwrap().checkout_settings().unwrap();
        assert_eq!(settings.public_base_url, "https://dance.example");
        assert_eq!(settings.currency.as_str(), "GBP");
        assert_eq!(settings.mode, CheckoutMode::Hosted);
    }

    #[test]
    fn test_load_from_env_file() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "DANCE_BOOKING__PAYMENT__STRIPE_API_KEY=sk_test_from_file").unwrap();
        writeln!(file, "DANCE_BOOKING__PAYMENT__STRIPE_WEBHOOK_SECRET=whsec_from_file").unwrap();
        writeln!(file, "DANCE_BOOKING__BOOKING__HORIZON_DAYS=7").unwrap();

        let result = AppConfig::load_from_file(file.path());
        clear_env();

        let config = result.unwrap();
        assert_eq!(
            config.payment.stripe_api_key.expose_secret(),
            "sk_test_from_file"
        );
        assert_eq!(config.booking.horizon_days, 7);
    }
}
