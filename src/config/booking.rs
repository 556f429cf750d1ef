//! Booking and storefront configuration

use serde::Deserialize;

use super::error::ValidationError;
use super::server::Environment;

/// Booking configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BookingConfig {
    /// Storefront origin used to build checkout return URLs
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,

    /// How many days ahead a class may be booked
    #[serde(default = "default_horizon_days")]
    pub horizon_days: u32,
}

impl BookingConfig {
    /// Storefront origin without a trailing slash
    pub fn base_url(&self) -> &str {
        self.public_base_url.trim_end_matches('/')
    }

    /// Validate booking configuration
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        let url = self.public_base_url.as_str();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ValidationError::InvalidPublicBaseUrl);
        }
        if *environment == Environment::Production && !url.starts_with("https://") {
            return Err(ValidationError::PublicBaseUrlMustBeHttps);
        }
        if !(1..=365).contains(&self.horizon_days) {
            return Err(ValidationError::InvalidHorizon);
        }
        Ok(())
    }
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            public_base_url: default_public_base_url(),
            horizon_days: default_horizon_days(),
        }
    }
}

fn default_public_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_horizon_days() -> u32 {
    14
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BookingConfig::default();
        assert_eq!(config.horizon_days, 14);
        assert!(config.validate(&Environment::Development).is_ok());
    }

    #[test]
    fn test_base_url_strips_trailing_slash() {
        let config = BookingConfig {
            public_base_url: "https://dance.example/".to_string(),
            ..Default::default()
        };
        assert_eq!(config.base_url(), "https://dance.example");
    }

    #[test]
    fn test_production_requires_https() {
        let config = BookingConfig::default();
        assert_eq!(
            config.validate(&Environment::Production),
            Err(ValidationError::PublicBaseUrlMustBeHttps)
        );
    }

    #[test]
    fn test_rejects_non_http_url() {
        let config = BookingConfig {
            public_base_url: "dance.example".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.validate(&Environment::Development),
            Err(ValidationError::InvalidPublicBaseUrl)
        );
    }

    #[test]
    fn test_horizon_bounds() {
        for days in [0, 366] {
            let config = BookingConfig {
                horizon_days: days,
                ..Default::default()
            };
            assert_eq!(
                config.validate(&Environment::Development),
                Err(ValidationError::InvalidHorizon)
            );
        }
    }
}
