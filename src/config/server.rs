//! Listener, logging, and browser-facing HTTP settings.

use std::net::SocketAddr;
use std::time::Duration;

use serde::Deserialize;

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub environment: Environment,

    /// Filter directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Upper bound on a request, Stripe round-trips included.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Storefront origins, comma-separated. Unset allows any origin.
    #[serde(default)]
    pub cors_origins: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ValidationError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| ValidationError::InvalidPort)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Configured storefront origins without trailing slashes. Empty means
    /// any origin may call the API.
    pub fn allowed_origins(&self) -> Vec<&str> {
        self.cors_origins
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(|origin| origin.trim().trim_end_matches('/'))
            .filter(|origin| !origin.is_empty())
            .collect()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.port == 0 {
            return Err(ValidationError::InvalidPort);
        }
        if !(1..=300).contains(&self.request_timeout_secs) {
            return Err(ValidationError::InvalidTimeout);
        }

        if let Some(bad) = self
            .allowed_origins()
            .into_iter()
            .find(|o| !(o.starts_with("https://") || o.starts_with("http://")))
        {
            return Err(ValidationError::InvalidCorsOrigin(bad.to_string()));
        }
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            environment: Environment::default(),
            log_level: default_log_level(),
            request_timeout_secs: default_request_timeout(),
            cors_origins: None,
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info,dance_booking=debug,sqlx=warn".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_origins(origins: &str) -> ServerConfig {
        ServerConfig {
            cors_origins: Some(origins.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn binds_to_host_and_port() {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
            ..Default::default()
        };
        assert_eq!(config.socket_addr().unwrap().to_string(), "127.0.0.1:3000");

        let config = ServerConfig {
            host: "not a host".to_string(),
            ..Default::default()
        };
        assert!(config.socket_addr().is_err());
    }

    #[test]
    fn origins_are_trimmed_and_unslashed() {
        let config = with_origins(" https://dance.example/ ,http://localhost:3000,,");
        assert_eq!(
            config.allowed_origins(),
            vec!["https://dance.example", "http://localhost:3000"]
        );
        assert!(ServerConfig::default().allowed_origins().is_empty());
    }

    #[test]
    fn origin_without_scheme_is_rejected() {
        assert_eq!(
            with_origins("dance.example").validate(),
            Err(ValidationError::InvalidCorsOrigin("dance.example".to_string()))
        );
    }

    #[test]
    fn storefront_origins_pass_validation() {
        let config = ServerConfig {
            environment: Environment::Production,
            ..with_origins("https://dance.example,http://localhost:3000")
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.environment.as_str(), "production");
    }

    #[test]
    fn request_timeout_must_be_within_five_minutes() {
        let mut config = ServerConfig::default();
        assert_eq!(config.request_timeout(), Duration::from_secs(30));

        config.request_timeout_secs = 0;
        assert_eq!(config.validate(), Err(ValidationError::InvalidTimeout));
        config.request_timeout_secs = 301;
        assert_eq!(config.validate(), Err(ValidationError::InvalidTimeout));
    }
}
