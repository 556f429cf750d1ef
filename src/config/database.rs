//! Postgres settings.
//!
//! The whole section is optional. Without `DANCE_BOOKING__DATABASE__URL` the
//! service keeps classes, bookings, and the webhook log in memory.

use std::time::Duration;

use serde::Deserialize;
use sqlx::postgres::PgPoolOptions;

use super::error::ValidationError;

/// Upper bound on pool size; bookings are low-volume.
const MAX_POOL_SIZE: u32 = 50;

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `postgres://` or `postgresql://` URL.
    pub url: String,

    #[serde(default = "default_pool_size")]
    pub pool_size: u32,

    /// Seconds to wait for a free connection before failing the request.
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,

    /// Apply `migrations/` before serving.
    #[serde(default = "default_run_migrations")]
    pub run_migrations: bool,
}

impl DatabaseConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.url.trim().is_empty() {
            return Err(ValidationError::MissingRequired("DATABASE__URL"));
        }
        if !(self.url.starts_with("postgres://") || self.url.starts_with("postgresql://")) {
            return Err(ValidationError::InvalidDatabaseUrl);
        }
        if self.pool_size == 0 {
            return Err(ValidationError::InvalidPoolSize);
        }
        if self.pool_size > MAX_POOL_SIZE {
            return Err(ValidationError::PoolSizeTooLarge(MAX_POOL_SIZE));
        }
        Ok(())
    }

    /// Pool settings for `PgPoolOptions::connect`.
    ///
    /// One connection is kept warm so the first webhook after a quiet spell
    /// does not pay the connect cost.
    pub fn pool_options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .min_connections(self.pool_size.min(1))
            .max_connections(self.pool_size)
            .acquire_timeout(Duration::from_secs(self.acquire_timeout_secs))
    }

    /// The URL with any password replaced, for logs.
    pub fn redacted_url(&self) -> String {
        let Some((scheme, rest)) = self.url.split_once("://") else {
            return self.url.clone();
        };
        match rest.split_once('@') {
            Some((credentials, host)) => {
                let user = credentials.split(':').next().unwrap_or_default();
                format!("{}://{}:***@{}", scheme, user, host)
            }
            None => self.url.clone(),
        }
    }
}

fn default_pool_size() -> u32 {
    5
}

fn default_acquire_timeout() -> u64 {
    5
}

fn default_run_migrations() -> bool {
    true
}
