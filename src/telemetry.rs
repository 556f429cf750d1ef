//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;

/// Installs the global subscriber.
///
/// `RUST_LOG` wins over the configured `log_level`. Production logs are JSON,
/// everything else uses the compact human format.
pub fn init_tracing(server: &ServerConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = std::env::var("RUST_LOG")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| server.log_level.clone());
    let filter = EnvFilter::try_new(filter)?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);
    if server.is_production() {
        builder.json().try_init()?;
    } else {
        builder.compact().try_init()?;
    }
    Ok(())
}
