//! Tracing setup for the orderctl CLI
//!
//! Usage:
//!   orderctl --debug ...              # Debug logging to console
//!   RUST_LOG=orderctl_server=debug    # Fine-grained log control
//!
//! Logs go to stderr so `orders list` output stays pipeable.

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Tracing configuration options
#[derive(Debug, Clone, Default)]
pub struct TracingConfig {
    /// Enable debug logging (sets debug level if RUST_LOG is not set)
    pub debug: bool,
}

impl TracingConfig {
    fn filter(&self) -> EnvFilter {
        let fallback = if self.debug { "debug" } else { "info" };
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
    }
}

/// Initialize console tracing.
pub fn init(config: &TracingConfig) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(config.filter())
        .with_target(config.debug)
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_not_debug() {
        assert!(!TracingConfig::default().debug);
    }

    #[test]
    fn second_init_reports_error() {
        let config = TracingConfig::default();
        // The first call may lose to another test; either way one subscriber is set
        let _ = init(&config);
        assert!(init(&config).is_err());
    }
}
