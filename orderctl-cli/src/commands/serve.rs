//! HTTP server command
//!
//! Bootstraps the schema and serves the order API until Ctrl+C / SIGTERM.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use orderctl_server::{run_server, ServerConfig};

use super::DbArgs;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Full bind address; overrides --port
    #[arg(long, short = 'b')]
    pub bind: Option<SocketAddr>,

    /// Port to listen on (all interfaces)
    #[arg(long, short = 'p', env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Deployment tag reported by `GET /`
    #[arg(long, env = "TAG", default_value = "dev")]
    pub tag: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,

    #[command(flatten)]
    pub db: DbArgs,
}

impl ServeArgs {
    fn server_config(&self) -> ServerConfig {
        ServerConfig {
            bind_addr: self
                .bind
                .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], self.port))),
            tag: self.tag.clone(),
            request_timeout: Duration::from_secs(self.timeout),
        }
    }
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let store = Arc::new(args.db.open_store()?);
    let config = args.server_config();

    tracing::info!(bind = %config.bind_addr, tag = %config.tag, "Starting orderctl server");

    // Blocks until shutdown
    run_server(store, config).await.context("Server error")?;

    Ok(())
}
