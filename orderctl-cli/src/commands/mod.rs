//! Command implementations for the orderctl CLI

pub mod init_db;
pub mod orders;
pub mod serve;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use orderctl_server::db::pool::DEFAULT_MAX_CONNECTIONS;
use orderctl_server::{DatabaseConfig, PgConnectionManager, PgOrderStore};

pub use init_db::run_init_db;
pub use orders::{run_orders, OrdersArgs};
pub use serve::{run_serve, ServeArgs};

/// PostgreSQL connection flags shared by every command that touches the store
#[derive(Args, Debug, Clone)]
pub struct DbArgs {
    /// Database host
    #[arg(long = "db-host", env = "POSTGRES_HOST")]
    pub host: Option<String>,

    /// Database port (default: 5432)
    #[arg(id = "db_port", long = "db-port", env = "POSTGRES_PORT")]
    pub port: Option<u16>,

    /// Database name
    #[arg(long = "db-name", env = "POSTGRES_DB")]
    pub database: Option<String>,

    /// Database user
    #[arg(long = "db-user", env = "POSTGRES_USER")]
    pub user: Option<String>,

    /// Database password
    #[arg(long = "db-password", env = "POSTGRES_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Maximum pool size
    #[arg(long, default_value_t = DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: u32,
}

impl DbArgs {
    /// Resolve flags (already merged with the environment by clap) into a
    /// validated config.
    pub fn to_config(&self) -> Result<DatabaseConfig> {
        let config = DatabaseConfig::from_lookup(|key| match key {
            "POSTGRES_HOST" => self.host.clone(),
            "POSTGRES_PORT" => self.port.map(|p| p.to_string()),
            "POSTGRES_DB" => self.database.clone(),
            "POSTGRES_USER" => self.user.clone(),
            "POSTGRES_PASSWORD" => self.password.clone(),
            _ => None,
        })
        .context("Database not configured. Set POSTGRES_* via flags, environment or ~/.orderctl/.env")?;
        Ok(config.with_max_connections(self.max_connections))
    }

    /// Build a Postgres-backed store. No connection is opened until first use.
    pub fn open_store(&self) -> Result<PgOrderStore> {
        let config = self.to_config()?;
        tracing::debug!(url = %config.redacted_url(), "Using database");
        let connections = Arc::new(PgConnectionManager::postgres(config));
        Ok(PgOrderStore::new(connections))
    }
}
