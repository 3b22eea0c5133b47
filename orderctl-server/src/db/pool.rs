//! Database connection management
//!
//! One shared `PgPool` per process, created lazily by the first caller of
//! [`ConnectionManager::get`]. The connect sequence (open pool, then a
//! `SELECT 1` liveness probe) runs exactly once: concurrent first callers
//! wait on the same attempt and all observe its outcome. A failed attempt
//! is cached too, so the process stays failed instead of retrying.
//!
//! The attempt runs on its own task, so a caller dropped mid-connect (by a
//! timeout or a cancelled request) leaves it running for everyone else.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt, Shared};
use once_cell::sync::OnceCell;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::PgPool;

/// Default maximum connections for the pool.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Default PostgreSQL port when `POSTGRES_PORT` is unset.
pub const DEFAULT_PORT: u16 = 5432;

/// Connection could not be established or validated.
///
/// Cloneable so every waiter on the one-time initialization receives the
/// same error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConnectionError {
    #[error("invalid database configuration: {0}")]
    Config(String),

    #[error("unable to open database connection: {0}")]
    Open(Arc<sqlx::Error>),

    #[error("unable to connect to database: {0}")]
    Ping(Arc<sqlx::Error>),

    #[error("connection attempt aborted: {0}")]
    Aborted(String),
}

/// Target store settings (`POSTGRES_*` environment variables).
#[derive(Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
    pub max_connections: u32,
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"***")
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

impl DatabaseConfig {
    /// Read `POSTGRES_HOST`, `POSTGRES_PORT`, `POSTGRES_DB`, `POSTGRES_USER`
    /// and `POSTGRES_PASSWORD` from the process environment.
    pub fn from_env() -> Result<Self, ConnectionError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (environment, CLI overrides, tests).
    ///
    /// Empty values count as missing. Port falls back to 5432.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConnectionError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &str| {
            get(key).ok_or_else(|| ConnectionError::Config(format!("{} is not set", key)))
        };

        let port = match get("POSTGRES_PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| {
                ConnectionError::Config(format!("POSTGRES_PORT is not a valid port: '{}'", raw))
            })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            host: require("POSTGRES_HOST")?,
            port,
            database: require("POSTGRES_DB")?,
            user: require("POSTGRES_USER")?,
            password: get("POSTGRES_PASSWORD").unwrap_or_default(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        })
    }

    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    /// Connection URL with the password masked, for logs.
    pub fn redacted_url(&self) -> String {
        format!(
            "postgres://{}:***@{}:{}/{}?sslmode=disable",
            self.user, self.host, self.port, self.database
        )
    }

    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.database)
            .username(&self.user)
            .password(&self.password)
            .ssl_mode(PgSslMode::Disable)
    }
}

/// Performs one connect-and-validate sequence.
#[async_trait]
pub trait Connector: Send + Sync {
    type Handle: Clone + Send + Sync + 'static;

    async fn connect(&self) -> Result<Self::Handle, ConnectionError>;
}

/// Opens a `PgPool` and validates it with a round-trip probe.
#[derive(Debug, Clone)]
pub struct PgConnector {
    config: DatabaseConfig,
}

impl PgConnector {
    pub fn new(config: DatabaseConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Connector for PgConnector {
    type Handle = PgPool;

    async fn connect(&self) -> Result<PgPool, ConnectionError> {
        tracing::info!(url = %self.config.redacted_url(), "Connecting to PostgreSQL");

        let pool = PgPoolOptions::new()
            .max_connections(self.config.max_connections)
            .connect_with(self.config.connect_options())
            .await
            .map_err(|e| ConnectionError::Open(Arc::new(e)))?;

        sqlx::query("SELECT 1")
            .execute(&pool)
            .await
            .map_err(|e| ConnectionError::Ping(Arc::new(e)))?;

        tracing::info!("Successfully connected to the database");
        Ok(pool)
    }
}

type ConnectAttempt<H> = Shared<BoxFuture<'static, Result<H, ConnectionError>>>;

/// Lazily established, process-wide database handle.
pub struct ConnectionManager<C: Connector> {
    connector: Arc<C>,
    attempt: OnceCell<ConnectAttempt<C::Handle>>,
}

/// The production manager
pub type PgConnectionManager = ConnectionManager<PgConnector>;

impl<C: Connector + 'static> ConnectionManager<C> {
    pub fn new(connector: C) -> Self {
        Self {
            connector: Arc::new(connector),
            attempt: OnceCell::new(),
        }
    }

    /// Shared handle, connecting on first use.
    ///
    /// Every caller, including those racing the first one, gets the result
    /// of the single connect attempt.
    pub async fn get(&self) -> Result<C::Handle, ConnectionError> {
        self.attempt
            .get_or_init(|| self.spawn_attempt())
            .clone()
            .await
    }

    /// Whether the connect attempt has already resolved (either way)
    pub fn is_resolved(&self) -> bool {
        self.attempt
            .get()
            .is_some_and(|attempt| attempt.peek().is_some())
    }

    fn spawn_attempt(&self) -> ConnectAttempt<C::Handle> {
        let connector = Arc::clone(&self.connector);
        let task = tokio::spawn(async move {
            let outcome = connector.connect().await;
            if let Err(e) = &outcome {
                tracing::error!(error = %e, "Database connection failed");
            }
            outcome
        });

        async move {
            match task.await {
                Ok(outcome) => outcome,
                Err(e) => Err(ConnectionError::Aborted(e.to_string())),
            }
        }
        .boxed()
        .shared()
    }
}

impl PgConnectionManager {
    pub fn postgres(config: DatabaseConfig) -> Self {
        Self::new(PgConnector::new(config))
    }
}
