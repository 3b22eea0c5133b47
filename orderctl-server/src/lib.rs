//! orderctl-server: order persistence and HTTP API
//!
//! - `db`: connection management, schema bootstrap, order store and repository
//! - `http`: axum router serving the order list and write endpoints

pub mod db;
pub mod http;

pub use db::{
    ensure_schema, ConnectionError, DatabaseConfig, DbError, InMemoryOrderStore, OrderRepo,
    OrderStore, PgConnectionManager, PgOrderStore, SchemaOutcome,
};
pub use http::{build_router, run_server, AppState, ServerConfig, ServerError};
