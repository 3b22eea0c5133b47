//! Database layer - connection management, schema bootstrap, repositories
//!
//! # Design Principles
//!
//! - One lazily created pool per process, validated once, never retried
//! - All reads of orders use a single JOIN - no N+1 queries
//! - Rely on DB constraints for referential integrity
//! - Store access goes through the `OrderStore` trait

pub mod error;
pub mod memory;
pub mod pool;
pub mod postgres;
pub mod repos;
pub mod schema;
pub mod store;

pub use error::DbError;
pub use memory::InMemoryOrderStore;
pub use pool::{
    ConnectionError, ConnectionManager, Connector, DatabaseConfig, PgConnectionManager,
    PgConnector,
};
pub use postgres::PgOrderStore;
pub use repos::OrderRepo;
pub use schema::{ensure_schema, SchemaOutcome};
pub use store::OrderStore;
