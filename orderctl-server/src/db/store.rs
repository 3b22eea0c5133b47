//! Storage seam for orders
//!
//! The writer, reader and schema initializer only talk to the store
//! through this trait, so the same logic runs against PostgreSQL and
//! against the in-memory store used by tests.

use async_trait::async_trait;
use orderctl_core::{NewOrderItem, OrderId, OrderItemId, OrderWithItems};

use super::DbError;

#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Existence probe: can the order with id 1 be read?
    ///
    /// A failed probe query means "not initialized" and yields `Ok(false)`.
    /// Only a failure to obtain a connection is returned as an error.
    async fn is_initialized(&self) -> Result<bool, DbError>;

    /// Create the `Orders` and `OrderItems` tables.
    async fn create_tables(&self) -> Result<(), DbError>;

    /// Insert an order row and return its store-assigned id.
    async fn insert_order(&self, username: &str) -> Result<OrderId, DbError>;

    /// Insert an item row and return its store-assigned id.
    async fn insert_order_item(&self, item: &NewOrderItem) -> Result<OrderItemId, DbError>;

    /// Run the orders/items/catalog left join and fold the rows into
    /// order trees as they arrive.
    ///
    /// Any decode or mid-stream failure aborts the whole read.
    async fn fetch_orders(&self) -> Result<Vec<OrderWithItems>, DbError>;
}
