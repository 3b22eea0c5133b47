//! Order repository
//!
//! Writer: `create_order`, `create_order_item` validate input, insert one
//! row and return the entity with its store-assigned id.
//! Reader: `list_with_items` runs the single join query, folded into
//! order trees by the store as rows arrive.
//!
//! Order and item creation are separate round-trips with no transaction
//! between them.

use orderctl_core::{NewOrder, NewOrderItem, Order, OrderItem, OrderWithItems};

use crate::db::{DbError, OrderStore};

/// Order repository over any [`OrderStore`]
pub struct OrderRepo<'a> {
    store: &'a dyn OrderStore,
}

impl<'a> OrderRepo<'a> {
    pub fn new(store: &'a dyn OrderStore) -> Self {
        Self { store }
    }

    /// Insert an order; the returned entity has no items.
    pub async fn create_order(&self, request: NewOrder) -> Result<Order, DbError> {
        let request = request.validated()?;
        let order_id = self.store.insert_order(&request.username).await?;

        let order = Order::new(order_id, request.username);
        tracing::info!(order_id = order.order_id, username = %order.username, "Order created");
        Ok(order)
    }

    /// Insert an item against an existing order and catalog entry.
    ///
    /// Unknown order or game ids fail with `DbError::IntegrityViolation`.
    pub async fn create_order_item(&self, request: NewOrderItem) -> Result<OrderItem, DbError> {
        let request = request.validated()?;
        let order_item_id = self.store.insert_order_item(&request).await?;

        let item = OrderItem::new(
            order_item_id,
            request.order_id,
            request.game_id,
            request.unit_price,
            request.quantity,
        );
        tracing::info!(
            order_item_id = item.order_item_id,
            order_id = item.order_id,
            game_id = item.game_id,
            total_price = %item.total_price,
            "Order item created"
        );
        Ok(item)
    }

    /// All orders with their items and totals.
    pub async fn list_with_items(&self) -> Result<Vec<OrderWithItems>, DbError> {
        let orders = self.store.fetch_orders().await?;

        let items: usize = orders.iter().map(|o| o.items.len()).sum();
        tracing::info!(orders = orders.len(), items, "Fetched orders");
        Ok(orders)
    }
}
