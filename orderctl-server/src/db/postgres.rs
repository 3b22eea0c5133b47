//! PostgreSQL order store
//!
//! Obtains its pool from the shared [`PgConnectionManager`] on every call,
//! so the first operation in the process establishes the connection.

use std::sync::Arc;

use async_trait::async_trait;
use futures::TryStreamExt;
use orderctl_core::{
    Decimal, NewOrderItem, OrderFolder, OrderId, OrderItemId, OrderRow, OrderWithItems,
};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use super::pool::PgConnectionManager;
use super::store::OrderStore;
use super::DbError;

const CREATE_ORDERS: &str = r#"
    CREATE TABLE IF NOT EXISTS Orders (
        order_id SERIAL PRIMARY KEY,
        username VARCHAR(255) NOT NULL
    )
"#;

// Games is owned by the catalog service and must already exist.
const CREATE_ORDER_ITEMS: &str = r#"
    CREATE TABLE IF NOT EXISTS OrderItems (
        order_item_id SERIAL PRIMARY KEY,
        order_id INTEGER NOT NULL REFERENCES Orders(order_id),
        game_id INTEGER NOT NULL REFERENCES Games(game_id),
        unit_price DECIMAL(5,2) NOT NULL CHECK (unit_price >= 0),
        quantity INTEGER NOT NULL CHECK (quantity > 0)
    )
"#;

const SELECT_ORDER_ROWS: &str = r#"
    SELECT o.order_id, o.username,
           oi.order_item_id, oi.game_id, g.name AS game_name, oi.unit_price, oi.quantity
    FROM Orders o
    LEFT JOIN OrderItems oi ON o.order_id = oi.order_id
    LEFT JOIN Games g ON oi.game_id = g.game_id
    ORDER BY o.order_id, oi.order_item_id
"#;

/// Order store backed by PostgreSQL
#[derive(Clone)]
pub struct PgOrderStore {
    connections: Arc<PgConnectionManager>,
}

impl PgOrderStore {
    pub fn new(connections: Arc<PgConnectionManager>) -> Self {
        Self { connections }
    }

    async fn pool(&self) -> Result<PgPool, DbError> {
        Ok(self.connections.get().await?)
    }
}

#[async_trait]
impl OrderStore for PgOrderStore {
    async fn is_initialized(&self) -> Result<bool, DbError> {
        let pool = self.pool().await?;

        let probe: Result<Option<(i32,)>, sqlx::Error> =
            sqlx::query_as("SELECT order_id FROM Orders WHERE order_id = $1")
                .bind(1_i32)
                .fetch_optional(&pool)
                .await;

        match probe {
            Ok(row) => Ok(row.is_some()),
            Err(e) => {
                tracing::debug!(error = %e, "Orders probe failed, treating as uninitialized");
                Ok(false)
            }
        }
    }

    async fn create_tables(&self) -> Result<(), DbError> {
        let pool = self.pool().await?;

        sqlx::query(CREATE_ORDERS)
            .execute(&pool)
            .await
            .map_err(DbError::store("error creating Orders table"))?;

        sqlx::query(CREATE_ORDER_ITEMS)
            .execute(&pool)
            .await
            .map_err(DbError::store("error creating OrderItems table"))?;

        Ok(())
    }

    async fn insert_order(&self, username: &str) -> Result<OrderId, DbError> {
        let pool = self.pool().await?;

        let (order_id,): (i32,) = sqlx::query_as(
            r#"
            INSERT INTO Orders (username)
            VALUES ($1)
            RETURNING order_id
            "#,
        )
        .bind(username)
        .fetch_one(&pool)
        .await
        .map_err(DbError::store("error inserting order"))?;

        Ok(order_id)
    }

    async fn insert_order_item(&self, item: &NewOrderItem) -> Result<OrderItemId, DbError> {
        let pool = self.pool().await?;

        let (order_item_id,): (i32,) = sqlx::query_as(
            r#"
            INSERT INTO OrderItems (order_id, game_id, unit_price, quantity)
            VALUES ($1, $2, $3, $4)
            RETURNING order_item_id
            "#,
        )
        .bind(item.order_id)
        .bind(item.game_id)
        .bind(item.unit_price)
        .bind(item.quantity)
        .fetch_one(&pool)
        .await
        .map_err(DbError::store("error inserting order item"))?;

        Ok(order_item_id)
    }

    async fn fetch_orders(&self) -> Result<Vec<OrderWithItems>, DbError> {
        let pool = self.pool().await?;

        // Folded row by row; an error drops the partial tree
        let mut stream = sqlx::query(SELECT_ORDER_ROWS).fetch(&pool);
        let mut folder = OrderFolder::new();
        while let Some(row) = stream
            .try_next()
            .await
            .map_err(DbError::store("error querying orders"))?
        {
            folder.push(decode_row(&row)?);
        }

        Ok(folder.finish())
    }
}

fn decode_row(row: &PgRow) -> Result<OrderRow, DbError> {
    decode_columns(row).map_err(DbError::store("error scanning row"))
}

fn decode_columns(row: &PgRow) -> Result<OrderRow, sqlx::Error> {
    let order_id: i32 = row.try_get("order_id")?;
    let username: String = row.try_get("username")?;

    OrderRow::from_columns(
        order_id,
        username,
        row.try_get("order_item_id")?,
        row.try_get("game_id")?,
        row.try_get("game_name")?,
        row.try_get::<Option<Decimal>, _>("unit_price")?,
        row.try_get("quantity")?,
    )
    .map_err(|e| sqlx::Error::Decode(Box::new(e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_reads_every_order_once_per_item() {
        // LEFT joins so item-less orders still produce a row
        assert!(SELECT_ORDER_ROWS.contains("LEFT JOIN OrderItems"));
        assert!(SELECT_ORDER_ROWS.contains("LEFT JOIN Games"));
    }

    #[test]
    fn item_table_references_orders_and_catalog() {
        assert!(CREATE_ORDER_ITEMS.contains("REFERENCES Orders(order_id)"));
        assert!(CREATE_ORDER_ITEMS.contains("REFERENCES Games(game_id)"));
        assert!(CREATE_ORDER_ITEMS.contains("DECIMAL(5,2)"));
    }
}
