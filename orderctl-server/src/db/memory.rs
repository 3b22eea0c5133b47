//! In-memory order store
//!
//! Behaves like the PostgreSQL schema: SERIAL-style identities that are
//! never reused, foreign keys to orders and to a catalog of games, the
//! CHECK constraints on price and quantity, and the left-join row shape.
//! Counts DDL, insert and query operations and can inject a read failure.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use orderctl_core::money::{MAX_UNIT_PRICE, PRICE_SCALE};
use orderctl_core::{
    fold_rows, GameId, ItemRow, NewOrderItem, OrderId, OrderItemId, OrderRow, OrderWithItems,
};

use super::store::OrderStore;
use super::DbError;

#[derive(Debug)]
struct StoredItem {
    order_item_id: OrderItemId,
    order_id: OrderId,
    game_id: GameId,
    unit_price: orderctl_core::Decimal,
    quantity: i32,
}

#[derive(Debug, Default)]
struct Tables {
    created: bool,
    orders: Vec<(OrderId, String)>,
    items: Vec<StoredItem>,
    games: BTreeMap<GameId, String>,
    last_order_id: OrderId,
    last_item_id: OrderItemId,
}

/// Operation counts observed by the store
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct OperationCounts {
    pub ddl: usize,
    pub inserts: usize,
    pub queries: usize,
}

#[derive(Debug, Default)]
pub struct InMemoryOrderStore {
    tables: Mutex<Tables>,
    ddl: AtomicUsize,
    inserts: AtomicUsize,
    queries: AtomicUsize,
    fail_reads: AtomicBool,
}

impl InMemoryOrderStore {
    /// Empty store with no catalog entries and no tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store whose external catalog holds the given games.
    pub fn with_catalog<I, S>(games: I) -> Self
    where
        I: IntoIterator<Item = (GameId, S)>,
        S: Into<String>,
    {
        let store = Self::new();
        {
            let mut tables = store.tables();
            for (game_id, name) in games {
                tables.games.insert(game_id, name.into());
            }
        }
        store
    }

    /// Make subsequent `fetch_orders` calls fail mid-read.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn counts(&self) -> OperationCounts {
        OperationCounts {
            ddl: self.ddl.load(Ordering::SeqCst),
            inserts: self.inserts.load(Ordering::SeqCst),
            queries: self.queries.load(Ordering::SeqCst),
        }
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn missing_tables(context: &'static str) -> DbError {
    DbError::store_message(context, "relation \"orders\" does not exist")
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn is_initialized(&self) -> Result<bool, DbError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        let tables = self.tables();
        Ok(tables.created && tables.orders.iter().any(|(id, _)| *id == 1))
    }

    async fn create_tables(&self) -> Result<(), DbError> {
        self.ddl.fetch_add(2, Ordering::SeqCst);
        self.tables().created = true;
        Ok(())
    }

    async fn insert_order(&self, username: &str) -> Result<OrderId, DbError> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        let mut tables = self.tables();
        if !tables.created {
            return Err(missing_tables("error inserting order"));
        }

        tables.last_order_id += 1;
        let order_id = tables.last_order_id;
        tables.orders.push((order_id, username.to_owned()));
        Ok(order_id)
    }

    async fn insert_order_item(&self, item: &NewOrderItem) -> Result<OrderItemId, DbError> {
        const CONTEXT: &str = "error inserting order item";

        self.inserts.fetch_add(1, Ordering::SeqCst);
        let mut tables = self.tables();
        if !tables.created {
            return Err(missing_tables(CONTEXT));
        }

        if !tables.orders.iter().any(|(id, _)| *id == item.order_id) {
            return Err(DbError::IntegrityViolation {
                context: CONTEXT,
                detail: format!("order_id {} is not present in table \"orders\"", item.order_id),
            });
        }
        if !tables.games.contains_key(&item.game_id) {
            return Err(DbError::IntegrityViolation {
                context: CONTEXT,
                detail: format!("game_id {} is not present in table \"games\"", item.game_id),
            });
        }
        let negative_price = item.unit_price.is_sign_negative() && !item.unit_price.is_zero();
        if item.quantity <= 0 || negative_price {
            return Err(DbError::IntegrityViolation {
                context: CONTEXT,
                detail: "new row violates check constraint".into(),
            });
        }
        if item.unit_price > MAX_UNIT_PRICE {
            return Err(DbError::store_message(CONTEXT, "numeric field overflow"));
        }

        // NUMERIC(5,2) stores exactly two fractional digits
        let mut unit_price = item.unit_price;
        unit_price.rescale(PRICE_SCALE);

        tables.last_item_id += 1;
        let order_item_id = tables.last_item_id;
        tables.items.push(StoredItem {
            order_item_id,
            order_id: item.order_id,
            game_id: item.game_id,
            unit_price,
            quantity: item.quantity,
        });
        Ok(order_item_id)
    }

    async fn fetch_orders(&self) -> Result<Vec<OrderWithItems>, DbError> {
        const CONTEXT: &str = "error querying orders";

        self.queries.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(DbError::store_message(CONTEXT, "connection reset by peer"));
        }

        let tables = self.tables();
        if !tables.created {
            return Err(missing_tables(CONTEXT));
        }

        let mut rows = Vec::new();
        for (order_id, username) in &tables.orders {
            let mut matched = false;
            for item in tables.items.iter().filter(|i| i.order_id == *order_id) {
                matched = true;
                rows.push(OrderRow {
                    order_id: *order_id,
                    username: username.clone(),
                    item: Some(ItemRow {
                        order_item_id: item.order_item_id,
                        game_id: item.game_id,
                        game_name: tables.games.get(&item.game_id).cloned().unwrap_or_default(),
                        unit_price: item.unit_price,
                        quantity: item.quantity,
                    }),
                });
            }
            if !matched {
                rows.push(OrderRow {
                    order_id: *order_id,
                    username: username.clone(),
                    item: None,
                });
            }
        }

        Ok(fold_rows(rows))
    }
}
