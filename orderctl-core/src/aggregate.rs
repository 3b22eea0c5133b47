//! Row-to-tree folding for the order list
//!
//! The reader runs one `LEFT JOIN` across orders, items and the catalog and
//! gets back a flat stream of rows, one per item (or one per item-less
//! order). This module folds that stream into one `OrderWithItems` per
//! distinct order:
//!
//! - output order is the order of first appearance in the stream
//! - items keep their row arrival order
//! - an order without items has an empty list and a zero total
//! - lookup of an already-seen order is O(1) via an id -> position index

use std::collections::HashMap;

use crate::model::{OrderId, OrderRow, OrderWithItems};
use crate::money::ZERO_TOTAL;

/// Incremental folder; feed rows with [`OrderFolder::push`], then
/// [`OrderFolder::finish`].
#[derive(Debug, Default)]
pub struct OrderFolder {
    orders: Vec<OrderWithItems>,
    index: HashMap<OrderId, usize>,
}

impl OrderFolder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one row into the tree.
    pub fn push(&mut self, row: OrderRow) {
        let position = match self.index.get(&row.order_id) {
            Some(&position) => position,
            None => {
                let position = self.orders.len();
                self.orders.push(OrderWithItems {
                    order_id: row.order_id,
                    username: row.username,
                    items: Vec::new(),
                    total_price: ZERO_TOTAL,
                });
                self.index.insert(row.order_id, position);
                position
            }
        };

        if let Some(item) = row.item {
            let line = item.into_line();
            let order = &mut self.orders[position];
            order.total_price += line.total_price;
            order.items.push(line);
        }
    }

    /// Number of distinct orders seen so far
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn finish(self) -> Vec<OrderWithItems> {
        self.orders
    }
}

/// Fold an infallible row stream.
pub fn fold_rows<I>(rows: I) -> Vec<OrderWithItems>
where
    I: IntoIterator<Item = OrderRow>,
{
    let mut folder = OrderFolder::new();
    for row in rows {
        folder.push(row);
    }
    folder.finish()
}
