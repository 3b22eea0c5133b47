//! Order domain model
//!
//! Two families of types live here:
//! - write-side entities returned by the order writer (`Order`, `OrderItem`)
//! - read-side trees produced by the aggregator (`OrderWithItems`, `OrderLine`)
//!
//! Field names of the read-side types are part of the public JSON contract.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::money::line_total;

/// Store-assigned order identity (`Orders.order_id`, SERIAL)
pub type OrderId = i32;

/// Store-assigned order item identity (`OrderItems.order_item_id`, SERIAL)
pub type OrderItemId = i32;

/// Identity of an entry in the externally-owned game catalog
pub type GameId = i32;

/// Order as returned by the writer. Items are empty on creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Order {
    pub order_id: OrderId,
    pub username: String,
    pub items: Vec<OrderItem>,
}

impl Order {
    /// A freshly inserted order with no items yet.
    pub fn new(order_id: OrderId, username: impl Into<String>) -> Self {
        Self {
            order_id,
            username: username.into(),
            items: Vec::new(),
        }
    }
}

/// Order item as returned by the writer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderItem {
    pub order_item_id: OrderItemId,
    pub order_id: OrderId,
    pub game_id: GameId,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    pub quantity: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
}

impl OrderItem {
    /// Build an item from its persisted columns, deriving the total.
    pub fn new(
        order_item_id: OrderItemId,
        order_id: OrderId,
        game_id: GameId,
        unit_price: Decimal,
        quantity: i32,
    ) -> Self {
        Self {
            order_item_id,
            order_id,
            game_id,
            unit_price,
            quantity,
            total_price: line_total(unit_price, quantity),
        }
    }
}

/// Request to create an order
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewOrder {
    pub username: String,
}

/// Request to create an order item
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewOrderItem {
    pub order_id: OrderId,
    pub game_id: GameId,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    pub quantity: i32,
}

/// One line of an order on the read side, joined with its catalog name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderLine {
    pub order_item_id: OrderItemId,
    pub game_id: GameId,
    pub game_name: String,
    pub quantity: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
}

/// Order with nested lines and a derived total, as served by `GET /orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderWithItems {
    pub order_id: OrderId,
    pub username: String,
    pub items: Vec<OrderLine>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
}

/// Item half of a joined row. Absent when the order has no items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRow {
    pub order_item_id: OrderItemId,
    pub game_id: GameId,
    pub game_name: String,
    pub unit_price: Decimal,
    pub quantity: i32,
}

impl ItemRow {
    pub fn into_line(self) -> OrderLine {
        let total_price = line_total(self.unit_price, self.quantity);
        OrderLine {
            order_item_id: self.order_item_id,
            game_id: self.game_id,
            game_name: self.game_name,
            quantity: self.quantity,
            unit_price: self.unit_price,
            total_price,
        }
    }
}

/// One decoded row of `Orders LEFT JOIN OrderItems LEFT JOIN Games`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRow {
    pub order_id: OrderId,
    pub username: String,
    pub item: Option<ItemRow>,
}

/// Item columns of a joined row were neither all null nor all present.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("order {order_id}: item columns are partially null")]
pub struct PartialItemRow {
    pub order_id: OrderId,
}

impl OrderRow {
    /// Assemble a row from nullable join columns.
    ///
    /// All item columns null means the order has no items; a mix of null
    /// and present columns is a decode error.
    pub fn from_columns(
        order_id: OrderId,
        username: String,
        order_item_id: Option<OrderItemId>,
        game_id: Option<GameId>,
        game_name: Option<String>,
        unit_price: Option<Decimal>,
        quantity: Option<i32>,
    ) -> Result<Self, PartialItemRow> {
        let item = match (order_item_id, game_id, game_name, unit_price, quantity) {
            (None, None, None, None, None) => None,
            (Some(order_item_id), Some(game_id), Some(game_name), Some(unit_price), Some(quantity)) => {
                Some(ItemRow {
                    order_item_id,
                    game_id,
                    game_name,
                    unit_price,
                    quantity,
                })
            }
            _ => return Err(PartialItemRow { order_id }),
        };

        Ok(Self {
            order_id,
            username,
            item,
        })
    }
}
