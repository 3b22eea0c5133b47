//! orderctl-core: order domain model and aggregation
//!
//! Pure domain logic with no I/O:
//! - `model`: orders, items and the nested read shape
//! - `money`: fixed-point line and order totals
//! - `validation`: write-request checks matching the store's column constraints
//! - `aggregate`: folding joined rows into order trees

pub mod aggregate;
pub mod model;
pub mod money;
pub mod validation;

pub use aggregate::{fold_rows, OrderFolder};
pub use model::{
    GameId, ItemRow, NewOrder, NewOrderItem, Order, OrderId, OrderItem, OrderItemId, OrderLine,
    OrderRow, OrderWithItems, PartialItemRow,
};
pub use money::line_total;
pub use validation::ValidationError;

pub use rust_decimal::Decimal;
