//! Fixed-point price arithmetic
//!
//! All prices are `rust_decimal::Decimal`. Unit prices map to a
//! `NUMERIC(5,2)` column, so they carry at most two fractional digits and
//! multiplying by an integer quantity never loses precision.

use rust_decimal::Decimal;

/// Fractional digits stored for a unit price
pub const PRICE_SCALE: u32 = 2;

/// Largest unit price representable by `NUMERIC(5,2)` (999.99)
pub const MAX_UNIT_PRICE: Decimal = Decimal::from_parts(99_999, 0, 0, false, PRICE_SCALE);

/// Zero with two fractional digits, the total of an order without items
pub const ZERO_TOTAL: Decimal = Decimal::from_parts(0, 0, 0, false, PRICE_SCALE);

/// Total price of one line: unit price × quantity.
pub fn line_total(unit_price: Decimal, quantity: i32) -> Decimal {
    unit_price * Decimal::from(quantity)
}
