//! Input validation for order writes
//!
//! Mirrors the column types and CHECK constraints of the `Orders` and
//! `OrderItems` tables so bad input is rejected before a store round-trip.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::model::{NewOrder, NewOrderItem};
use crate::money::{MAX_UNIT_PRICE, PRICE_SCALE};

/// `Orders.username` is `VARCHAR(255)`
pub const MAX_USERNAME_LEN: usize = 255;

/// Validation error for write requests
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    #[error("{field} exceeds maximum length of {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: String },

    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: String },

    #[error("{field} exceeds maximum of {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        max: String,
        value: String,
    },

    #[error("{field} allows at most {digits} fractional digits, got {value}")]
    TooPrecise {
        field: &'static str,
        digits: u32,
        value: String,
    },
}

/// Check an owner name and return it trimmed.
pub fn validate_username(username: &str) -> Result<&str, ValidationError> {
    let trimmed = username.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field: "username" });
    }
    if trimmed.chars().count() > MAX_USERNAME_LEN {
        return Err(ValidationError::TooLong {
            field: "username",
            max: MAX_USERNAME_LEN,
        });
    }
    Ok(trimmed)
}

pub fn validate_quantity(quantity: i32) -> Result<(), ValidationError> {
    if quantity <= 0 {
        return Err(ValidationError::NotPositive {
            field: "quantity",
            value: quantity.to_string(),
        });
    }
    Ok(())
}

pub fn validate_unit_price(price: Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(ValidationError::Negative {
            field: "unit_price",
            value: price.to_string(),
        });
    }
    if price > MAX_UNIT_PRICE {
        return Err(ValidationError::OutOfRange {
            field: "unit_price",
            max: MAX_UNIT_PRICE.to_string(),
            value: price.to_string(),
        });
    }
    if price.normalize().scale() > PRICE_SCALE {
        return Err(ValidationError::TooPrecise {
            field: "unit_price",
            digits: PRICE_SCALE,
            value: price.to_string(),
        });
    }
    Ok(())
}

impl NewOrder {
    /// Validate and normalize the request (username is trimmed).
    pub fn validated(self) -> Result<Self, ValidationError> {
        let username = validate_username(&self.username)?.to_owned();
        Ok(Self { username })
    }
}

impl NewOrderItem {
    /// Validate price and quantity against the column constraints.
    ///
    /// The unit price comes back at the column's scale (`14.990` -> `14.99`,
    /// `3` -> `3.00`), so totals computed from it match what is stored.
    pub fn validated(self) -> Result<Self, ValidationError> {
        validate_unit_price(self.unit_price)?;
        validate_quantity(self.quantity)?;

        let mut unit_price = self.unit_price.normalize();
        unit_price.rescale(PRICE_SCALE);
        Ok(Self { unit_price, ..self })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn username_rules() {
        assert_eq!(validate_username("  Kaneel ").unwrap(), "Kaneel");
        assert!(matches!(
            validate_username("   "),
            Err(ValidationError::Empty { .. })
        ));

        let long = "a".repeat(MAX_USERNAME_LEN + 1);
        assert!(matches!(
            validate_username(&long),
            Err(ValidationError::TooLong { max: 255, .. })
        ));
        assert!(validate_username(&"a".repeat(MAX_USERNAME_LEN)).is_ok());
    }

    #[test]
    fn quantity_must_be_positive() {
        assert!(validate_quantity(1).is_ok());
        assert!(matches!(
            validate_quantity(0),
            Err(ValidationError::NotPositive { .. })
        ));
        assert!(matches!(
            validate_quantity(-3),
            Err(ValidationError::NotPositive { .. })
        ));
    }

    #[test]
    fn unit_price_rules() {
        assert!(validate_unit_price(dec("0")).is_ok());
        assert!(validate_unit_price(dec("26.95")).is_ok());
        assert!(validate_unit_price(dec("999.99")).is_ok());
        assert!(validate_unit_price(dec("14.990")).is_ok());

        assert!(matches!(
            validate_unit_price(dec("-0.01")),
            Err(ValidationError::Negative { .. })
        ));
        assert!(matches!(
            validate_unit_price(dec("1000.00")),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert!(matches!(
            validate_unit_price(dec("1.005")),
            Err(ValidationError::TooPrecise { digits: 2, .. })
        ));
    }

    #[test]
    fn error_display() {
        let err = ValidationError::NotPositive {
            field: "quantity",
            value: "0".into(),
        };
        assert_eq!(err.to_string(), "quantity must be positive, got 0");
    }

    #[test]
    fn new_order_is_trimmed() {
        let order = NewOrder {
            username: " Dias ".into(),
        }
        .validated()
        .unwrap();
        assert_eq!(order.username, "Dias");
    }

    #[test]
    fn validated_item_price_uses_column_scale() {
        let item = NewOrderItem {
            order_id: 1,
            game_id: 2,
            unit_price: dec("14.990"),
            quantity: 5,
        }
        .validated()
        .unwrap();
        assert_eq!(item.unit_price.to_string(), "14.99");
        assert_eq!(item.unit_price.scale(), PRICE_SCALE);

        let whole = NewOrderItem {
            unit_price: dec("3"),
            ..item
        }
        .validated()
        .unwrap();
        assert_eq!(whole.unit_price.to_string(), "3.00");
    }
}
