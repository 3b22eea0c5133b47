//! Database error type
//!
//! `Store` and `IntegrityViolation` together are the store-error family:
//! any failed insert, query or row decode during a live operation.
//! `IntegrityViolation` is the subset raised by a store constraint
//! (foreign key, check, not null).

use orderctl_core::ValidationError;
use sqlx::error::ErrorKind;

use super::pool::ConnectionError;

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error("{context}: {source}")]
    Store {
        context: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("{context}: integrity violation: {detail}")]
    IntegrityViolation {
        context: &'static str,
        detail: String,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl DbError {
    /// Wrap a sqlx error with operation context, classifying constraint
    /// violations as `IntegrityViolation`.
    pub fn from_sqlx(context: &'static str, source: sqlx::Error) -> Self {
        if let Some(db_err) = source.as_database_error() {
            match db_err.kind() {
                ErrorKind::ForeignKeyViolation
                | ErrorKind::CheckViolation
                | ErrorKind::NotNullViolation => {
                    return Self::IntegrityViolation {
                        context,
                        detail: db_err.message().to_owned(),
                    };
                }
                _ => {}
            }
        }
        Self::Store { context, source }
    }

    /// `map_err` adapter: `.map_err(DbError::store("error inserting order"))`
    pub fn store(context: &'static str) -> impl FnOnce(sqlx::Error) -> Self {
        move |source| Self::from_sqlx(context, source)
    }

    /// Store failure that did not come from the driver (decode, in-memory store).
    pub fn store_message(context: &'static str, message: impl Into<String>) -> Self {
        Self::Store {
            context,
            source: sqlx::Error::Protocol(message.into()),
        }
    }

    /// True for the store-error family, including integrity violations.
    pub fn is_store_error(&self) -> bool {
        matches!(self, Self::Store { .. } | Self::IntegrityViolation { .. })
    }

    pub fn is_integrity_violation(&self) -> bool {
        matches!(self, Self::IntegrityViolation { .. })
    }
}
