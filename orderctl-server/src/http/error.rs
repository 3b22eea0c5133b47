//! API error types with IntoResponse
//!
//! Errors are converted to JSON responses with appropriate status codes.
//! Store and connection failures are logged and answered with a fixed body;
//! internal detail never reaches the client.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::db::DbError;
use orderctl_core::ValidationError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Validation failed (400)
    Validation(ValidationError),

    /// Referenced order or catalog entry does not exist (409)
    Conflict { detail: String },

    /// Database error (500, logged)
    Database(DbError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::Validation(e) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "validation_error",
                    "message": e.to_string()
                }),
            ),
            Self::Conflict { detail } => {
                tracing::warn!(detail = %detail, "Integrity violation");
                (
                    StatusCode::CONFLICT,
                    json!({
                        "error": "integrity_violation",
                        "message": "referenced order or game does not exist"
                    }),
                )
            }
            Self::Database(e) => {
                // Log the actual error, return generic message
                tracing::error!(error = %e, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": "internal_error",
                        "message": "an internal error occurred"
                    }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::Validation(v) => Self::Validation(v),
            DbError::IntegrityViolation { detail, .. } => Self::Conflict { detail },
            other => Self::Database(other),
        }
    }
}
