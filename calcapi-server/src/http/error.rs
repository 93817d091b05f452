//! API error types with IntoResponse
//!
//! Every failure becomes `{"error": <message>, "code": <kind>}`. Storage
//! details are logged, never returned.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::db::repos::DbError;
use crate::models::ValidationError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Validation failed (400)
    Validation(ValidationError),

    /// Body could not be read as the expected JSON record (400)
    MalformedBody { message: String },

    /// Resource not found (404)
    NotFound { resource: &'static str, id: String },

    /// Route exists but not for this method (405)
    MethodNotAllowed { method: String, path: String },

    /// Unique constraint hit (500, storage-level failure)
    UniqueViolation { field: &'static str },

    /// Database error (500, logged)
    Database(DbError),
}

impl ApiError {
    /// Stable machine-readable kind, sent as `code`
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) | Self::MalformedBody { .. } => "validation_error",
            Self::NotFound { .. } => "not_found",
            Self::MethodNotAllowed { .. } => "method_not_allowed",
            Self::UniqueViolation { .. } => "unique_violation",
            Self::Database(_) => "internal_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::MalformedBody { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            Self::UniqueViolation { .. } | Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match &self {
            Self::Validation(e) => e.to_string(),
            Self::MalformedBody { message } => message.clone(),
            Self::NotFound { resource, id } => format!("{} '{}' not found", resource, id),
            Self::MethodNotAllowed { method, path } => {
                format!("method {} not allowed on {}", method, path)
            }
            Self::UniqueViolation { field } => {
                tracing::warn!(field = %field, "unique constraint violated");
                format!("{} already registered", field)
            }
            Self::Database(e) => {
                // Log the actual error, return generic message
                tracing::error!("Database error: {}", e);
                "an internal error occurred".to_owned()
            }
        };

        let body = json!({
            "error": message,
            "code": self.code(),
        });

        (self.status(), Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound { resource, id } => Self::NotFound { resource, id },
            DbError::UniqueViolation { field } => Self::UniqueViolation { field },
            _ => Self::Database(e),
        }
    }
}
