//! Custom Axum extractors
//!
//! Both reject with [`ApiError`] so path and body problems share the JSON
//! error shape.

use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;

use crate::models::ValidationError;
use super::error::ApiError;

/// Extract a row id (positive `SERIAL`) from the path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowId(pub i32);

impl<S> FromRequestParts<S> for RowId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::Validation(ValidationError::Missing { field: "id" }))?;

        parse_row_id(&id).map(Self).map_err(ApiError::Validation)
    }
}

fn parse_row_id(raw: &str) -> Result<i32, ValidationError> {
    match raw.parse::<i32>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ValidationError::InvalidFormat {
            field: "id",
            reason: "must be a positive integer",
        }),
    }
}

/// `Json<T>` whose rejection is an [`ApiError`]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::MalformedBody {
                message: rejection.body_text(),
            })?;

        Ok(Self(value))
    }
}
