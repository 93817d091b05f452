//! Calculation history endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::db::repos::HistoryEntry;
use crate::http::error::ApiError;
use crate::http::extractors::{JsonBody, RowId};
use crate::http::server::AppState;
use crate::models::Calculation;

use super::MessageResponse;

/// Record calculation request
///
/// All three fields are required; `null` counts as missing.
#[derive(Debug, Deserialize)]
pub struct CreateHistoryRequest {
    pub numero1: Option<Decimal>,
    pub numero2: Option<Decimal>,
    pub resultado: Option<Decimal>,
}

/// History entry response
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub id: i32,
    pub numero1: Decimal,
    pub numero2: Decimal,
    pub resultado: Decimal,
    pub data_hora: Option<NaiveDateTime>,
}

impl From<HistoryEntry> for HistoryResponse {
    fn from(e: HistoryEntry) -> Self {
        Self {
            id: e.id,
            numero1: e.numero1,
            numero2: e.numero2,
            resultado: e.resultado,
            data_hora: e.data_hora,
        }
    }
}

/// GET /historico - all calculations, newest first
async fn list_history(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<HistoryResponse>>, ApiError> {
    let entries = state.history.list().await?;
    Ok(Json(entries.into_iter().map(HistoryResponse::from).collect()))
}

/// POST /historico - record a calculation
async fn create_history(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<CreateHistoryRequest>,
) -> Result<(StatusCode, Json<HistoryResponse>), ApiError> {
    let calc = Calculation::new(req.numero1, req.numero2, req.resultado)?;
    let entry = state.history.create(&calc).await?;

    tracing::debug!(id = entry.id, "calculation recorded");
    Ok((StatusCode::CREATED, Json(HistoryResponse::from(entry))))
}

/// DELETE /historico/{id} - remove a calculation
async fn delete_history(
    State(state): State<Arc<AppState>>,
    RowId(id): RowId,
) -> Result<Json<MessageResponse>, ApiError> {
    state.history.delete(id).await?;
    Ok(Json(MessageResponse::new("calculation deleted")))
}

/// History routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/historico", get(list_history).post(create_history))
        .route("/historico/{id}", delete(delete_history))
}
