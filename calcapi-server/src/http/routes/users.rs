//! User registry endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    routing::{delete, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::db::repos::User;
use crate::http::error::ApiError;
use crate::http::extractors::{JsonBody, RowId};
use crate::http::server::AppState;
use crate::models::NewUser;

use super::MessageResponse;

/// Register user request
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub nome: Option<String>,
    pub email: Option<String>,
}

/// User response
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i32,
    pub nome: String,
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            nome: u.nome,
            email: u.email,
        }
    }
}

/// GET /usuarios - all users
async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = state.users.list().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// POST /usuarios - register a user (200, not 201, for existing clients)
async fn create_user(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<CreateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = NewUser::new(req.nome.as_deref(), req.email.as_deref())?;
    let created = state.users.create(&user).await?;

    tracing::debug!(id = created.id, "user registered");
    Ok(Json(UserResponse::from(created)))
}

/// DELETE /usuarios/{id} - remove a user
async fn delete_user(
    State(state): State<Arc<AppState>>,
    RowId(id): RowId,
) -> Result<Json<MessageResponse>, ApiError> {
    state.users.delete(id).await?;
    Ok(Json(MessageResponse::new("user deleted")))
}

/// User routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/usuarios", get(list_users).post(create_user))
        .route("/usuarios/{id}", delete(delete_user))
}
