//! User repository

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use crate::models::NewUser;
use super::{DbError, UserStore};

/// User record from database
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct User {
    pub id: i32,
    pub nome: String,
    pub email: String,
}

/// PostgreSQL-backed user store
#[derive(Clone)]
pub struct UserRepo {
    pool: PgPool,
}

impl UserRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepo {
    async fn create(&self, user: &NewUser) -> Result<User, DbError> {
        sqlx::query_as(
            r#"
            INSERT INTO usuarios (nome, email)
            VALUES ($1, $2)
            RETURNING id, nome, email
            "#,
        )
        .bind(user.nome.as_str())
        .bind(user.email.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DbError::from_insert(e, "email"))
    }

    async fn list(&self) -> Result<Vec<User>, DbError> {
        let users: Vec<User> = sqlx::query_as("SELECT id, nome, email FROM usuarios ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(users)
    }

    async fn delete(&self, id: i32) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM usuarios WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound {
                resource: "user",
                id: id.to_string(),
            });
        }
        Ok(())
    }
}
