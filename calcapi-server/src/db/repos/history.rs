//! History repository
//!
//! Calculation log: insert, list newest first, delete by id.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};

use crate::models::Calculation;
use super::{DbError, HistoryStore};

/// History record from database
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct HistoryEntry {
    pub id: i32,
    pub numero1: Decimal,
    pub numero2: Decimal,
    pub resultado: Decimal,
    /// NULL only in tables created before the column was `NOT NULL`
    pub data_hora: Option<NaiveDateTime>,
}

/// PostgreSQL-backed history store
#[derive(Clone)]
pub struct HistoryRepo {
    pool: PgPool,
}

impl HistoryRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HistoryStore for HistoryRepo {
    async fn create(&self, calc: &Calculation) -> Result<HistoryEntry, DbError> {
        let entry: HistoryEntry = sqlx::query_as(
            r#"
            INSERT INTO historico (numero1, numero2, resultado)
            VALUES ($1, $2, $3)
            RETURNING id, numero1, numero2, resultado, data_hora
            "#,
        )
        .bind(calc.numero1())
        .bind(calc.numero2())
        .bind(calc.resultado())
        .fetch_one(&self.pool)
        .await?;

        Ok(entry)
    }

    async fn list(&self) -> Result<Vec<HistoryEntry>, DbError> {
        let entries: Vec<HistoryEntry> = sqlx::query_as(
            r#"
            SELECT id, numero1, numero2, resultado, data_hora
            FROM historico
            ORDER BY data_hora DESC NULLS LAST, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    async fn delete(&self, id: i32) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM historico WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound {
                resource: "history entry",
                id: id.to_string(),
            });
        }
        Ok(())
    }
}
