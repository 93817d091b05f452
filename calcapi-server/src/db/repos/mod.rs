//! Repository implementations for database access
//!
//! Each collection is reached through a store trait so handlers receive
//! their storage explicitly. Every method is a single statement:
//! - Deletes report missing rows via `rows_affected`, not a prior SELECT
//! - Uniqueness is left to DB constraints, conflicts are translated

use async_trait::async_trait;

use crate::models::{Calculation, NewUser};

pub mod history;
pub mod users;

pub use history::{HistoryEntry, HistoryRepo};
pub use users::{User, UserRepo};

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    #[error("unique violation on {field}")]
    UniqueViolation { field: &'static str },
}

impl DbError {
    /// Translate an insert failure, recognising unique-constraint conflicts.
    pub(crate) fn from_insert(err: sqlx::Error, field: &'static str) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                Self::UniqueViolation { field }
            }
            _ => Self::Sqlx(err),
        }
    }
}

/// Calculation history storage
#[async_trait]
pub trait HistoryStore: Send + Sync + 'static {
    /// Insert a calculation, returning the stored row.
    async fn create(&self, calc: &Calculation) -> Result<HistoryEntry, DbError>;

    /// All entries, newest first.
    async fn list(&self) -> Result<Vec<HistoryEntry>, DbError>;

    /// Remove one entry; `NotFound` if it doesn't exist.
    async fn delete(&self, id: i32) -> Result<(), DbError>;
}

/// User registry storage
#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    /// Insert a user; `UniqueViolation` if the email is taken.
    async fn create(&self, user: &NewUser) -> Result<User, DbError>;

    async fn list(&self) -> Result<Vec<User>, DbError>;

    /// Remove one user; `NotFound` if it doesn't exist.
    async fn delete(&self, id: i32) -> Result<(), DbError>;
}
