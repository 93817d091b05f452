//! Test fixtures: in-memory stores and request helpers

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

use crate::db::repos::{DbError, HistoryEntry, HistoryStore, User, UserStore};
use crate::db::{create_pool, ensure_schema, DbSettings};
use crate::http::{build_router, AppState, ServerConfig};
use crate::models::{Calculation, NewUser};

/// Mirrors `NUMERIC(10,2)` storage
fn stored(value: Decimal) -> Decimal {
    let mut value = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    value.rescale(2);
    value
}

#[derive(Default)]
pub struct MemoryHistory {
    rows: Mutex<Vec<HistoryEntry>>,
    next_id: Mutex<i32>,
}

impl MemoryHistory {
    /// Start from existing rows, as if adopting an older table
    pub fn with_rows(rows: Vec<HistoryEntry>) -> Self {
        let next_id = rows.iter().map(|r| r.id).max().unwrap_or(0);
        Self {
            rows: Mutex::new(rows),
            next_id: Mutex::new(next_id),
        }
    }
}

#[async_trait]
impl HistoryStore for MemoryHistory {
    async fn create(&self, calc: &Calculation) -> Result<HistoryEntry, DbError> {
        let mut rows = self.rows.lock().unwrap();
        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;

        let entry = HistoryEntry {
            id: *next_id,
            numero1: stored(calc.numero1()),
            numero2: stored(calc.numero2()),
            resultado: stored(calc.resultado()),
            data_hora: Some(chrono::Utc::now().naive_utc()),
        };
        rows.push(entry.clone());
        Ok(entry)
    }

    async fn list(&self) -> Result<Vec<HistoryEntry>, DbError> {
        let mut rows = self.rows.lock().unwrap().clone();
        // `None < Some`, so descending order puts NULL timestamps last
        rows.sort_by(|a, b| b.data_hora.cmp(&a.data_hora).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    async fn delete(&self, id: i32) -> Result<(), DbError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| r.id != id);
        if rows.len() == before {
            return Err(DbError::NotFound {
                resource: "history entry",
                id: id.to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryUsers {
    rows: Mutex<Vec<User>>,
    next_id: Mutex<i32>,
}

#[async_trait]
impl UserStore for MemoryUsers {
    async fn create(&self, user: &NewUser) -> Result<User, DbError> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|u| u.email == user.email.as_str()) {
            return Err(DbError::UniqueViolation { field: "email" });
        }

        // SERIAL keeps counting even after deletes
        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;

        let created = User {
            id: *next_id,
            nome: user.nome.as_str().to_owned(),
            email: user.email.as_str().to_owned(),
        };
        rows.push(created.clone());
        Ok(created)
    }

    async fn list(&self) -> Result<Vec<User>, DbError> {
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn delete(&self, id: i32) -> Result<(), DbError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|u| u.id != id);
        if rows.len() == before {
            return Err(DbError::NotFound {
                resource: "user",
                id: id.to_string(),
            });
        }
        Ok(())
    }
}

/// Every call fails the way an unreachable database does
pub struct FailingStore;

#[async_trait]
impl HistoryStore for FailingStore {
    async fn create(&self, _calc: &Calculation) -> Result<HistoryEntry, DbError> {
        Err(DbError::Sqlx(sqlx::Error::PoolTimedOut))
    }

    async fn list(&self) -> Result<Vec<HistoryEntry>, DbError> {
        Err(DbError::Sqlx(sqlx::Error::PoolTimedOut))
    }

    async fn delete(&self, _id: i32) -> Result<(), DbError> {
        Err(DbError::Sqlx(sqlx::Error::PoolTimedOut))
    }
}

#[async_trait]
impl UserStore for FailingStore {
    async fn create(&self, _user: &NewUser) -> Result<User, DbError> {
        Err(DbError::Sqlx(sqlx::Error::PoolTimedOut))
    }

    async fn list(&self) -> Result<Vec<User>, DbError> {
        Err(DbError::Sqlx(sqlx::Error::PoolTimedOut))
    }

    async fn delete(&self, _id: i32) -> Result<(), DbError> {
        Err(DbError::Sqlx(sqlx::Error::PoolTimedOut))
    }
}

/// Router wired to in-memory storage
pub struct TestApp {
    pub router: Router,
}

impl TestApp {
    pub fn state() -> AppState {
        AppState::new(
            Arc::new(MemoryHistory::default()),
            Arc::new(MemoryUsers::default()),
        )
    }

    pub fn new() -> Self {
        Self {
            router: build_router(Self::state(), &ServerConfig::default()),
        }
    }

    pub fn with_history(history: MemoryHistory) -> Self {
        let state = AppState::new(Arc::new(history), Arc::new(MemoryUsers::default()));
        Self {
            router: build_router(state, &ServerConfig::default()),
        }
    }

    pub fn failing() -> Self {
        let state = AppState::new(Arc::new(FailingStore), Arc::new(FailingStore));
        Self {
            router: build_router(state, &ServerConfig::default()),
        }
    }
}

/// Send one request, returning status and parsed JSON body (`Null` if empty)
pub async fn send(
    router: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, value)
}

/// Pool against `DATABASE_URL` with the schema in place
pub async fn pg_pool() -> PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
    let pool = create_pool(&DbSettings::Url(url)).expect("pool creation failed");
    ensure_schema(&pool).await.expect("schema creation failed");
    pool
}

/// Email that won't collide with earlier runs
pub fn unique_email(local: &str) -> String {
    let nanos = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
    format!("{}-{}@test.local", local, nanos)
}
