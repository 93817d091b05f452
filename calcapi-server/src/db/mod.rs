//! Database layer - connection pool, schema and repositories
//!
//! # Design Principles
//!
//! - One pool, built explicitly and handed to repositories (no global state)
//! - One statement per operation, no multi-statement transactions
//! - Rely on DB constraints, handle conflicts - no check-then-insert

pub mod pool;
pub mod repos;
pub mod schema;

pub use pool::{create_pool, create_pool_with_options, DbSettings, DEFAULT_MAX_CONNECTIONS};
pub use repos::*;
pub use schema::ensure_schema;
