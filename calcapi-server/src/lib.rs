//! calcapi-server: HTTP API over a calculation history and a user registry
//!
//! Exposes `/historico` and `/usuarios` CRUD endpoints backed by
//! PostgreSQL. Storage is built explicitly from a pool and injected into
//! the router; nothing reaches for a global connection.

pub mod db;
pub mod http;
pub mod models;

#[cfg(test)]
mod testing;

pub use db::{create_pool, DbSettings};
pub use http::{build_router, run_server, AppState, ServerConfig, ServerError};
