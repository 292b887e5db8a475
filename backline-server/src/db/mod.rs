//! Database layer - connector, migrations and repositories
//!
//! # Design Principles
//!
//! - One pool per process, reached through the connection cache
//! - List operations return the total with `COUNT(*) OVER()` in one query
//! - Rely on DB constraints (foreign keys) instead of check-then-insert

pub mod migrations;
pub mod pool;
pub mod repos;

pub use pool::{create_cache, DbCache, PgConnector};
pub use repos::*;
