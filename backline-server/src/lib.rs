//! backline-server: JSON API over the shared database connection
//!
//! Songs, albums and contact submissions stored in PostgreSQL. Every data
//! route acquires the pool through the [`backline_core::ConnectionCache`]
//! held in [`AppState`], so the first request connects and the rest reuse
//! that connection.

pub mod db;
pub mod http;
pub mod models;
pub mod state;

pub use http::{build_router, run_server, ServerConfig, ServerError};
pub use state::AppState;
