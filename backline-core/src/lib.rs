//! backline-core: the shared database connection and its settings
//!
//! Every data route in backline goes through one [`ConnectionCache`]. The
//! cache connects lazily on first use, shares a single in-flight attempt
//! between concurrent callers, and keeps the live handle for the rest of the
//! process. The driver sits behind the [`Connector`] trait so the server can
//! plug in PostgreSQL and tests can plug in stubs.

pub mod config;
pub mod connection;
pub mod error;

pub use config::{DatabaseSettings, ServerSettings, Settings};
pub use connection::{ConnectionCache, ConnectionStatus, ConnectionTarget, Connector};
pub use error::{ConfigError, ConnectionError};
