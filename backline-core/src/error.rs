//! Error types for backline-core.
//!
//! Configuration problems are fatal and surface at startup. Connection
//! failures are per attempt: the cache resets and a later call may retry.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

/// Startup configuration error. The process must not serve traffic.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No database URL was provided anywhere
    #[error("DATABASE_URL is not set (use --database-url, the DATABASE_URL env var, or [database].url in the config file)")]
    MissingDatabaseUrl,

    /// A database URL was provided but cannot be used
    #[error("malformed database URL: {reason}")]
    Malformed { reason: String },

    /// An override (env var or file key) has an unusable value
    #[error("invalid value for {key}: '{value}' ({reason})")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },

    /// The settings file could not be read or parsed
    #[error("failed to load config file {path:?}: {reason}")]
    File { path: PathBuf, reason: String },
}

/// A failed connection attempt.
///
/// Cloneable so that a single failure can be handed to every caller that
/// was waiting on the same attempt.
#[derive(Error, Debug, Clone)]
pub enum ConnectionError {
    /// The driver could not connect (network, auth, DNS, ...)
    #[error("failed to connect to {target}: {source}")]
    Connect {
        /// Redacted connection target
        target: String,
        #[source]
        source: Arc<dyn std::error::Error + Send + Sync>,
    },

    /// The attempt task died before producing a result
    #[error("connection attempt to {target} was aborted")]
    Aborted { target: String },
}

impl ConnectionError {
    pub(crate) fn connect<E>(target: String, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Connect {
            target,
            source: Arc::new(source),
        }
    }
}
