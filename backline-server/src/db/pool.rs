//! PostgreSQL connector for the shared connection cache
//!
//! Uses sqlx PgPool with explicit connection limits. The pool is opened
//! eagerly and checked before it is handed out, so queries never queue up
//! against a database that was never reached.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use backline_core::{ConfigError, ConnectionCache, ConnectionTarget, Connector, DatabaseSettings};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;

/// Default maximum connections for the pool.
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Default time to wait for a pooled connection
const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection cache specialised to PostgreSQL
pub type DbCache = ConnectionCache<PgConnector>;

/// Opens the process-wide [`PgPool`] for whichever target the cache hands it.
#[derive(Debug, Clone)]
pub struct PgConnector {
    max_connections: u32,
    acquire_timeout: Duration,
}

impl PgConnector {
    /// Build a connector after checking that sqlx understands `target`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Malformed`] if sqlx cannot parse the URL. No
    /// network I/O happens here.
    pub fn new(target: &ConnectionTarget) -> Result<Self, ConfigError> {
        connect_options(target).map_err(|e| ConfigError::Malformed {
            reason: e.to_string(),
        })?;

        Ok(Self {
            max_connections: DEFAULT_MAX_CONNECTIONS,
            acquire_timeout: DEFAULT_ACQUIRE_TIMEOUT,
        })
    }

    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections.max(1);
        self
    }

    pub fn with_acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    pub fn max_connections(&self) -> u32 {
        self.max_connections
    }
}

#[async_trait]
impl Connector for PgConnector {
    type Handle = PgPool;
    type Error = sqlx::Error;

    async fn connect(&self, target: &ConnectionTarget) -> Result<PgPool, sqlx::Error> {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .acquire_timeout(self.acquire_timeout)
            .test_before_acquire(true)
            .connect_with(connect_options(target)?)
            .await
    }
}

fn connect_options(target: &ConnectionTarget) -> Result<PgConnectOptions, sqlx::Error> {
    PgConnectOptions::from_str(target.as_str())
}

/// Build the unconnected cache from settings.
///
/// Fails fast on a missing or malformed URL; the first
/// [`acquire`](ConnectionCache::acquire) does the actual connect.
///
/// # Example
///
/// ```ignore
/// let cache = create_cache(&settings.database)?;
/// let pool = cache.acquire().await?;
/// ```
pub fn create_cache(settings: &DatabaseSettings) -> Result<DbCache, ConfigError> {
    let target = settings.target()?;
    let connector = PgConnector::new(&target)?
        .with_max_connections(settings.max_connections)
        .with_acquire_timeout(settings.acquire_timeout());

    Ok(ConnectionCache::new(connector, target))
}
