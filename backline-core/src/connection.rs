//! Lazy, single-flight database connection cache
//!
//! [`ConnectionCache::acquire`] hands out the one shared client handle for
//! the process:
//!
//! - already connected: the cached handle is returned without suspending
//! - an attempt is in flight: the caller awaits that same attempt
//! - otherwise: a new attempt is started and published for later callers
//!
//! A successful attempt is terminal. A failed attempt puts the cache back
//! into the unconnected state so the next caller retries; there is no
//! automatic retry or backoff here.

use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt, Shared};
use serde::Serialize;

use crate::error::{ConfigError, ConnectionError};

/// URL schemes the PostgreSQL driver accepts
const SUPPORTED_SCHEMES: &[&str] = &["postgres", "postgresql"];

/// Validated database connection target.
///
/// Built once at startup. Construction fails before any network I/O when
/// the URL is missing or unusable.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionTarget {
    url: String,
}

impl ConnectionTarget {
    /// Validate a database URL.
    ///
    /// The host may be omitted from the authority when a `host=` query
    /// parameter names it instead, as with Unix-socket URLs like
    /// `postgres:///backline?host=/var/run/postgresql`.
    ///
    /// # Example
    /// ```
    /// use backline_core::ConnectionTarget;
    ///
    /// assert!(ConnectionTarget::parse("postgres://app@localhost/backline").is_ok());
    /// assert!(ConnectionTarget::parse("").is_err());
    /// assert!(ConnectionTarget::parse("mysql://localhost/backline").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let url = raw.trim();
        if url.is_empty() {
            return Err(ConfigError::MissingDatabaseUrl);
        }

        let (scheme, rest) = url.split_once("://").ok_or_else(|| ConfigError::Malformed {
            reason: "expected <scheme>://<host>/<database>".into(),
        })?;

        if !SUPPORTED_SCHEMES.contains(&scheme.to_ascii_lowercase().as_str()) {
            return Err(ConfigError::Malformed {
                reason: format!("unsupported scheme '{}', expected postgres://", scheme),
            });
        }

        let authority = rest.split(['/', '?']).next().unwrap_or_default();
        let host = authority.rsplit('@').next().unwrap_or_default();
        if host.is_empty() && !has_host_param(rest) {
            return Err(ConfigError::Malformed {
                reason: "missing host (give one in the URL or as ?host=)".into(),
            });
        }

        Ok(Self {
            url: url.to_owned(),
        })
    }

    /// The full URL, credentials included. Do not log this.
    pub fn as_str(&self) -> &str {
        &self.url
    }

    /// The URL with any password replaced by `***`.
    pub fn redacted(&self) -> String {
        let Some((scheme, rest)) = self.url.split_once("://") else {
            return self.url.clone();
        };
        let authority_end = rest.find(['/', '?']).unwrap_or(rest.len());
        let (authority, tail) = rest.split_at(authority_end);

        match authority.rsplit_once('@') {
            Some((userinfo, host)) => match userinfo.split_once(':') {
                Some((user, _password)) => format!("{scheme}://{user}:***@{host}{tail}"),
                None => self.url.clone(),
            },
            None => self.url.clone(),
        }
    }
}

fn has_host_param(rest: &str) -> bool {
    rest.split_once('?')
        .map(|(_, query)| {
            query
                .split('&')
                .any(|pair| matches!(pair.split_once('='), Some(("host", value)) if !value.is_empty()))
        })
        .unwrap_or(false)
}

impl fmt::Display for ConnectionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.redacted())
    }
}

impl fmt::Debug for ConnectionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ConnectionTarget")
            .field(&self.redacted())
            .finish()
    }
}

/// Driver seam: opens one live client handle for a target.
///
/// Implementations must confirm the connection is usable before returning;
/// the cache publishes whatever handle comes back.
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    /// Shared client handle. Cloning must be cheap and yield the same client.
    type Handle: Clone + Send + Sync + 'static;
    type Error: std::error::Error + Send + Sync + 'static;

    async fn connect(&self, target: &ConnectionTarget) -> Result<Self::Handle, Self::Error>;
}

/// Observable phase of the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Unconnected,
    Connecting,
    Connected,
}

type Attempt<H> = Shared<BoxFuture<'static, Result<H, ConnectionError>>>;

enum State<H> {
    Unconnected,
    Connecting { id: u64, attempt: Attempt<H> },
    Connected(H),
}

struct Inner<C: Connector> {
    connector: C,
    target: ConnectionTarget,
    state: Mutex<State<C::Handle>>,
    attempts: AtomicU64,
}

/// Process-lifetime cache for the shared database handle.
///
/// Cheap to clone; clones share the same state. Create one at startup and
/// pass it to whatever needs the database.
pub struct ConnectionCache<C: Connector> {
    inner: Arc<Inner<C>>,
}

impl<C: Connector> Clone for ConnectionCache<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: Connector> ConnectionCache<C> {
    /// Create an unconnected cache. Nothing is dialed until [`acquire`](Self::acquire).
    pub fn new(connector: C, target: ConnectionTarget) -> Self {
        Self {
            inner: Arc::new(Inner {
                connector,
                target,
                state: Mutex::new(State::Unconnected),
                attempts: AtomicU64::new(0),
            }),
        }
    }

    /// Return the shared handle, connecting first if needed.
    ///
    /// Concurrent callers share one attempt and all see its outcome. Must be
    /// called from within a tokio runtime, since the attempt runs on its own
    /// task.
    ///
    /// # Errors
    ///
    /// Returns the attempt's [`ConnectionError`]. The cache is already back
    /// in the unconnected state when the error is returned.
    pub async fn acquire(&self) -> Result<C::Handle, ConnectionError> {
        let (id, attempt) = {
            let mut state = self.inner.lock_state();
            let pending = match &*state {
                State::Connected(handle) => return Ok(handle.clone()),
                State::Connecting { id, attempt } => Some((*id, attempt.clone())),
                State::Unconnected => None,
            };

            match pending {
                Some(pending) => pending,
                None => {
                    let (id, attempt) = self.start_attempt();
                    *state = State::Connecting {
                        id,
                        attempt: attempt.clone(),
                    };
                    (id, attempt)
                }
            }
        };

        tracing::trace!(attempt = id, "awaiting connection attempt");
        attempt.await
    }

    /// Current phase. Never connects and never suspends.
    pub fn status(&self) -> ConnectionStatus {
        match &*self.inner.lock_state() {
            State::Unconnected => ConnectionStatus::Unconnected,
            State::Connecting { .. } => ConnectionStatus::Connecting,
            State::Connected(_) => ConnectionStatus::Connected,
        }
    }

    /// Number of connect attempts started so far.
    pub fn attempts(&self) -> u64 {
        self.inner.attempts.load(Ordering::Relaxed)
    }

    pub fn target(&self) -> &ConnectionTarget {
        &self.inner.target
    }

    pub fn connector(&self) -> &C {
        &self.inner.connector
    }

    /// Spawn the connect task. Caller holds the state lock and publishes
    /// the returned attempt before releasing it.
    fn start_attempt(&self) -> (u64, Attempt<C::Handle>) {
        let id = self.inner.attempts.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::debug!(attempt = id, target = %self.inner.target, "starting database connection attempt");

        let task = tokio::spawn(Arc::clone(&self.inner).run_attempt(id));
        let inner = Arc::clone(&self.inner);

        let attempt = async move {
            match task.await {
                Ok(result) => result,
                Err(join_err) => {
                    tracing::error!(attempt = id, error = %join_err, "connection attempt task failed");
                    inner.finish(id, None);
                    Err(ConnectionError::Aborted {
                        target: inner.target.redacted(),
                    })
                }
            }
        }
        .boxed()
        .shared();

        (id, attempt)
    }
}

impl<C: Connector> Inner<C> {
    fn lock_state(&self) -> MutexGuard<'_, State<C::Handle>> {
        // State transitions are single assignments, so a poisoned lock still
        // holds a consistent value.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn run_attempt(self: Arc<Self>, id: u64) -> Result<C::Handle, ConnectionError> {
        let started = Instant::now();
        let result = AssertUnwindSafe(self.connector.connect(&self.target))
            .catch_unwind()
            .await;

        match result {
            Ok(Ok(handle)) => {
                self.finish(id, Some(handle.clone()));
                tracing::info!(
                    attempt = id,
                    target = %self.target,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "database connected"
                );
                Ok(handle)
            }
            Ok(Err(err)) => {
                self.finish(id, None);
                tracing::warn!(
                    attempt = id,
                    target = %self.target,
                    error = %err,
                    "database connection attempt failed"
                );
                Err(ConnectionError::connect(self.target.redacted(), err))
            }
            Err(_panic) => {
                // Cleared here, not by a waiter: every caller may already be gone.
                self.finish(id, None);
                tracing::error!(attempt = id, target = %self.target, "connector panicked");
                Err(ConnectionError::Aborted {
                    target: self.target.redacted(),
                })
            }
        }
    }

    /// Resolve attempt `id`. Ignored unless that attempt is still the pending one.
    fn finish(&self, id: u64, handle: Option<C::Handle>) {
        let mut state = self.lock_state();
        if matches!(&*state, State::Connecting { id: current, .. } if *current == id) {
            *state = match handle {
                Some(handle) => State::Connected(handle),
                None => State::Unconnected,
            };
        }
    }
}

impl<C: Connector> fmt::Debug for ConnectionCache<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionCache")
            .field("target", &self.inner.target)
            .field("status", &self.status())
            .field("attempts", &self.attempts())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_postgres_urls() {
        assert!(ConnectionTarget::parse("postgres://localhost/backline").is_ok());
        assert!(ConnectionTarget::parse("postgresql://u:p@db:5432/backline?sslmode=require").is_ok());
        assert!(ConnectionTarget::parse("  postgres://db  ").is_ok());
    }

    #[test]
    fn accepts_socket_host_in_query() {
        let target =
            ConnectionTarget::parse("postgres:///backline?host=/var/run/postgresql").unwrap();
        assert_eq!(target.as_str(), "postgres:///backline?host=/var/run/postgresql");
        assert!(ConnectionTarget::parse("postgres://app:pw@/backline?sslmode=disable&host=/tmp").is_ok());
    }

    #[test]
    fn empty_url_is_missing() {
        assert!(matches!(
            ConnectionTarget::parse(""),
            Err(ConfigError::MissingDatabaseUrl)
        ));
        assert!(matches!(
            ConnectionTarget::parse("   "),
            Err(ConfigError::MissingDatabaseUrl)
        ));
    }

    #[test]
    fn rejects_malformed_urls() {
        for raw in [
            "localhost/backline",
            "mongodb://localhost/backline",
            "postgres:///backline",
            "postgres://user:pw@/backline",
            "postgres:///backline?host=",
            "postgres:///backline?sslmode=disable",
        ] {
            assert!(
                matches!(ConnectionTarget::parse(raw), Err(ConfigError::Malformed { .. })),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn redacts_password() {
        let target = ConnectionTarget::parse("postgres://app:s3cret@db:5432/backline").unwrap();
        assert_eq!(target.to_string(), "postgres://app:***@db:5432/backline");
        assert!(!format!("{:?}", target).contains("s3cret"));
        assert_eq!(target.as_str(), "postgres://app:s3cret@db:5432/backline");
    }

    #[test]
    fn redaction_leaves_passwordless_urls_alone() {
        let target = ConnectionTarget::parse("postgres://app@db/backline").unwrap();
        assert_eq!(target.to_string(), "postgres://app@db/backline");

        let target = ConnectionTarget::parse("postgres://db/backline").unwrap();
        assert_eq!(target.to_string(), "postgres://db/backline");
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&ConnectionStatus::Connecting).unwrap();
        assert_eq!(json, "\"connecting\"");
    }
}
