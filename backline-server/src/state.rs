//! Application state shared across handlers

use backline_core::{ConnectionError, ConnectionStatus};
use sqlx::PgPool;
use std::sync::Arc;

use crate::db::DbCache;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    db: DbCache,
}

impl AppState {
    pub fn new(db: DbCache) -> Self {
        Self {
            inner: Arc::new(AppStateInner { db }),
        }
    }

    /// The shared pool, connecting on first use.
    pub async fn pool(&self) -> Result<PgPool, ConnectionError> {
        self.inner.db.acquire().await
    }

    pub fn db(&self) -> &DbCache {
        &self.inner.db
    }

    pub fn db_status(&self) -> ConnectionStatus {
        self.inner.db.status()
    }
}
