//! Health check endpoints

use axum::{extract::State, routing::get, Json, Router};
use backline_core::ConnectionStatus;
use serde::Serialize;

use crate::state::AppState;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Database connection report. Reading it never triggers a connect.
#[derive(Serialize)]
pub struct DbHealthResponse {
    pub status: ConnectionStatus,
    pub attempts: u64,
}

/// GET /health
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// GET /health/db
async fn db_health(State(state): State<AppState>) -> Json<DbHealthResponse> {
    Json(DbHealthResponse {
        status: state.db_status(),
        attempts: state.db().attempts(),
    })
}

/// Health routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/db", get(db_health))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn health_returns_ok() {
        let Json(body) = health().await;
        assert_eq!(body.status, "ok");
    }
}
