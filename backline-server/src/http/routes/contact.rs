//! Contact form endpoints
//!
//! Submissions are stored only; forwarding them by email is handled
//! elsewhere.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::db::repos::{ContactMessage, ContactRepo};
use crate::http::error::ApiError;
use crate::models::{ContactRequest, NewContactMessage, PageResponse, Pagination, PaginationParams};
use crate::state::AppState;

/// POST /api/contact
async fn submit(
    State(state): State<AppState>,
    Json(req): Json<ContactRequest>,
) -> Result<(StatusCode, Json<ContactMessage>), ApiError> {
    let msg = NewContactMessage::try_from(req)?;

    let pool = state.pool().await?;
    let stored = ContactRepo::new(&pool).create(msg).await?;
    tracing::info!(message_id = %stored.id, "contact message stored");

    Ok((StatusCode::CREATED, Json(stored)))
}

/// GET /api/contact - newest submissions first
async fn list(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<PageResponse<ContactMessage>>, ApiError> {
    let pool = state.pool().await?;
    let result = ContactRepo::new(&pool)
        .list(Pagination::from(params))
        .await?;

    Ok(Json(PageResponse::from(result)))
}

/// Contact routes
pub fn router() -> Router<AppState> {
    Router::new().route("/api/contact", get(list).post(submit))
}
