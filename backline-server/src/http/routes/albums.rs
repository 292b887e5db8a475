//! Album endpoints

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::db::repos::{Album, AlbumRepo, AlbumWithCount, Song, SongRepo};
use crate::http::error::ApiError;
use crate::http::extractors::ValidUuid;
use crate::models::song::search_term;
use crate::models::{AlbumRequest, NewAlbum, PageResponse, Pagination, PaginationParams};
use crate::state::AppState;

/// `GET /api/albums` query string
#[derive(Debug, Default, Deserialize)]
pub struct AlbumListParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub q: Option<String>,
}

/// Album with its tracks
#[derive(Serialize)]
pub struct AlbumDetail {
    #[serde(flatten)]
    pub album: AlbumWithCount,
    pub tracks: Vec<Song>,
}

/// GET /api/albums - list albums with track counts
async fn list_albums(
    State(state): State<AppState>,
    Query(params): Query<AlbumListParams>,
) -> Result<Json<PageResponse<AlbumWithCount>>, ApiError> {
    let search = search_term(params.q.as_deref())?;
    let page = Pagination::from(PaginationParams {
        page: params.page,
        limit: params.limit,
    });

    let pool = state.pool().await?;
    let result = AlbumRepo::new(&pool).list(search.as_deref(), page).await?;

    Ok(Json(PageResponse::from(result)))
}

/// POST /api/albums - create an album
async fn create_album(
    State(state): State<AppState>,
    Json(req): Json<AlbumRequest>,
) -> Result<(StatusCode, Json<Album>), ApiError> {
    let album = NewAlbum::try_from(req)?;

    let pool = state.pool().await?;
    let created = AlbumRepo::new(&pool).create(album).await?;
    tracing::info!(album_id = %created.id, title = %created.title, "album created");

    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/albums/{id} - album plus tracks
async fn get_album(
    State(state): State<AppState>,
    ValidUuid(id): ValidUuid,
) -> Result<Json<AlbumDetail>, ApiError> {
    let pool = state.pool().await?;
    let album = AlbumRepo::new(&pool).get(id).await?;
    let tracks = SongRepo::new(&pool).list_for_album(id).await?;

    Ok(Json(AlbumDetail { album, tracks }))
}

/// PUT /api/albums/{id}
async fn update_album(
    State(state): State<AppState>,
    ValidUuid(id): ValidUuid,
    Json(req): Json<AlbumRequest>,
) -> Result<Json<Album>, ApiError> {
    let album = NewAlbum::try_from(req)?;

    let pool = state.pool().await?;
    let updated = AlbumRepo::new(&pool).update(id, album).await?;
    Ok(Json(updated))
}

/// DELETE /api/albums/{id} - tracks stay, detached from the album
async fn delete_album(
    State(state): State<AppState>,
    ValidUuid(id): ValidUuid,
) -> Result<StatusCode, ApiError> {
    let pool = state.pool().await?;
    AlbumRepo::new(&pool).delete(id).await?;
    tracing::info!(album_id = %id, "album deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Album routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/albums", get(list_albums).post(create_album))
        .route(
            "/api/albums/{id}",
            get(get_album).put(update_album).delete(delete_album),
        )
}
