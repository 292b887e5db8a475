//! Song endpoints
//!
//! Input is validated before the database is touched, so bad requests get
//! a 400 even while the database is unreachable.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use crate::db::repos::{Song, SongRepo};
use crate::http::error::ApiError;
use crate::http::extractors::ValidUuid;
use crate::models::{NewSong, PageResponse, SongFilter, SongListParams, SongRequest};
use crate::state::AppState;

/// GET /api/songs - list songs with pagination and filters
async fn list_songs(
    State(state): State<AppState>,
    Query(params): Query<SongListParams>,
) -> Result<Json<PageResponse<Song>>, ApiError> {
    let filter = SongFilter::from_params(&params)?;
    let page = params.pagination();

    let pool = state.pool().await?;
    let result = SongRepo::new(&pool).list(&filter, page).await?;

    Ok(Json(PageResponse::from(result)))
}

/// POST /api/songs - create a song
async fn create_song(
    State(state): State<AppState>,
    Json(req): Json<SongRequest>,
) -> Result<(StatusCode, Json<Song>), ApiError> {
    let song = NewSong::try_from(req)?;

    let pool = state.pool().await?;
    let created = SongRepo::new(&pool).create(song).await?;
    tracing::info!(song_id = %created.id, title = %created.title, "song created");

    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/songs/{id}
async fn get_song(
    State(state): State<AppState>,
    ValidUuid(id): ValidUuid,
) -> Result<Json<Song>, ApiError> {
    let pool = state.pool().await?;
    let song = SongRepo::new(&pool).get(id).await?;
    Ok(Json(song))
}

/// PUT /api/songs/{id}
async fn update_song(
    State(state): State<AppState>,
    ValidUuid(id): ValidUuid,
    Json(req): Json<SongRequest>,
) -> Result<Json<Song>, ApiError> {
    let song = NewSong::try_from(req)?;

    let pool = state.pool().await?;
    let updated = SongRepo::new(&pool).update(id, song).await?;
    Ok(Json(updated))
}

/// DELETE /api/songs/{id}
async fn delete_song(
    State(state): State<AppState>,
    ValidUuid(id): ValidUuid,
) -> Result<StatusCode, ApiError> {
    let pool = state.pool().await?;
    SongRepo::new(&pool).delete(id).await?;
    tracing::info!(song_id = %id, "song deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/songs/{id}/play - count a play
async fn play_song(
    State(state): State<AppState>,
    ValidUuid(id): ValidUuid,
) -> Result<Json<Song>, ApiError> {
    let pool = state.pool().await?;
    let song = SongRepo::new(&pool).record_play(id).await?;
    Ok(Json(song))
}

/// Song routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/songs", get(list_songs).post(create_song))
        .route(
            "/api/songs/{id}",
            get(get_song).put(update_song).delete(delete_song),
        )
        .route("/api/songs/{id}/play", post(play_song))
}
