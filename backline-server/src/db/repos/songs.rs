//! Song repository
//!
//! Filtering uses `$n IS NULL OR ...` guards so one prepared statement
//! covers every combination of album/genre/search.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{like_pattern, window_total, DbError};
use crate::models::{NewSong, Paginated, Pagination, SongFilter};

/// Song record from database
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Song {
    pub id: Uuid,
    pub title: String,
    pub artist: String,
    pub album_id: Option<Uuid>,
    pub audio_url: String,
    pub cover_url: Option<String>,
    pub duration_secs: Option<i32>,
    pub genre: Option<String>,
    pub lyrics: Option<String>,
    pub plays: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

const FILTER_CLAUSE: &str = r#"
    ($1::uuid IS NULL OR album_id = $1)
    AND ($2::text IS NULL OR genre = $2)
    AND ($3::text IS NULL OR title ILIKE $3 OR artist ILIKE $3)
"#;

/// Song repository
pub struct SongRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> SongRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a song. An unknown `album_id` is reported as a missing album.
    pub async fn create(&self, song: NewSong) -> Result<Song, DbError> {
        sqlx::query_as::<_, Song>(
            r#"
            INSERT INTO songs
                (title, artist, album_id, audio_url, cover_url, duration_secs, genre, lyrics)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(&song.title)
        .bind(&song.artist)
        .bind(song.album_id)
        .bind(&song.audio_url)
        .bind(&song.cover_url)
        .bind(song.duration_secs)
        .bind(&song.genre)
        .bind(&song.lyrics)
        .fetch_one(self.pool)
        .await
        .map_err(|e| album_fk_error(e, song.album_id))
    }

    /// List songs newest first.
    pub async fn list(&self, filter: &SongFilter, page: Pagination) -> Result<Paginated<Song>, DbError> {
        let pattern = filter.search.as_deref().map(like_pattern);

        let rows = sqlx::query(&format!(
            r#"
            SELECT *, COUNT(*) OVER() AS total
            FROM songs
            WHERE {FILTER_CLAUSE}
            ORDER BY created_at DESC
            LIMIT $4 OFFSET $5
            "#
        ))
        .bind(filter.album_id)
        .bind(filter.genre.as_deref())
        .bind(pattern.as_deref())
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(self.pool)
        .await?;

        // Past the last page the window total is unavailable
        let total_count = if rows.is_empty() && page.offset() > 0 {
            sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM songs WHERE {FILTER_CLAUSE}"))
                .bind(filter.album_id)
                .bind(filter.genre.as_deref())
                .bind(pattern.as_deref())
                .fetch_one(self.pool)
                .await?
        } else {
            window_total(&rows)?
        };

        let items = rows
            .iter()
            .map(Song::from_row)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Paginated {
            items,
            total_count,
            page,
        })
    }

    /// Tracks on an album, oldest first.
    pub async fn list_for_album(&self, album_id: Uuid) -> Result<Vec<Song>, DbError> {
        let songs = sqlx::query_as::<_, Song>(
            "SELECT * FROM songs WHERE album_id = $1 ORDER BY created_at ASC",
        )
        .bind(album_id)
        .fetch_all(self.pool)
        .await?;

        Ok(songs)
    }

    pub async fn get(&self, id: Uuid) -> Result<Song, DbError> {
        sqlx::query_as::<_, Song>("SELECT * FROM songs WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// Replace the editable fields of a song. `plays` is left alone.
    pub async fn update(&self, id: Uuid, song: NewSong) -> Result<Song, DbError> {
        sqlx::query_as::<_, Song>(
            r#"
            UPDATE songs
            SET title = $2,
                artist = $3,
                album_id = $4,
                audio_url = $5,
                cover_url = $6,
                duration_secs = $7,
                genre = $8,
                lyrics = $9,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&song.title)
        .bind(&song.artist)
        .bind(song.album_id)
        .bind(&song.audio_url)
        .bind(&song.cover_url)
        .bind(song.duration_secs)
        .bind(&song.genre)
        .bind(&song.lyrics)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| album_fk_error(e, song.album_id))?
        .ok_or_else(|| not_found(id))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM songs WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }

    /// Count one play and return the updated song.
    pub async fn record_play(&self, id: Uuid) -> Result<Song, DbError> {
        sqlx::query_as::<_, Song>(
            "UPDATE songs SET plays = plays + 1 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| not_found(id))
    }
}

fn not_found(id: Uuid) -> DbError {
    DbError::NotFound {
        resource: "song",
        id: id.to_string(),
    }
}

fn album_fk_error(err: sqlx::Error, album_id: Option<Uuid>) -> DbError {
    match (&err, album_id) {
        (sqlx::Error::Database(db_err), Some(album_id)) if db_err.is_foreign_key_violation() => {
            DbError::NotFound {
                resource: "album",
                id: album_id.to_string(),
            }
        }
        _ => DbError::Sqlx(err),
    }
}
