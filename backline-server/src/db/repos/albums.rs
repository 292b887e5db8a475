//! Album repository
//!
//! Handles album CRUD:
//! - list: LEFT JOIN with track count (no N+1)
//! - delete: songs survive as singles via ON DELETE SET NULL

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, Row};
use uuid::Uuid;

use super::{like_pattern, window_total, DbError};
use crate::models::{NewAlbum, Paginated, Pagination};

/// Album record from database
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Album {
    pub id: Uuid,
    pub title: String,
    pub artist: String,
    pub description: Option<String>,
    pub cover_url: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Album with track count for list display
#[derive(Debug, Clone, Serialize)]
pub struct AlbumWithCount {
    #[serde(flatten)]
    pub album: Album,
    pub track_count: i64,
}

impl AlbumWithCount {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            album: Album::from_row(row)?,
            track_count: row.try_get("track_count")?,
        })
    }
}

/// Album repository
pub struct AlbumRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> AlbumRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, album: NewAlbum) -> Result<Album, DbError> {
        let album = sqlx::query_as::<_, Album>(
            r#"
            INSERT INTO albums (title, artist, description, cover_url, release_date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&album.title)
        .bind(&album.artist)
        .bind(&album.description)
        .bind(&album.cover_url)
        .bind(album.release_date)
        .fetch_one(self.pool)
        .await?;

        Ok(album)
    }

    /// List albums newest first, optionally matching `search` against
    /// title or artist.
    pub async fn list(
        &self,
        search: Option<&str>,
        page: Pagination,
    ) -> Result<Paginated<AlbumWithCount>, DbError> {
        let pattern = search.map(like_pattern);

        let rows = sqlx::query(
            r#"
            SELECT
                a.*,
                COUNT(s.id) AS track_count,
                COUNT(*) OVER() AS total
            FROM albums a
            LEFT JOIN songs s ON s.album_id = a.id
            WHERE ($1::text IS NULL OR a.title ILIKE $1 OR a.artist ILIKE $1)
            GROUP BY a.id
            ORDER BY a.created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(pattern.as_deref())
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(self.pool)
        .await?;

        // Past the last page the window total is unavailable
        let total_count = if rows.is_empty() && page.offset() > 0 {
            sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM albums a WHERE ($1::text IS NULL OR a.title ILIKE $1 OR a.artist ILIKE $1)",
            )
            .bind(pattern.as_deref())
            .fetch_one(self.pool)
            .await?
        } else {
            window_total(&rows)?
        };

        let items = rows
            .iter()
            .map(AlbumWithCount::from_row)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Paginated {
            items,
            total_count,
            page,
        })
    }

    /// Get a single album with track count.
    pub async fn get(&self, id: Uuid) -> Result<AlbumWithCount, DbError> {
        let row = sqlx::query(
            r#"
            SELECT a.*, COUNT(s.id) AS track_count
            FROM albums a
            LEFT JOIN songs s ON s.album_id = a.id
            WHERE a.id = $1
            GROUP BY a.id
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| not_found(id))?;

        Ok(AlbumWithCount::from_row(&row)?)
    }

    /// Replace the editable fields of an album.
    pub async fn update(&self, id: Uuid, album: NewAlbum) -> Result<Album, DbError> {
        sqlx::query_as::<_, Album>(
            r#"
            UPDATE albums
            SET title = $2,
                artist = $3,
                description = $4,
                cover_url = $5,
                release_date = $6,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&album.title)
        .bind(&album.artist)
        .bind(&album.description)
        .bind(&album.cover_url)
        .bind(album.release_date)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| not_found(id))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM albums WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }
}

fn not_found(id: Uuid) -> DbError {
    DbError::NotFound {
        resource: "album",
        id: id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations;
    use crate::db::repos::SongRepo;
    use crate::models::NewSong;

    // Integration tests - run with DATABASE_URL set
    // cargo test -p backline-server -- --ignored

    async fn pool() -> PgPool {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = PgPool::connect(&url).await.expect("connect failed");
        migrations::run(&pool).await.expect("migrations failed");
        pool
    }

    fn album(title: &str) -> NewAlbum {
        NewAlbum {
            title: title.into(),
            artist: "Repo Test".into(),
            description: None,
            cover_url: None,
            release_date: None,
        }
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn create_get_delete() {
        let pool = pool().await;
        let repo = AlbumRepo::new(&pool);

        let created = repo.create(album("Round Trip")).await.unwrap();
        let fetched = repo.get(created.id).await.unwrap();
        assert_eq!(fetched.album.title, "Round Trip");
        assert_eq!(fetched.track_count, 0);

        repo.delete(created.id).await.unwrap();
        assert!(matches!(
            repo.get(created.id).await,
            Err(DbError::NotFound { resource: "album", .. })
        ));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn delete_keeps_songs_as_singles() {
        let pool = pool().await;
        let albums = AlbumRepo::new(&pool);
        let songs = SongRepo::new(&pool);

        let created = albums.create(album("Short Lived")).await.unwrap();
        let song = songs
            .create(NewSong {
                title: "Survivor".into(),
                artist: "Repo Test".into(),
                album_id: Some(created.id),
                audio_url: "https://cdn.example.com/survivor.mp3".into(),
                cover_url: None,
                duration_secs: Some(180),
                genre: None,
                lyrics: None,
            })
            .await
            .unwrap();
        assert_eq!(song.album_id, Some(created.id));

        albums.delete(created.id).await.unwrap();

        let orphan = songs.get(song.id).await.unwrap();
        assert_eq!(orphan.title, "Survivor");
        assert_eq!(orphan.album_id, None);

        songs.delete(song.id).await.unwrap();
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn update_missing_album_is_not_found() {
        let pool = pool().await;
        let err = AlbumRepo::new(&pool)
            .update(Uuid::new_v4(), album("Ghost"))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
