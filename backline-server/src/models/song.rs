//! Song input validation and list filters

use serde::Deserialize;
use uuid::Uuid;

use super::validation::{media_url, optional_media_url, optional_text, required_text};
use super::{Pagination, PaginationParams, ValidationError};

const MAX_TITLE_LEN: usize = 200;
const MAX_ARTIST_LEN: usize = 200;
const MAX_GENRE_LEN: usize = 64;
const MAX_LYRICS_LEN: usize = 20_000;
const MAX_SEARCH_LEN: usize = 100;

/// Longest accepted track, one day
const MAX_DURATION_SECS: i32 = 86_400;

/// Song create/update body
#[derive(Debug, Clone, Deserialize)]
pub struct SongRequest {
    pub title: String,
    pub artist: String,
    pub album_id: Option<Uuid>,
    pub audio_url: String,
    pub cover_url: Option<String>,
    pub duration_secs: Option<i32>,
    pub genre: Option<String>,
    pub lyrics: Option<String>,
}

/// Validated song fields, ready to write
#[derive(Debug, Clone, PartialEq)]
pub struct NewSong {
    pub title: String,
    pub artist: String,
    pub album_id: Option<Uuid>,
    pub audio_url: String,
    pub cover_url: Option<String>,
    pub duration_secs: Option<i32>,
    pub genre: Option<String>,
    pub lyrics: Option<String>,
}

impl TryFrom<SongRequest> for NewSong {
    type Error = ValidationError;

    fn try_from(req: SongRequest) -> Result<Self, Self::Error> {
        if let Some(secs) = req.duration_secs {
            if !(1..=MAX_DURATION_SECS).contains(&secs) {
                return Err(ValidationError::OutOfRange {
                    field: "duration_secs",
                    min: 1,
                    max: MAX_DURATION_SECS as i64,
                });
            }
        }

        Ok(Self {
            title: required_text("title", &req.title, MAX_TITLE_LEN)?,
            artist: required_text("artist", &req.artist, MAX_ARTIST_LEN)?,
            album_id: req.album_id,
            audio_url: media_url("audio_url", &req.audio_url)?,
            cover_url: optional_media_url("cover_url", req.cover_url.as_deref())?,
            duration_secs: req.duration_secs,
            genre: optional_text("genre", req.genre.as_deref(), MAX_GENRE_LEN)?
                .map(|g| g.to_lowercase()),
            lyrics: optional_text("lyrics", req.lyrics.as_deref(), MAX_LYRICS_LEN)?,
        })
    }
}

/// `GET /api/songs` query string
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SongListParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub album: Option<Uuid>,
    pub genre: Option<String>,
    pub q: Option<String>,
}

impl SongListParams {
    pub fn pagination(&self) -> Pagination {
        Pagination::from(PaginationParams {
            page: self.page,
            limit: self.limit,
        })
    }
}

/// Validated song list filter
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SongFilter {
    pub album_id: Option<Uuid>,
    pub genre: Option<String>,
    /// Case-insensitive match on title or artist
    pub search: Option<String>,
}

impl SongFilter {
    pub fn from_params(params: &SongListParams) -> Result<Self, ValidationError> {
        Ok(Self {
            album_id: params.album,
            genre: optional_text("genre", params.genre.as_deref(), MAX_GENRE_LEN)?
                .map(|g| g.to_lowercase()),
            search: search_term(params.q.as_deref())?,
        })
    }
}

/// Validate a free-text search term; blank means no filter.
pub fn search_term(q: Option<&str>) -> Result<Option<String>, ValidationError> {
    optional_text("q", q, MAX_SEARCH_LEN)
}
