//! Album input validation

use chrono::NaiveDate;
use serde::Deserialize;

use super::validation::{optional_media_url, optional_text, required_text};
use super::ValidationError;

const MAX_TITLE_LEN: usize = 200;
const MAX_ARTIST_LEN: usize = 200;
const MAX_DESCRIPTION_LEN: usize = 5000;

/// Album create/update body
#[derive(Debug, Clone, Deserialize)]
pub struct AlbumRequest {
    pub title: String,
    pub artist: String,
    pub description: Option<String>,
    pub cover_url: Option<String>,
    pub release_date: Option<NaiveDate>,
}

/// Validated album fields, ready to write
#[derive(Debug, Clone, PartialEq)]
pub struct NewAlbum {
    pub title: String,
    pub artist: String,
    pub description: Option<String>,
    pub cover_url: Option<String>,
    pub release_date: Option<NaiveDate>,
}

impl TryFrom<AlbumRequest> for NewAlbum {
    type Error = ValidationError;

    fn try_from(req: AlbumRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            title: required_text("title", &req.title, MAX_TITLE_LEN)?,
            artist: required_text("artist", &req.artist, MAX_ARTIST_LEN)?,
            description: optional_text(
                "description",
                req.description.as_deref(),
                MAX_DESCRIPTION_LEN,
            )?,
            cover_url: optional_media_url("cover_url", req.cover_url.as_deref())?,
            release_date: req.release_date,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> AlbumRequest {
        AlbumRequest {
            title: "Night Drive".into(),
            artist: "The Backline".into(),
            description: Some("  ".into()),
            cover_url: None,
            release_date: NaiveDate::from_ymd_opt(2024, 5, 17),
        }
    }

    #[test]
    fn accepts_valid_album() {
        let album = NewAlbum::try_from(request()).unwrap();
        assert_eq!(album.title, "Night Drive");
        assert_eq!(album.description, None);
    }

    #[test]
    fn rejects_missing_artist() {
        let mut req = request();
        req.artist = "".into();
        assert_eq!(
            NewAlbum::try_from(req).unwrap_err(),
            ValidationError::Empty { field: "artist" }
        );
    }

    #[test]
    fn rejects_bad_cover() {
        let mut req = request();
        req.cover_url = Some("cover.jpg".into());
        assert!(matches!(
            NewAlbum::try_from(req),
            Err(ValidationError::InvalidFormat { field: "cover_url", .. })
        ));
    }

    #[test]
    fn parses_release_date_from_json() {
        let req: AlbumRequest = serde_json::from_str(
            r#"{"title":"A","artist":"B","release_date":"2023-11-03"}"#,
        )
        .unwrap();
        assert_eq!(req.release_date, NaiveDate::from_ymd_opt(2023, 11, 3));
    }
}
