//! Repository implementations for database access
//!
//! Each repository borrows a pool handed out by the connection cache and
//! follows these patterns:
//! - One query per list call, total included via `COUNT(*) OVER()`
//! - Foreign-key violations are mapped to `NotFound` instead of pre-checks

use backline_core::ConnectionError;
use sqlx::postgres::PgRow;
use sqlx::Row;

pub mod albums;
pub mod contact;
pub mod songs;

pub use albums::{Album, AlbumRepo, AlbumWithCount};
pub use contact::{ContactMessage, ContactRepo};
pub use songs::{Song, SongRepo};

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database unavailable: {0}")]
    Connection(#[from] ConnectionError),

    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },
}

/// Read the `total` window column from the first row, 0 when empty.
pub(crate) fn window_total(rows: &[PgRow]) -> Result<i64, sqlx::Error> {
    rows.first()
        .map(|r| r.try_get::<i64, _>("total"))
        .transpose()
        .map(|total| total.unwrap_or(0))
}

/// `%term%` for ILIKE with the LIKE wildcards in `term` escaped.
pub(crate) fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("blue"), "%blue%");
        assert_eq!(like_pattern("100%"), "%100\\%%");
        assert_eq!(like_pattern("a_b\\c"), "%a\\_b\\\\c%");
    }
}
