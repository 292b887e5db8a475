//! Domain models with validation at construction
//!
//! All user input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod album;
pub mod contact;
pub mod pagination;
pub mod song;
pub mod validation;

pub use album::{AlbumRequest, NewAlbum};
pub use contact::{ContactRequest, NewContactMessage};
pub use pagination::{PageResponse, Paginated, Pagination, PaginationParams};
pub use song::{NewSong, SongFilter, SongListParams, SongRequest};
pub use validation::ValidationError;
