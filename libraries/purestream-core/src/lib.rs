//! PureStream Core
//!
//! Domain types and error handling shared by every PureStream crate.
//!
//! The core crate defines:
//! - **Domain Types**: `User`, `Song`, `Playlist`, `Stats`, `Pagination`
//! - **Identifiers**: `UserId`, `SongId`, `PlaylistId` (UUID-backed strings)
//! - **Error Handling**: Unified `CoreError` and `Result` types
//!
//! All types serialize to the camelCase JSON shape spoken by the REST API,
//! so the server and the client share a single definition.
//!
//! # Example
//!
//! ```rust
//! use purestream_core::{Pagination, Song, SongId};
//!
//! let song = Song::new(SongId::generate(), "Blue in Green", "Miles Davis");
//! assert_eq!(song.album, "Unknown Album");
//!
//! let page = Pagination::new(2, 20, 45);
//! assert_eq!(page.pages, 3);
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod types;

pub use error::{CoreError, Result};

pub use types::{
    parse_tags, NewPlaylist, NewSong, NewUser, Pagination, Playlist, PlaylistId, PlaylistSong,
    Song, SongId, Stats, UpdatePlaylist, UpdateProfile, User, UserId, UserSummary,
    DEFAULT_SONG_DURATION, MAX_PLAYLIST_DESCRIPTION_LEN, MAX_PLAYLIST_NAME_LEN, UNKNOWN_ALBUM,
};
