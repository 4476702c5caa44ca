//! PureStream Client
//!
//! Typed HTTP client for the PureStream REST API, plus the cached stores a
//! player UI keeps in sync with the server.
//!
//! # Features
//!
//! - **Endpoints**: auth, songs (with upload), playlists, favorites, users, stats
//! - **Stores**: [`FavoritesStore`] and [`PlaylistStore`] publish their
//!   cache over `tokio::sync::watch` and reload it after every mutation
//! - **Play counting**: [`ApiPlayReporter`] plugs into the playback engine
//!
//! # Example
//!
//! ```ignore
//! use purestream_client::{ClientConfig, FavoritesStore, PureStreamClient};
//! use purestream_playback::Notifications;
//!
//! let client = PureStreamClient::new(ClientConfig::new("http://localhost:3000"))?;
//! client.auth().login("ada@example.com", "hunter22").await?;
//!
//! let favorites = FavoritesStore::new(client.clone(), Notifications::new());
//! favorites.load().await?;
//! println!("{} favorite songs", favorites.songs().len());
//! ```

mod auth;
mod client;
mod error;
mod favorites;
mod playlists;
mod reporter;
mod songs;
mod stats;
mod stores;
mod types;
mod users;

pub use client::PureStreamClient;
pub use error::{ClientError, Result};
pub use reporter::ApiPlayReporter;
pub use stores::{FavoritesStore, PlaylistStore};
pub use types::{
    AuthResponse, ClientConfig, CreatePlaylistRequest, LoginRequest, PlaylistPage,
    Recommendations, RegisterRequest, SearchQuery, SongPage, SongQuery, SongUpload,
    UpdatePlaylistRequest, UserPage,
};

// Sub-clients
pub use auth::AuthClient;
pub use favorites::FavoritesClient;
pub use playlists::PlaylistsClient;
pub use songs::{validate_audio_upload, SongsClient, MAX_AUDIO_UPLOAD_BYTES};
pub use stats::StatsClient;
pub use users::UsersClient;
