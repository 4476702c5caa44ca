//! Request and response bodies of the PureStream REST API.

use purestream_core::{Pagination, Playlist, Song, User};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for connecting to a PureStream server.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the server (e.g., "https://music.example.com")
    pub url: String,
    /// Bearer token sent with every request once logged in
    pub token: Option<String>,
}

impl ClientConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            token: None,
        }
    }

    /// Create a config with an existing token.
    pub fn with_token(url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            token: Some(token.into()),
        }
    }
}

// =============================================================================
// Authentication
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response of register and login
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub message: String,
    pub token: String,
    pub user: User,
}

// =============================================================================
// Envelopes
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct UserEnvelope {
    pub user: User,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SongEnvelope {
    pub song: Song,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SongsEnvelope {
    pub songs: Vec<Song>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct GenresEnvelope {
    pub genres: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PlaylistEnvelope {
    pub playlist: Playlist,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PlaylistsEnvelope {
    pub playlists: Vec<Playlist>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct FollowingEnvelope {
    pub following: Vec<User>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct FollowersEnvelope {
    pub followers: Vec<User>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LikeStatus {
    pub is_liked: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FollowedStatus {
    pub is_followed: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FollowingStatus {
    pub is_following: bool,
}

/// A page of songs
#[derive(Debug, Clone, Deserialize)]
pub struct SongPage {
    pub songs: Vec<Song>,
    pub pagination: Pagination,
}

/// A page of playlists
#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistPage {
    pub playlists: Vec<Playlist>,
    pub pagination: Pagination,
}

/// A page of users
#[derive(Debug, Clone, Deserialize)]
pub struct UserPage {
    pub users: Vec<User>,
    pub pagination: Pagination,
}

/// Personal recommendations
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendations {
    pub songs: Vec<Song>,
    pub playlists: Vec<Playlist>,
    pub users_to_follow: Vec<User>,
}

// =============================================================================
// Queries
// =============================================================================

/// Filters for `GET /songs`
#[derive(Debug, Clone, Default, Serialize)]
pub struct SongQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
}

/// Parameters for `GET /songs/search`
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

// =============================================================================
// Playlists
// =============================================================================

/// Body of `POST /playlists`
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlaylistRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_collaborative: Option<bool>,
    /// Comma-separated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
}

impl CreatePlaylistRequest {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Body of `PUT /playlists/:id`; unset fields are left unchanged
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlaylistRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_collaborative: Option<bool>,
    /// Comma-separated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
}

// =============================================================================
// Upload
// =============================================================================

/// A song to upload from local files
#[derive(Debug, Clone, Default)]
pub struct SongUpload {
    pub audio: PathBuf,
    pub cover_image: Option<PathBuf>,
    pub title: String,
    pub artist: String,
    pub album: Option<String>,
    pub genre: Option<String>,
    pub release_year: Option<i32>,
    pub lyrics: Option<String>,
    pub tags: Vec<String>,
    pub duration: Option<f64>,
}

impl SongUpload {
    pub fn new(audio: impl Into<PathBuf>, title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            audio: audio.into(),
            title: title.into(),
            artist: artist.into(),
            ..Self::default()
        }
    }
}
