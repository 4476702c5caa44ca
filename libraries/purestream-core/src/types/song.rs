/// Song domain types
use super::ids::{SongId, UserId};
use super::user::UserSummary;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Album name used when an upload does not provide one
pub const UNKNOWN_ALBUM: &str = "Unknown Album";

/// Duration assumed for uploads until the audio is probed (seconds)
pub const DEFAULT_SONG_DURATION: f64 = 180.0;

/// A playable song with its metadata
///
/// The audio location may live in one of three fields depending on where
/// the record came from: `file_path` for uploads stored by the server,
/// `audio_url` and `url` for records imported from elsewhere. The playback
/// engine resolves them in that order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    pub id: SongId,
    pub title: String,
    pub artist: String,

    #[serde(default = "default_album")]
    pub album: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,

    /// Length in seconds, unknown until the audio has been loaded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lyrics: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_year: Option<i32>,

    #[serde(default)]
    pub play_count: i64,

    /// Number of users who liked the song
    #[serde(default)]
    pub likes: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploaded_by: Option<UserSummary>,

    #[serde(default = "default_true")]
    pub is_public: bool,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,

    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Song {
    /// Create a song with only the required metadata set
    pub fn new(id: SongId, title: impl Into<String>, artist: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            title: title.into(),
            artist: artist.into(),
            album: default_album(),
            genre: None,
            duration: None,
            file_path: None,
            audio_url: None,
            url: None,
            cover_image: None,
            lyrics: None,
            release_year: None,
            play_count: 0,
            likes: 0,
            uploaded_by: None,
            is_public: true,
            tags: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Builder-style setter for the stored file path
    pub fn with_file_path(mut self, path: impl Into<String>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    /// Builder-style setter for the duration
    pub fn with_duration(mut self, seconds: f64) -> Self {
        self.duration = Some(seconds);
        self
    }
}

fn default_album() -> String {
    UNKNOWN_ALBUM.to_string()
}

fn default_true() -> bool {
    true
}

/// Data needed to create a song record
#[derive(Debug, Clone)]
pub struct NewSong {
    pub title: String,
    pub artist: String,
    pub album: Option<String>,
    pub genre: Option<String>,
    pub duration: f64,
    pub file_path: String,
    pub cover_image: Option<String>,
    pub lyrics: Option<String>,
    pub release_year: Option<i32>,
    pub tags: Vec<String>,
    pub uploaded_by: UserId,
    pub is_public: bool,
}
