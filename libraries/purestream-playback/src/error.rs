//! Error types for the playback engine
//!
//! None of these are fatal: every failure is reported to the notification
//! center and the engine returns to an idle or previous state.

use thiserror::Error;

/// Playback errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    /// The song has no file path, audio URL or URL
    #[error("No audio file available for song {song_id}")]
    NoAudioSource { song_id: String },

    /// The backend could not fetch or decode the audio
    #[error("Failed to load audio: {0}")]
    LoadFailure(String),

    /// The backend refused to start until the user interacts
    #[error("Playback blocked: {0}")]
    PlaybackBlocked(String),

    /// A request to the API failed
    #[error("Request failed: {0}")]
    RequestFailure(String),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
