//! Error types for the PureStream client.

use purestream_playback::PlaybackError;
use thiserror::Error;

/// Errors that can occur when talking to a PureStream server.
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server returned an error response
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// The server rejected the credentials or no token was sent
    #[error("Authentication required")]
    AuthRequired,

    /// Invalid server URL
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse server response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Upload rejected before it was sent
    #[error("Invalid upload: {0}")]
    InvalidUpload(String),

    /// File not found for upload
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// IO error while reading an upload
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Server is offline or unreachable
    #[error("Server unreachable: {0}")]
    ServerUnreachable(String),
}

impl ClientError {
    /// HTTP status of a server-side failure
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            Self::AuthRequired => Some(401),
            _ => None,
        }
    }

    /// The user-facing playback error for a failed request
    pub fn to_playback_error(&self) -> PlaybackError {
        let message = match self {
            Self::Server { message, .. } => message.clone(),
            other => other.to_string(),
        };
        PlaybackError::RequestFailure(message)
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
