//! Backend events
//!
//! Asynchronous outcomes reported by an [`AudioBackend`](crate::AudioBackend).
//! Each event carries the token of the load it belongs to so the engine can
//! drop completions from superseded requests.

use crate::types::LoadToken;
use tokio::sync::mpsc;

/// Events emitted by the audio backend
#[derive(Debug, Clone, PartialEq)]
pub enum BackendEvent {
    /// Sound is ready to play
    Loaded {
        token: LoadToken,
        /// Length in seconds
        duration: f64,
    },

    /// Sound could not be fetched or decoded
    LoadError { token: LoadToken, message: String },

    /// Playback refused until the user interacts with the page
    PlayError { token: LoadToken, message: String },

    /// User interaction unlocked audio output
    Unlocked { token: LoadToken },

    /// Sound reached its natural end
    Ended { token: LoadToken },
}

impl BackendEvent {
    /// The load request this event belongs to
    pub fn token(&self) -> LoadToken {
        match self {
            Self::Loaded { token, .. }
            | Self::LoadError { token, .. }
            | Self::PlayError { token, .. }
            | Self::Unlocked { token }
            | Self::Ended { token } => *token,
        }
    }
}

/// Sending half handed to backend adapters
pub type BackendEventSender = mpsc::UnboundedSender<BackendEvent>;

/// Receiving half consumed by the event loop
pub type BackendEventReceiver = mpsc::UnboundedReceiver<BackendEvent>;

/// Create the channel backends report through
///
/// Unbounded so audio callbacks never wait on the engine.
pub fn event_channel() -> (BackendEventSender, BackendEventReceiver) {
    mpsc::unbounded_channel()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_accessor_covers_every_variant() {
        let token = LoadToken::new(7);
        let events = [
            BackendEvent::Loaded {
                token,
                duration: 1.0,
            },
            BackendEvent::LoadError {
                token,
                message: "404".to_string(),
            },
            BackendEvent::PlayError {
                token,
                message: "blocked".to_string(),
            },
            BackendEvent::Unlocked { token },
            BackendEvent::Ended { token },
        ];

        for event in events {
            assert_eq!(event.token(), token);
        }
    }
}
