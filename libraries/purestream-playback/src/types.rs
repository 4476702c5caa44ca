//! Core types for playback management

use purestream_core::Song;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Engine state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineStatus {
    /// No sound loaded
    #[default]
    Idle,

    /// Sound requested, waiting for the backend to report it loaded
    Loading,

    /// Currently playing
    Playing,

    /// Paused mid-track
    Paused,

    /// Explicitly stopped and cleaned up
    Stopped,
}

/// Snapshot published to every observer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackState {
    pub is_playing: bool,

    /// Seconds into the current song, reset on song change
    pub current_time: f64,

    /// Seconds, authoritative once the backend reports the sound loaded
    pub duration: f64,

    /// Always within `[0, 1]`
    pub volume: f64,

    pub current_song: Option<Song>,
    pub queue: Vec<Song>,

    /// `None` means no active queue entry
    pub current_index: Option<usize>,

    pub status: EngineStatus,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            is_playing: false,
            current_time: 0.0,
            duration: 0.0,
            volume: DEFAULT_VOLUME,
            current_song: None,
            queue: Vec::new(),
            current_index: None,
            status: EngineStatus::Idle,
        }
    }
}

/// Partial update merged onto the current snapshot
///
/// Fields left as `None` keep their previous value.
#[derive(Debug, Clone, Default)]
pub struct StateUpdate {
    pub is_playing: Option<bool>,
    pub current_time: Option<f64>,
    pub duration: Option<f64>,
    pub volume: Option<f64>,
    pub current_song: Option<Option<Song>>,
    pub queue: Option<Vec<Song>>,
    pub current_index: Option<Option<usize>>,
    pub status: Option<EngineStatus>,
}

impl StateUpdate {
    /// Merge onto `state`
    pub fn apply(self, state: &mut PlaybackState) {
        if let Some(is_playing) = self.is_playing {
            state.is_playing = is_playing;
        }
        if let Some(current_time) = self.current_time {
            state.current_time = current_time;
        }
        if let Some(duration) = self.duration {
            state.duration = duration;
        }
        if let Some(volume) = self.volume {
            state.volume = volume;
        }
        if let Some(current_song) = self.current_song {
            state.current_song = current_song;
        }
        if let Some(queue) = self.queue {
            state.queue = queue;
        }
        if let Some(current_index) = self.current_index {
            state.current_index = current_index;
        }
        if let Some(status) = self.status {
            state.status = status;
        }
    }
}

/// Identifies one load request
///
/// Tokens increase monotonically; backend completions carrying anything but
/// the latest token are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadToken(u64);

impl LoadToken {
    pub(crate) fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

/// Initial engine volume
pub const DEFAULT_VOLUME: f64 = 0.5;

/// Playback configuration
#[derive(Debug, Clone)]
pub struct PlaybackConfig {
    /// Origin that relative `uploads/` paths are served from (e.g. `http://localhost:3000`)
    pub media_base: String,

    /// Volume applied at startup (clamped to `[0, 1]`)
    pub initial_volume: f64,

    /// How often the position poller samples the backend
    pub poll_interval: Duration,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            media_base: "http://localhost:3000".to_string(),
            initial_volume: DEFAULT_VOLUME,
            poll_interval: Duration::from_millis(100),
        }
    }
}
