//! PureStream - Playback Engine
//!
//! Queue and playback state machine shared by PureStream clients.
//!
//! This crate provides:
//! - A single-sound playback engine (`Idle`, `Loading`, `Playing`, `Paused`, `Stopped`)
//! - A wrap-around queue with forward/backward navigation
//! - State snapshots published over a `tokio::sync::watch` channel
//! - Load tokens that discard completions from superseded loads
//! - A notification center for user-visible failures
//!
//! # Architecture
//!
//! `purestream-playback` never touches audio directly. Output goes through
//! the [`AudioBackend`] trait, and the backend reports asynchronous outcomes
//! (loaded, failed, ended, ...) as [`BackendEvent`]s over a channel. The
//! engine itself is synchronous; [`driver`] provides the tokio tasks that
//! feed it events and sample the position.
//!
//! # Example
//!
//! ```rust
//! use purestream_core::{Song, SongId};
//! use purestream_playback::{
//!     AudioBackend, BackendEvent, EngineStatus, LoadToken, PlaybackConfig, PlaybackEngine,
//! };
//!
//! #[derive(Default)]
//! struct SilentBackend {
//!     playing: bool,
//! }
//!
//! impl AudioBackend for SilentBackend {
//!     fn load(&mut self, _source: &str, _token: LoadToken) {}
//!     fn play(&mut self) { self.playing = true; }
//!     fn pause(&mut self) { self.playing = false; }
//!     fn seek(&mut self, _seconds: f64) {}
//!     fn stop(&mut self) { self.playing = false; }
//!     fn position(&self) -> f64 { 0.0 }
//!     fn is_playing(&self) -> bool { self.playing }
//!     fn set_volume(&mut self, _volume: f64) {}
//! }
//!
//! let mut engine = PlaybackEngine::new(SilentBackend::default(), PlaybackConfig::default());
//!
//! let song = Song::new(SongId::new("s1"), "Blue in Green", "Miles Davis")
//!     .with_file_path("uploads/songs/audio-1.mp3");
//! engine.play_song(song).unwrap();
//! assert_eq!(engine.state().status, EngineStatus::Loading);
//!
//! // The backend reports the sound ready
//! let token = engine.active_token().unwrap();
//! engine.handle_event(BackendEvent::Loaded { token, duration: 337.0 });
//!
//! let state = engine.state();
//! assert!(state.is_playing);
//! assert_eq!(state.duration, 337.0);
//! ```

mod backend;
pub mod driver;
mod engine;
mod error;
mod events;
pub mod notifications;
mod queue;
mod reporter;
mod resolver;
pub mod types;
mod volume;

// Public exports
pub use backend::AudioBackend;
pub use engine::PlaybackEngine;
pub use error::{PlaybackError, Result};
pub use events::{event_channel, BackendEvent, BackendEventReceiver, BackendEventSender};
pub use notifications::{Notification, NotificationKind, Notifications};
pub use queue::{next_index, previous_index};
pub use reporter::{NoopReporter, PlayCountReporter};
pub use resolver::resolve_audio_location;
pub use types::{EngineStatus, LoadToken, PlaybackConfig, PlaybackState, StateUpdate};
pub use volume::clamp_volume;
