//! Platform-agnostic audio backend capability
//!
//! Abstracts the audio output for different platforms (browser bridge,
//! desktop audio, test doubles).

use crate::types::LoadToken;

/// Audio output capability the engine drives
///
/// Implementors own at most one sound at a time. Loading is asynchronous:
/// `load` returns immediately and the outcome arrives later as a
/// [`BackendEvent`](crate::BackendEvent) carrying the same token.
pub trait AudioBackend: Send {
    /// Start loading `source` (URL or path); completion is reported as an event
    fn load(&mut self, source: &str, token: LoadToken);

    /// Start or resume the loaded sound
    fn play(&mut self);

    /// Pause the loaded sound
    fn pause(&mut self);

    /// Jump to `seconds` into the loaded sound
    fn seek(&mut self, seconds: f64);

    /// Tear down and release the loaded sound
    fn stop(&mut self);

    /// Current position in seconds
    fn position(&self) -> f64;

    /// Whether the sound is currently audible
    fn is_playing(&self) -> bool;

    /// Global output volume in `[0, 1]`
    fn set_volume(&mut self, volume: f64);
}
