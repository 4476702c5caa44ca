//! Play-count reporting

use purestream_core::SongId;

/// Receives a fire-and-forget notice each time a song starts playing
///
/// Implementations must not block; failures are theirs to log.
pub trait PlayCountReporter: Send + Sync {
    fn record_play(&self, song_id: &SongId);
}

/// Reporter that discards every play
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopReporter;

impl PlayCountReporter for NoopReporter {
    fn record_play(&self, _song_id: &SongId) {}
}
