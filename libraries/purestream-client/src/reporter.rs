//! Play counting against the server.

use crate::client::PureStreamClient;
use purestream_core::SongId;
use purestream_playback::PlayCountReporter;
use tokio::runtime::Handle;

/// Reports plays with `POST /songs/:id/play`
///
/// Each report runs on its own task. Failures are logged and never reach
/// the listener.
#[derive(Clone)]
pub struct ApiPlayReporter {
    client: PureStreamClient,
}

impl ApiPlayReporter {
    pub fn new(client: PureStreamClient) -> Self {
        Self { client }
    }
}

impl PlayCountReporter for ApiPlayReporter {
    fn record_play(&self, song_id: &SongId) {
        let Ok(handle) = Handle::try_current() else {
            tracing::debug!(song_id = %song_id, "No runtime, play not reported");
            return;
        };

        let client = self.client.clone();
        let song_id = song_id.clone();
        handle.spawn(async move {
            if let Err(e) = client.songs().record_play(&song_id).await {
                tracing::warn!(song_id = %song_id, error = %e, "Failed to record play");
            }
        });
    }
}
