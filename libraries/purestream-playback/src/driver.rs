//! Async driver tasks
//!
//! The engine is synchronous; these tasks feed it backend events and sample
//! the playback position on a timer. Both share it behind a tokio mutex.

use crate::{backend::AudioBackend, engine::PlaybackEngine, events::BackendEventReceiver};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Engine shared between the UI and the driver tasks
pub type SharedEngine<B> = Arc<Mutex<PlaybackEngine<B>>>;

/// Wrap an engine for sharing
pub fn share<B: AudioBackend>(engine: PlaybackEngine<B>) -> SharedEngine<B> {
    Arc::new(Mutex::new(engine))
}

/// Forward backend events to the engine until the channel closes
pub fn spawn_event_loop<B>(engine: SharedEngine<B>, mut events: BackendEventReceiver) -> JoinHandle<()>
where
    B: AudioBackend + 'static,
{
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            engine.lock().await.handle_event(event);
        }
        tracing::debug!("Backend event channel closed");
    })
}

/// Sample the playback position every `interval`
///
/// Missed ticks are skipped. The task ends once every other handle to the
/// engine has been dropped.
pub fn spawn_position_poller<B>(engine: &SharedEngine<B>, interval: Duration) -> JoinHandle<()>
where
    B: AudioBackend + 'static,
{
    let engine = Arc::downgrade(engine);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            let Some(engine) = engine.upgrade() else {
                tracing::debug!("Engine dropped, stopping position poller");
                break;
            };
            engine.lock().await.sample_position();
        }
    })
}
