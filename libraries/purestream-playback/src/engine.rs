//! Playback engine - core orchestration
//!
//! Owns the single active sound handle, the queue and the published
//! [`PlaybackState`]. Every mutation goes through [`PlaybackEngine::update`],
//! which merges a partial update onto the current snapshot and republishes
//! it to all subscribers.

use crate::{
    backend::AudioBackend,
    error::{PlaybackError, Result},
    events::BackendEvent,
    notifications::Notifications,
    queue::{next_index, previous_index},
    reporter::{NoopReporter, PlayCountReporter},
    resolver::resolve_audio_location,
    types::{
        EngineStatus, LoadToken, PlaybackConfig, PlaybackState, StateUpdate, DEFAULT_VOLUME,
    },
    volume::clamp_volume,
};
use purestream_core::Song;
use std::sync::Arc;
use tokio::sync::watch;

/// Playback engine
///
/// Generic over the audio backend so the same state machine drives a real
/// output device or a test double.
pub struct PlaybackEngine<B: AudioBackend> {
    backend: B,
    config: PlaybackConfig,
    state: watch::Sender<PlaybackState>,
    notifications: Notifications,
    reporter: Arc<dyn PlayCountReporter>,

    /// Token of the load whose events are still accepted
    active_token: Option<LoadToken>,
    last_token: u64,

    /// Whether the backend currently holds a sound
    sound_loaded: bool,

    /// Replay once the backend reports an unlock
    replay_on_unlock: bool,
}

impl<B: AudioBackend> PlaybackEngine<B> {
    /// Create new playback engine
    pub fn new(mut backend: B, config: PlaybackConfig) -> Self {
        let volume = clamp_volume(config.initial_volume).unwrap_or(DEFAULT_VOLUME);
        backend.set_volume(volume);

        let (state, _rx) = watch::channel(PlaybackState {
            volume,
            ..PlaybackState::default()
        });

        Self {
            backend,
            config,
            state,
            notifications: Notifications::new(),
            reporter: Arc::new(NoopReporter),
            active_token: None,
            last_token: 0,
            sound_loaded: false,
            replay_on_unlock: false,
        }
    }

    /// Post failures to a shared notification center
    pub fn with_notifications(mut self, notifications: Notifications) -> Self {
        self.notifications = notifications;
        self
    }

    /// Report plays through `reporter`
    pub fn with_reporter(mut self, reporter: Arc<dyn PlayCountReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    // ===== State =====

    /// Observe state snapshots
    pub fn subscribe(&self) -> watch::Receiver<PlaybackState> {
        self.state.subscribe()
    }

    /// Current state snapshot
    pub fn state(&self) -> PlaybackState {
        self.state.borrow().clone()
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Token of the load currently in flight or playing
    pub fn active_token(&self) -> Option<LoadToken> {
        self.active_token
    }

    /// Merge a partial update and republish
    fn update(&self, update: StateUpdate) {
        self.state.send_modify(|state| update.apply(state));
    }

    fn status(&self) -> EngineStatus {
        self.state.borrow().status
    }

    fn fail(&self, error: PlaybackError) -> PlaybackError {
        tracing::warn!(error = %error, "Playback failure");
        self.notifications.report(&error);
        error
    }

    // ===== Playback Control =====

    /// Load and play `song`
    ///
    /// The audio location is resolved before anything else; a song without
    /// one fails with [`PlaybackError::NoAudioSource`] and leaves the state
    /// untouched. Otherwise the previous sound is released and a new load is
    /// issued; playback begins when the backend reports it loaded.
    pub fn play_song(&mut self, song: Song) -> Result<()> {
        let Some(location) = resolve_audio_location(&song, &self.config.media_base) else {
            return Err(self.fail(PlaybackError::NoAudioSource {
                song_id: song.id.to_string(),
            }));
        };

        self.stop();

        self.last_token += 1;
        let token = LoadToken::new(self.last_token);
        self.active_token = Some(token);

        tracing::debug!(song_id = %song.id, token = token.value(), %location, "Loading song");
        self.backend.load(&location, token);
        self.sound_loaded = true;

        self.update(StateUpdate {
            current_song: Some(Some(song)),
            current_time: Some(0.0),
            status: Some(EngineStatus::Loading),
            ..StateUpdate::default()
        });

        Ok(())
    }

    /// Apply an asynchronous backend outcome
    ///
    /// Events from superseded loads are discarded.
    pub fn handle_event(&mut self, event: BackendEvent) {
        if self.active_token != Some(event.token()) {
            tracing::debug!(
                token = event.token().value(),
                active = ?self.active_token.map(LoadToken::value),
                "Discarding stale backend event"
            );
            return;
        }

        match event {
            BackendEvent::Loaded { duration, .. } => {
                self.update(StateUpdate {
                    duration: Some(duration),
                    current_time: Some(0.0),
                    is_playing: Some(true),
                    status: Some(EngineStatus::Playing),
                    ..StateUpdate::default()
                });
                self.backend.play();

                let song_id = self.state.borrow().current_song.as_ref().map(|s| s.id.clone());
                if let Some(song_id) = song_id {
                    self.reporter.record_play(&song_id);
                }
            }
            BackendEvent::LoadError { message, .. } => {
                self.release_sound();
                self.update(StateUpdate {
                    is_playing: Some(false),
                    current_time: Some(0.0),
                    current_song: Some(None),
                    status: Some(EngineStatus::Idle),
                    ..StateUpdate::default()
                });
                self.fail(PlaybackError::LoadFailure(message));
            }
            BackendEvent::PlayError { message, .. } => {
                self.replay_on_unlock = true;
                self.update(StateUpdate {
                    is_playing: Some(false),
                    ..StateUpdate::default()
                });
                self.fail(PlaybackError::PlaybackBlocked(message));
            }
            BackendEvent::Unlocked { .. } => {
                if std::mem::take(&mut self.replay_on_unlock) {
                    tracing::debug!("Audio unlocked, replaying");
                    self.backend.play();
                    self.update(StateUpdate {
                        is_playing: Some(true),
                        status: Some(EngineStatus::Playing),
                        ..StateUpdate::default()
                    });
                }
            }
            BackendEvent::Ended { .. } => {
                // The finished sound is gone before the next one loads
                self.release_sound();
                self.update(StateUpdate {
                    is_playing: Some(false),
                    status: Some(EngineStatus::Idle),
                    ..StateUpdate::default()
                });

                if self.state.borrow().queue.is_empty() {
                    return;
                }
                if let Err(e) = self.advance_forward() {
                    tracing::debug!(error = %e, "Could not advance after end of song");
                }
            }
        }
    }

    /// Pause if playing, resume if paused
    ///
    /// Does nothing unless a sound has finished loading.
    pub fn toggle_playback(&mut self) {
        if !matches!(self.status(), EngineStatus::Playing | EngineStatus::Paused) {
            return;
        }

        if self.backend.is_playing() {
            self.backend.pause();
            self.update(StateUpdate {
                is_playing: Some(false),
                status: Some(EngineStatus::Paused),
                ..StateUpdate::default()
            });
        } else {
            self.backend.play();
            self.update(StateUpdate {
                is_playing: Some(true),
                status: Some(EngineStatus::Playing),
                ..StateUpdate::default()
            });
        }
    }

    /// Stop playback
    ///
    /// Releases the sound handle and clears the current song. The queue and
    /// the current index are kept.
    pub fn stop(&mut self) {
        self.release_sound();
        self.update(StateUpdate {
            is_playing: Some(false),
            current_time: Some(0.0),
            current_song: Some(None),
            status: Some(EngineStatus::Stopped),
            ..StateUpdate::default()
        });
    }

    fn release_sound(&mut self) {
        if self.sound_loaded {
            self.backend.stop();
            self.sound_loaded = false;
        }
        self.active_token = None;
        self.replay_on_unlock = false;
    }

    // ===== Queue Navigation =====

    /// Play the next song, wrapping to the start; no-op on an empty queue
    pub fn advance_forward(&mut self) -> Result<()> {
        let (current, len) = self.position_in_queue();
        match next_index(current, len) {
            Some(index) => self.play_from_queue(index),
            None => Ok(()),
        }
    }

    /// Play the previous song, wrapping to the end; no-op on an empty queue
    pub fn advance_backward(&mut self) -> Result<()> {
        let (current, len) = self.position_in_queue();
        match previous_index(current, len) {
            Some(index) => self.play_from_queue(index),
            None => Ok(()),
        }
    }

    fn position_in_queue(&self) -> (Option<usize>, usize) {
        let state = self.state.borrow();
        (state.current_index, state.queue.len())
    }

    /// Play the queue entry at `index`; out of range is a no-op
    ///
    /// An entry without an audio location fails like [`Self::play_song`]
    /// and leaves the current index where it was.
    pub fn play_from_queue(&mut self, index: usize) -> Result<()> {
        let Some(song) = self.state.borrow().queue.get(index).cloned() else {
            return Ok(());
        };

        if resolve_audio_location(&song, &self.config.media_base).is_some() {
            self.update(StateUpdate {
                current_index: Some(Some(index)),
                ..StateUpdate::default()
            });
        }
        self.play_song(song)
    }

    /// Replace the queue and start playing at `start_index`
    ///
    /// An empty queue, or a start index past its end, replaces the queue
    /// without starting playback.
    pub fn set_queue(&mut self, songs: Vec<Song>, start_index: usize) -> Result<()> {
        let playable = start_index < songs.len();

        self.update(StateUpdate {
            queue: Some(songs),
            current_index: Some(playable.then_some(start_index)),
            ..StateUpdate::default()
        });

        if playable {
            self.play_from_queue(start_index)
        } else {
            Ok(())
        }
    }

    /// Append a song to the queue
    pub fn add_to_queue(&mut self, song: Song) {
        self.state.send_modify(|state| state.queue.push(song));
    }

    // ===== Volume / Seek =====

    /// Set volume, clamped to `[0, 1]`; NaN is ignored
    pub fn set_volume(&mut self, volume: f64) {
        let Some(volume) = clamp_volume(volume) else {
            tracing::debug!("Ignoring NaN volume");
            return;
        };

        self.backend.set_volume(volume);
        self.update(StateUpdate {
            volume: Some(volume),
            ..StateUpdate::default()
        });
    }

    /// Seek within the loaded sound; no-op when nothing is loaded
    pub fn seek(&mut self, seconds: f64) {
        if !self.sound_loaded {
            return;
        }

        let seconds = seconds.max(0.0);
        self.backend.seek(seconds);
        self.update(StateUpdate {
            current_time: Some(seconds),
            ..StateUpdate::default()
        });
    }

    /// Republish the backend position while a sound is audibly playing
    pub fn sample_position(&mut self) {
        if !self.sound_loaded
            || self.status() != EngineStatus::Playing
            || !self.backend.is_playing()
        {
            return;
        }

        let position = self.backend.position();
        self.update(StateUpdate {
            current_time: Some(position),
            ..StateUpdate::default()
        });
    }
}
