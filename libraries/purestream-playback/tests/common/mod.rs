//! Shared fixtures for playback integration tests

#![allow(dead_code)]

use purestream_core::{Song, SongId};
use purestream_playback::{
    AudioBackend, BackendEvent, LoadToken, PlayCountReporter, PlaybackConfig, PlaybackEngine,
};
use std::sync::{Arc, Mutex};

pub const MEDIA_BASE: &str = "http://media.test";

/// Audio backend double that tracks live sound handles
#[derive(Debug, Default)]
pub struct MockBackend {
    pub live_handles: usize,
    pub max_live_handles: usize,
    pub loads: Vec<(String, LoadToken)>,
    pub playing: bool,
    pub position: f64,
    pub volume: f64,
    pub play_calls: usize,
    pub pause_calls: usize,
    pub seeks: Vec<f64>,
}

impl AudioBackend for MockBackend {
    fn load(&mut self, source: &str, token: LoadToken) {
        self.live_handles += 1;
        self.max_live_handles = self.max_live_handles.max(self.live_handles);
        self.loads.push((source.to_string(), token));
        self.playing = false;
        self.position = 0.0;
    }

    fn play(&mut self) {
        self.play_calls += 1;
        self.playing = self.live_handles > 0;
    }

    fn pause(&mut self) {
        self.pause_calls += 1;
        self.playing = false;
    }

    fn seek(&mut self, seconds: f64) {
        self.seeks.push(seconds);
        self.position = seconds;
    }

    fn stop(&mut self) {
        self.live_handles = self.live_handles.saturating_sub(1);
        self.playing = false;
        self.position = 0.0;
    }

    fn position(&self) -> f64 {
        self.position
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    fn set_volume(&mut self, volume: f64) {
        self.volume = volume;
    }
}

/// Reporter that remembers every play
#[derive(Debug, Default)]
pub struct RecordingReporter {
    pub plays: Mutex<Vec<SongId>>,
}

impl RecordingReporter {
    pub fn plays(&self) -> Vec<SongId> {
        self.plays.lock().unwrap().clone()
    }
}

impl PlayCountReporter for RecordingReporter {
    fn record_play(&self, song_id: &SongId) {
        self.plays.lock().unwrap().push(song_id.clone());
    }
}

pub fn config() -> PlaybackConfig {
    PlaybackConfig {
        media_base: MEDIA_BASE.to_string(),
        ..PlaybackConfig::default()
    }
}

pub fn engine() -> PlaybackEngine<MockBackend> {
    PlaybackEngine::new(MockBackend::default(), config())
}

pub fn engine_with_reporter() -> (PlaybackEngine<MockBackend>, Arc<RecordingReporter>) {
    let reporter = Arc::new(RecordingReporter::default());
    let engine = engine().with_reporter(reporter.clone());
    (engine, reporter)
}

/// Playable song stored under `uploads/songs/<id>.mp3`
pub fn song(id: &str, duration: f64) -> Song {
    Song::new(SongId::new(id), format!("Song {id}"), "Test Artist")
        .with_file_path(format!("uploads/songs/{id}.mp3"))
        .with_duration(duration)
}

/// Song with no audio location at all
pub fn silent_song(id: &str) -> Song {
    Song::new(SongId::new(id), format!("Song {id}"), "Test Artist")
}

/// Deliver `Loaded` for the active load
pub fn finish_loading(engine: &mut PlaybackEngine<MockBackend>, duration: f64) -> LoadToken {
    let token = engine.active_token().expect("a load is in flight");
    engine.handle_event(BackendEvent::Loaded { token, duration });
    token
}

/// Deliver `Ended` for the active sound
pub fn finish_song(engine: &mut PlaybackEngine<MockBackend>) {
    let token = engine.active_token().expect("a sound is loaded");
    engine.handle_event(BackendEvent::Ended { token });
}

pub fn current_id(engine: &PlaybackEngine<MockBackend>) -> Option<String> {
    engine
        .state()
        .current_song
        .map(|s| s.id.as_str().to_string())
}
