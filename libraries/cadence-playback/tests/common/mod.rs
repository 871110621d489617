//! Shared helpers for session tests

#![allow(dead_code)]

use cadence_playback::{
    EngineEvent, MediaEngine, PlayRequestId, PlaybackConfig, PlaybackSession, PlaybackState,
    Track,
};
use std::sync::{Arc, Mutex};

/// Engine that records every call and never produces events on its own
#[derive(Debug, Default)]
pub struct RecordingEngine {
    pub source: Option<String>,
    pub position: f64,
    pub gain: f32,
    pub muted: bool,
    pub paused: bool,
    pub loads: Vec<String>,
    pub plays: Vec<PlayRequestId>,
}

impl MediaEngine for RecordingEngine {
    fn load(&mut self, url: &str) {
        self.source = Some(url.to_string());
        self.position = 0.0;
        self.loads.push(url.to_string());
    }

    fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    fn play(&mut self, request: PlayRequestId) {
        self.paused = false;
        self.plays.push(request);
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn set_position(&mut self, seconds: f64) {
        self.position = seconds;
    }

    fn set_volume(&mut self, gain: f32) {
        self.gain = gain;
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }
}

pub type Session = PlaybackSession<RecordingEngine>;

pub fn create_test_track(id: &str) -> Track {
    Track::new(id, format!("/music/{}.mp3", id), format!("{}.mp3", id))
}

pub fn create_queue(ids: &[&str]) -> Vec<Track> {
    ids.iter().map(|id| create_test_track(id)).collect()
}

pub fn create_session() -> Session {
    PlaybackSession::new(RecordingEngine::default(), PlaybackConfig::default()).with_rng_seed(7)
}

/// Resolve the most recent play request successfully
pub fn settle(session: &mut Session) {
    if let Some(request) = session.engine().plays.last().copied() {
        session.handle_event(EngineEvent::PlayStarted(request));
    }
}

/// Subscribe a listener that keeps every published snapshot
pub fn record_states(session: &mut Session) -> Arc<Mutex<Vec<PlaybackState>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let _subscription = session.subscribe(move |state| sink.lock().unwrap().push(state.clone()));
    seen
}

pub fn current_id(session: &Session) -> Option<String> {
    session.state().current_track.as_ref().map(|t| t.id.clone())
}
