//! Simulated media engine
//!
//! `HeadlessEngine` is what the session drives. It shares a deck with an
//! [`EngineControl`] held by the console, which plays the role of the
//! platform: it settles play requests, advances time and reports track end
//! or failure. Everything the platform would call back with goes through the
//! event channel.

use cadence_playback::{EngineEvent, MediaEngine, PlayRequestId};
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, trace};

#[derive(Debug, Default)]
struct Deck {
    source: Option<String>,
    position: f64,
    playing: bool,
    gain: f32,
    muted: bool,
    pending: Vec<PlayRequestId>,
}

fn lock(deck: &Mutex<Deck>) -> MutexGuard<'_, Deck> {
    deck.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Engine half, owned by the session
#[derive(Debug)]
pub struct HeadlessEngine {
    deck: Arc<Mutex<Deck>>,
    // Kept locally so `source()` can hand out a borrow
    source: Option<String>,
    track_length: f64,
    event_tx: Sender<EngineEvent>,
}

/// Platform half, owned by the host
#[derive(Debug, Clone)]
pub struct EngineControl {
    deck: Arc<Mutex<Deck>>,
    track_length: f64,
    event_tx: Sender<EngineEvent>,
}

impl HeadlessEngine {
    /// Create an engine whose tracks all last `track_length` seconds
    ///
    /// Returns the engine, its control handle and the receiving end of the
    /// event channel.
    pub fn new(track_length: f64) -> (Self, EngineControl, Receiver<EngineEvent>) {
        let (event_tx, event_rx) = unbounded();
        let deck = Arc::new(Mutex::new(Deck::default()));

        let engine = Self {
            deck: Arc::clone(&deck),
            source: None,
            track_length,
            event_tx: event_tx.clone(),
        };
        let control = EngineControl {
            deck,
            track_length,
            event_tx,
        };

        (engine, control, event_rx)
    }

    fn emit(&self, event: EngineEvent) {
        let _ = self.event_tx.send(event);
    }
}

impl MediaEngine for HeadlessEngine {
    fn load(&mut self, url: &str) {
        debug!(url, "Loading source");
        self.source = Some(url.to_string());

        {
            let mut deck = lock(&self.deck);
            deck.source = Some(url.to_string());
            deck.position = 0.0;
            deck.playing = false;
        }

        self.emit(EngineEvent::MetadataLoaded {
            duration: self.track_length,
        });
    }

    fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    fn play(&mut self, request: PlayRequestId) {
        trace!(request = %request, "Play requested");
        lock(&self.deck).pending.push(request);
    }

    fn pause(&mut self) {
        let interrupted = {
            let mut deck = lock(&self.deck);
            deck.playing = false;
            std::mem::take(&mut deck.pending)
        };

        for request in interrupted {
            self.emit(EngineEvent::PlayRejected {
                request,
                reason: "AbortError: play() interrupted by pause()".to_string(),
            });
        }
    }

    fn set_position(&mut self, seconds: f64) {
        lock(&self.deck).position = seconds.clamp(0.0, self.track_length);
    }

    fn set_volume(&mut self, gain: f32) {
        lock(&self.deck).gain = gain;
    }

    fn set_muted(&mut self, muted: bool) {
        lock(&self.deck).muted = muted;
    }
}

impl EngineControl {
    /// Complete every outstanding play request
    ///
    /// Requests with no loaded source are rejected.
    pub fn settle(&self) {
        let (requests, has_source) = {
            let mut deck = lock(&self.deck);
            let requests = std::mem::take(&mut deck.pending);
            let has_source = deck.source.is_some();
            if has_source && !requests.is_empty() {
                deck.playing = true;
            }
            (requests, has_source)
        };

        for request in requests {
            let event = if has_source {
                EngineEvent::PlayStarted(request)
            } else {
                EngineEvent::PlayRejected {
                    request,
                    reason: "NotSupportedError: no source loaded".to_string(),
                }
            };
            self.emit(event);
        }
    }

    /// Advance playback by `seconds`
    ///
    /// Reaching the end of the track reports `Ended`. Any remainder past the
    /// end is dropped.
    pub fn tick(&self, seconds: f64) {
        let (position, ended) = {
            let mut deck = lock(&self.deck);
            if !deck.playing {
                return;
            }

            deck.position += seconds;
            let ended = deck.position >= self.track_length;
            if ended {
                deck.position = self.track_length;
                deck.playing = false;
            }
            (deck.position, ended)
        };

        self.emit(EngineEvent::TimeUpdate(position));
        if ended {
            self.emit(EngineEvent::Ended);
        }
    }

    /// Jump to the end of the current track
    pub fn end(&self) {
        {
            let mut deck = lock(&self.deck);
            if deck.source.is_none() {
                debug!("No source loaded, ignoring end");
                return;
            }
            deck.position = self.track_length;
            deck.playing = false;
        }

        self.emit(EngineEvent::Ended);
    }

    /// Report a media error
    pub fn fail(&self, reason: &str) {
        {
            let mut deck = lock(&self.deck);
            deck.playing = false;
            deck.pending.clear();
        }

        self.emit(EngineEvent::Error(reason.to_string()));
    }

    pub fn position(&self) -> f64 {
        lock(&self.deck).position
    }

    pub fn is_playing(&self) -> bool {
        lock(&self.deck).playing
    }

    pub fn gain(&self) -> f32 {
        lock(&self.deck).gain
    }

    pub fn is_muted(&self) -> bool {
        lock(&self.deck).muted
    }

    pub fn source(&self) -> Option<String> {
        lock(&self.deck).source.clone()
    }

    fn emit(&self, event: EngineEvent) {
        let _ = self.event_tx.send(event);
    }
}
