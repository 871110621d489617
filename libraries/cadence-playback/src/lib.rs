//! Cadence - Playback Session
//!
//! Single-engine playback coordination for the Cadence desktop client.
//!
//! This crate provides:
//! - Transport controls (play/pause/resume/seek/next/previous)
//! - Linear volume (0-100%) with independent mute
//! - Shuffle without repeats until every queued track has played
//! - Loop (replay current track when it ends)
//! - Sleep timer
//! - State snapshots published to subscribers
//!
//! # Architecture
//!
//! `cadence-playback` never decodes or fetches audio:
//! - The platform playback primitive is a [`MediaEngine`]
//! - Track paths become URLs through a [`SourceResolver`]
//! - Engine callbacks come back in as [`EngineEvent`]s
//!
//! # Example: Basic Playback
//!
//! ```rust
//! use cadence_playback::{
//!     EngineEvent, MediaEngine, PlayRequestId, PlaybackConfig, PlaybackSession, Track,
//! };
//!
//! #[derive(Default)]
//! struct SilentEngine {
//!     source: Option<String>,
//!     last_request: Option<PlayRequestId>,
//! }
//!
//! impl MediaEngine for SilentEngine {
//!     fn load(&mut self, url: &str) { self.source = Some(url.to_string()); }
//!     fn source(&self) -> Option<&str> { self.source.as_deref() }
//!     fn play(&mut self, request: PlayRequestId) { self.last_request = Some(request); }
//!     fn pause(&mut self) {}
//!     fn set_position(&mut self, _seconds: f64) {}
//!     fn set_volume(&mut self, _gain: f32) {}
//!     fn set_muted(&mut self, _muted: bool) {}
//! }
//!
//! let mut session = PlaybackSession::new(SilentEngine::default(), PlaybackConfig::default());
//! let _subscription = session.subscribe(|state| println!("playing: {}", state.is_playing));
//!
//! let queue = vec![
//!     Track::new("1", "/music/one.mp3", "one.mp3"),
//!     Track::new("2", "/music/two.mp3", "two.mp3"),
//! ];
//! session.play_playlist(queue, 0);
//!
//! // The engine reports back asynchronously
//! let request = session.engine().last_request.unwrap();
//! session.handle_event(EngineEvent::PlayStarted(request));
//! assert!(session.get_state().is_playing);
//!
//! session.play_next();
//! assert_eq!(session.get_state().current_index, Some(1));
//! ```

mod engine;
mod error;
mod events;
mod resolver;
mod session;
mod shuffle;
mod store;
mod timer;
pub mod types;
mod volume;

// Public exports
pub use engine::{EngineEvent, MediaEngine, PlayRequestId};
pub use error::{PlaybackError, Result};
pub use events::{Listener, Subscribers, Subscription};
pub use resolver::{file_name, BackendResolver, SourceResolver, DEFAULT_BACKEND_URL};
pub use session::PlaybackSession;
pub use shuffle::{ShuffleHistory, SHUFFLE_HISTORY_KEY};
pub use store::{HistoryStore, MemoryStore};
pub use timer::SleepTimer;
pub use types::{PlaybackConfig, PlaybackState, Track, TrackMetadata, DEFAULT_VOLUME};
pub use volume::Volume;
