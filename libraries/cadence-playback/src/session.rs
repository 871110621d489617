//! Playback session - core orchestration
//!
//! Owns the engine, the resolver and the published state. Every transport
//! call and every engine callback goes through here, and each one publishes
//! at most one snapshot.

use crate::{
    engine::{EngineEvent, MediaEngine, PlayRequestId},
    error::PlaybackError,
    events::{Listener, Subscribers, Subscription},
    resolver::{BackendResolver, SourceResolver},
    shuffle::ShuffleHistory,
    store::{HistoryStore, MemoryStore},
    timer::SleepTimer,
    types::{PlaybackConfig, PlaybackState, Track},
    volume::Volume,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Single-engine playback session
///
/// Built once by the application root and handed to whoever needs it. Only
/// the session writes to the engine.
///
/// Play requests are asynchronous: `play_track` returns right away and the
/// engine later reports `PlayStarted` / `PlayRejected`. Only the completion
/// of the most recent request is applied; `pause` cancels the pending one.
pub struct PlaybackSession<E, R = BackendResolver> {
    state: PlaybackState,
    engine: E,
    resolver: R,

    volume: Volume,
    shuffle_history: ShuffleHistory,
    rng: StdRng,

    subscribers: Subscribers,

    // Last issued id, and the one whose completion is still awaited
    last_request: PlayRequestId,
    pending_request: Option<PlayRequestId>,

    sleep_timer: Option<SleepTimer>,
}

impl<E: MediaEngine> PlaybackSession<E, BackendResolver> {
    /// Create a session resolving against the default backend
    pub fn new(engine: E, config: PlaybackConfig) -> Self {
        Self::with_resolver(engine, BackendResolver::default(), config)
    }
}

impl<E: MediaEngine, R: SourceResolver> PlaybackSession<E, R> {
    /// Create a session with a custom resolver
    pub fn with_resolver(mut engine: E, resolver: R, config: PlaybackConfig) -> Self {
        let state = PlaybackState::from_config(&config);
        let volume = Volume::new(state.volume);

        engine.set_volume(volume.gain());
        engine.set_muted(false);

        let mut shuffle_history = ShuffleHistory::new(Box::new(MemoryStore::new()));
        if state.is_shuffle {
            shuffle_history.start(None);
        }

        Self {
            state,
            engine,
            resolver,
            volume,
            shuffle_history,
            rng: StdRng::from_entropy(),
            subscribers: Subscribers::new(),
            last_request: PlayRequestId::new(0),
            pending_request: None,
            sleep_timer: None,
        }
    }

    /// Persist shuffle history in `store` instead of the private in-memory one
    #[must_use]
    pub fn with_history_store(mut self, store: Box<dyn HistoryStore>) -> Self {
        self.shuffle_history = ShuffleHistory::new(store);
        self
    }

    /// Make shuffle picks reproducible
    #[must_use]
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    // ===== Subscriptions =====

    /// Register a listener for state snapshots
    pub fn subscribe<F>(&mut self, listener: F) -> Subscription
    where
        F: FnMut(&PlaybackState) + Send + 'static,
    {
        let boxed: Listener = Box::new(listener);
        self.subscribers.subscribe(boxed)
    }

    /// Remove a listener
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        self.subscribers.unsubscribe(subscription)
    }

    fn publish(&mut self) {
        self.subscribers.publish(&self.state);
    }

    // ===== State Queries =====

    /// Copy of the current snapshot
    pub fn get_state(&self) -> PlaybackState {
        self.state.clone()
    }

    /// Borrow the current snapshot
    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    /// Read-only access to the engine
    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Resolver access, e.g. to switch backend at runtime
    pub fn resolver_mut(&mut self) -> &mut R {
        &mut self.resolver
    }

    /// Ids already played in the current shuffle cycle
    pub fn shuffle_history(&self) -> Vec<String> {
        self.shuffle_history.ids()
    }

    /// Play request still awaiting its completion
    pub fn pending_request(&self) -> Option<PlayRequestId> {
        self.pending_request
    }

    // ===== Playback Control =====

    /// Play `track` as part of `queue` at `index`
    ///
    /// If the track resolves to the source already loaded, the engine keeps
    /// its position. An unresolvable track aborts before anything changes.
    pub fn play_track(&mut self, track: Track, queue: Vec<Track>, index: Option<usize>) {
        let Some(url) = self.resolve(&track) else {
            return;
        };

        let index = match index {
            Some(i) if i >= queue.len() => {
                warn!(index = i, queue_len = queue.len(), "Queue index out of range, ignoring");
                None
            }
            other => other,
        };

        info!(track_id = %track.id, url = %url, "Playing track");

        self.load_if_changed(&url);
        self.state.current_track = Some(track);
        self.state.current_queue = queue;
        self.state.current_index = index;
        self.request_play();
        self.publish();
    }

    /// Play `tracks[start_index]` with the whole list as queue
    pub fn play_playlist(&mut self, tracks: Vec<Track>, start_index: usize) {
        match tracks.get(start_index).cloned() {
            Some(track) => self.play_track(track, tracks, Some(start_index)),
            None => debug!(
                start_index,
                len = tracks.len(),
                "Nothing to play in playlist"
            ),
        }
    }

    /// Pause playback
    pub fn pause(&mut self) {
        self.engine.pause();
        self.pending_request = None;
        self.state.is_playing = false;
        self.publish();
    }

    /// Resume the current track from where it stopped
    pub fn resume(&mut self) {
        match self.state.current_track.clone() {
            Some(track) => {
                let queue = self.state.current_queue.clone();
                let index = self.state.current_index;
                self.play_track(track, queue, index);
            }
            None => debug!("Nothing to resume"),
        }
    }

    /// Seek to `seconds`
    ///
    /// `current_time` is updated immediately rather than on the engine's next
    /// time update.
    pub fn seek(&mut self, seconds: f64) {
        let seconds = if seconds.is_finite() {
            seconds.max(0.0)
        } else {
            0.0
        };

        self.engine.set_position(seconds);
        self.state.current_time = seconds;
        self.publish();
    }

    /// Set volume (0-100)
    pub fn set_volume(&mut self, level: u8) {
        self.volume.set_level(level);
        self.engine.set_volume(self.volume.gain());
        self.state.volume = self.volume.level();
        self.publish();
    }

    /// Toggle mute (volume level is kept)
    pub fn toggle_mute(&mut self) {
        let muted = self.volume.toggle_mute();
        self.engine.set_muted(muted);
        self.state.is_muted = muted;
        self.publish();
    }

    /// Advance in the queue
    pub fn play_next(&mut self) {
        if self.advance() {
            self.publish();
        }
    }

    /// Go back one position in the queue
    ///
    /// Does nothing at the start of the queue.
    pub fn play_previous(&mut self) {
        let Some(index) = self.state.current_index else {
            debug!("No queue position, ignoring previous");
            return;
        };

        if index == 0 || self.state.current_queue.is_empty() {
            debug!("At start of queue, ignoring previous");
            return;
        }

        if self.start_at(index - 1) {
            self.publish();
        }
    }

    /// Toggle shuffle
    ///
    /// Turning it on starts a new cycle that counts the current track as
    /// played; turning it off forgets the cycle.
    pub fn toggle_shuffle(&mut self) {
        self.state.is_shuffle = !self.state.is_shuffle;

        if self.state.is_shuffle {
            let current = self.state.current_track.as_ref().map(|t| t.id.as_str());
            self.shuffle_history.start(current);
        } else {
            self.shuffle_history.clear();
        }

        self.publish();
    }

    /// Toggle loop (repeat current track when it ends)
    pub fn toggle_loop(&mut self) {
        self.state.is_loop = !self.state.is_loop;
        self.publish();
    }

    // ===== Sleep Timer =====

    /// Pause playback once `after` has elapsed from `now`
    ///
    /// Replaces any running timer.
    pub fn set_sleep_timer(&mut self, after: Duration, now: Instant) {
        info!(minutes = after.as_secs() / 60, "Sleep timer set");
        self.sleep_timer = Some(SleepTimer::new(after, now));
    }

    /// Cancel the running timer, returns false if none was set
    pub fn cancel_sleep_timer(&mut self) -> bool {
        self.sleep_timer.take().is_some()
    }

    pub fn sleep_timer(&self) -> Option<&SleepTimer> {
        self.sleep_timer.as_ref()
    }

    /// Time left on the running timer
    pub fn sleep_timer_remaining(&self, now: Instant) -> Option<Duration> {
        self.sleep_timer.map(|t| t.remaining(now))
    }

    /// Fire the sleep timer if it is due
    ///
    /// Returns true when the timer fired (and was cleared).
    pub fn poll_sleep_timer(&mut self, now: Instant) -> bool {
        match self.sleep_timer {
            Some(timer) if timer.is_expired(now) => {
                self.sleep_timer = None;
                info!("Sleep timer elapsed");
                if self.state.is_playing || self.pending_request.is_some() {
                    self.pause();
                }
                true
            }
            _ => false,
        }
    }

    // ===== Engine Events =====

    /// Apply an engine callback
    pub fn handle_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::TimeUpdate(seconds) => {
                if !seconds.is_finite() {
                    return;
                }
                self.state.current_time = seconds;
                self.publish();
            }

            EngineEvent::MetadataLoaded { duration } => {
                self.state.duration = if duration.is_finite() { duration } else { 0.0 };
                self.publish();
            }

            EngineEvent::Ended => {
                self.state.is_playing = false;
                if self.state.is_loop && self.state.current_track.is_some() {
                    self.restart_current();
                } else {
                    self.advance();
                }
                self.publish();
            }

            EngineEvent::Error(message) => {
                let err = PlaybackError::Engine(message);
                error!(error = %err, "Audio engine error");
                self.pending_request = None;
                self.state.is_playing = false;
                self.publish();
            }

            EngineEvent::PlayStarted(request) => {
                if !self.take_pending(request) {
                    return;
                }
                self.state.is_playing = true;
                self.publish();
            }

            EngineEvent::PlayRejected { request, reason } => {
                if !self.take_pending(request) {
                    return;
                }
                let err = PlaybackError::PlayRejected(reason);
                error!(request = %request, error = %err, "Failed to play track");
                self.state.is_playing = false;
                self.publish();
            }
        }
    }

    // ===== Internals =====

    fn resolve(&self, track: &Track) -> Option<String> {
        match self.resolver.resolve(track) {
            Ok(url) => Some(url),
            Err(e) => {
                error!(track_id = %track.id, path = %track.path, error = %e, "Cannot play track");
                None
            }
        }
    }

    fn load_if_changed(&mut self, url: &str) {
        if self.engine.source() != Some(url) {
            self.state.current_time = 0.0;
            self.state.duration = 0.0;
            self.engine.load(url);
        }
    }

    fn request_play(&mut self) {
        self.last_request = self.last_request.next();
        self.pending_request = Some(self.last_request);
        self.engine.play(self.last_request);
    }

    /// Accept a completion only if it belongs to the pending request
    fn take_pending(&mut self, request: PlayRequestId) -> bool {
        if self.pending_request == Some(request) {
            self.pending_request = None;
            true
        } else {
            debug!(
                request = %request,
                pending = ?self.pending_request,
                "Ignoring stale play completion"
            );
            false
        }
    }

    /// Play the queue entry at `index`, keeping the queue
    fn start_at(&mut self, index: usize) -> bool {
        let Some(track) = self.state.current_queue.get(index).cloned() else {
            return false;
        };
        let Some(url) = self.resolve(&track) else {
            return false;
        };

        info!(track_id = %track.id, index, "Playing queue entry");

        self.load_if_changed(&url);
        self.state.current_track = Some(track);
        self.state.current_index = Some(index);
        self.request_play();
        true
    }

    /// Replay the current track from the top (loop mode)
    fn restart_current(&mut self) {
        let Some(track) = self.state.current_track.clone() else {
            return;
        };
        let Some(url) = self.resolve(&track) else {
            return;
        };

        debug!(track_id = %track.id, "Looping track");

        self.load_if_changed(&url);
        self.engine.set_position(0.0);
        self.state.current_time = 0.0;
        self.request_play();
    }

    /// Queue-advance step shared by `play_next` and track end
    ///
    /// Returns false when nothing changed.
    fn advance(&mut self) -> bool {
        if self.state.is_shuffle {
            self.advance_shuffled()
        } else {
            self.advance_in_order()
        }
    }

    fn advance_in_order(&mut self) -> bool {
        let next = self.state.current_index.map_or(0, |i| i + 1);

        if next < self.state.current_queue.len() {
            self.start_at(next)
        } else {
            warn!("End of queue or no queue active");
            self.stop();
            true
        }
    }

    fn advance_shuffled(&mut self) -> bool {
        if self.state.current_queue.is_empty() {
            warn!("Shuffle with no queue active");
            self.stop();
            return true;
        }

        let mut pick = self
            .shuffle_history
            .pick_next(&self.state.current_queue, &mut self.rng);

        if pick.is_none() {
            debug!("Shuffle cycle exhausted, starting over");
            self.shuffle_history.clear();
            pick = self
                .shuffle_history
                .pick_next(&self.state.current_queue, &mut self.rng);
        }

        let Some(index) = pick else {
            return false;
        };

        // Recorded before starting so an unplayable track still leaves the pool
        let id = self.state.current_queue[index].id.clone();
        self.shuffle_history.record(&id);

        self.start_at(index)
    }

    /// Halt the engine at the end of the queue
    fn stop(&mut self) {
        self.engine.pause();
        self.pending_request = None;
        self.state.is_playing = false;
    }
}

impl<E, R> std::fmt::Debug for PlaybackSession<E, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackSession")
            .field("state", &self.state)
            .field("pending_request", &self.pending_request)
            .field("sleep_timer", &self.sleep_timer)
            .field("subscribers", &self.subscribers)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct NullEngine {
        source: Option<String>,
        position: f64,
        gain: f32,
        muted: bool,
        plays: Vec<PlayRequestId>,
    }

    impl MediaEngine for NullEngine {
        fn load(&mut self, url: &str) {
            self.source = Some(url.to_string());
            self.position = 0.0;
        }

        fn source(&self) -> Option<&str> {
            self.source.as_deref()
        }

        fn play(&mut self, request: PlayRequestId) {
            self.plays.push(request);
        }

        fn pause(&mut self) {}

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

    fn create_test_track(id: &str) -> Track {
        Track::new(id, format!("/music/{}.mp3", id), format!("{}.mp3", id))
    }

    fn session() -> PlaybackSession<NullEngine> {
        PlaybackSession::new(NullEngine::default(), PlaybackConfig::default())
    }

    #[test]
    fn create_session() {
        let session = session();
        let state = session.get_state();
        assert!(!state.is_playing);
        assert_eq!(state.volume, 50);
        assert_eq!(state.current_index, None);
        assert_eq!(session.engine().gain, 0.5);
    }

    #[test]
    fn play_request_ids_are_monotonic() {
        let mut session = session();
        let track = create_test_track("a");

        session.play_track(track.clone(), vec![], None);
        session.play_track(track, vec![], None);

        let plays = &session.engine().plays;
        assert_eq!(plays.len(), 2);
        assert!(plays[1] > plays[0]);
        assert_eq!(session.pending_request(), Some(plays[1]));
    }

    #[test]
    fn out_of_range_index_is_dropped() {
        let mut session = session();
        let a = create_test_track("a");

        session.play_track(a.clone(), vec![a], Some(3));
        assert_eq!(session.state().current_index, None);
    }

    #[test]
    fn pause_cancels_pending_request() {
        let mut session = session();
        session.play_track(create_test_track("a"), vec![], None);
        let request = session.pending_request().unwrap();

        session.pause();
        session.handle_event(EngineEvent::PlayStarted(request));

        assert!(!session.state().is_playing);
        assert_eq!(session.pending_request(), None);
    }

    #[test]
    fn seek_clamps_bad_input() {
        let mut session = session();
        session.seek(-4.0);
        assert_eq!(session.state().current_time, 0.0);

        session.seek(f64::NAN);
        assert_eq!(session.state().current_time, 0.0);
        assert_eq!(session.engine().position, 0.0);
    }

    #[test]
    fn initial_shuffle_from_config() {
        let config = PlaybackConfig {
            shuffle: true,
            ..Default::default()
        };
        let session = PlaybackSession::new(NullEngine::default(), config);
        assert!(session.state().is_shuffle);
        assert!(session.shuffle_history().is_empty());
    }
}
