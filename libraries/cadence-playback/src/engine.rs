//! Media engine abstraction
//!
//! The session never decodes audio itself. It drives one platform playback
//! primitive (an HTML audio element, a native player, a simulated engine in
//! tests) through this trait and receives the primitive's callbacks as
//! [`EngineEvent`]s.

use std::fmt;

/// Identifier of one asynchronous play request
///
/// Issued by the session in strictly increasing order. The engine echoes it
/// back in [`EngineEvent::PlayStarted`] / [`EngineEvent::PlayRejected`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlayRequestId(u64);

impl PlayRequestId {
    /// Wrap a raw sequence number
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw sequence number
    pub const fn get(self) -> u64 {
        self.0
    }

    pub(crate) fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for PlayRequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Platform playback primitive
///
/// Implementors must not call back into the session synchronously; completions
/// and progress are delivered later through
/// [`PlaybackSession::handle_event`](crate::PlaybackSession::handle_event).
pub trait MediaEngine: Send {
    /// Replace the source and start loading it
    fn load(&mut self, url: &str);

    /// Currently loaded source URL
    fn source(&self) -> Option<&str>;

    /// Request playback of the loaded source
    ///
    /// Asynchronous: the outcome arrives later as `PlayStarted(request)` or
    /// `PlayRejected { request, .. }`.
    fn play(&mut self, request: PlayRequestId);

    /// Pause playback, keeping position
    fn pause(&mut self);

    /// Set the playback position in seconds
    fn set_position(&mut self, seconds: f64);

    /// Set output gain in [0.0, 1.0]
    fn set_volume(&mut self, gain: f32);

    /// Set the mute flag (independent of gain)
    fn set_muted(&mut self, muted: bool);
}

/// Callbacks from the engine
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// Position advanced (seconds)
    TimeUpdate(f64),

    /// Source metadata is available
    MetadataLoaded {
        /// Source duration in seconds
        duration: f64,
    },

    /// Source played to the end
    Ended,

    /// Load or decode failure
    Error(String),

    /// A play request resolved
    PlayStarted(PlayRequestId),

    /// A play request was refused
    PlayRejected {
        request: PlayRequestId,
        reason: String,
    },
}

impl EngineEvent {
    /// Request this event completes, if it is a play completion
    pub fn request(&self) -> Option<PlayRequestId> {
        match self {
            Self::PlayStarted(request) | Self::PlayRejected { request, .. } => Some(*request),
            _ => None,
        }
    }
}
