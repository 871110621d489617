//! Core types for the playback session

use serde::{Deserialize, Serialize};

/// Descriptive metadata attached to a track
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackMetadata {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    /// Duration in seconds, as reported by the library backend
    pub duration: Option<f64>,
    /// Cover art reference (URL or backend-relative path)
    pub cover_art: Option<String>,
}

/// A playable item
///
/// Supplied by the caller and never modified by the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    /// Unique track identifier from the library
    pub id: String,

    /// Library path, used to resolve the media URL
    pub path: String,

    /// Display name (usually the file name)
    pub name: String,

    /// Optional tag metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<TrackMetadata>,
}

impl Track {
    /// Create a track without metadata
    pub fn new(id: impl Into<String>, path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
            name: name.into(),
            metadata: None,
        }
    }

    /// Attach metadata
    #[must_use]
    pub fn with_metadata(mut self, metadata: TrackMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Title from metadata, falling back to the display name
    pub fn title(&self) -> &str {
        self.metadata
            .as_ref()
            .and_then(|m| m.title.as_deref())
            .unwrap_or(&self.name)
    }
}

/// Snapshot of the playback session
///
/// Replaced wholesale on every change. Subscribers only ever see a borrow of
/// a published snapshot, and `get_state` hands out clones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackState {
    pub is_playing: bool,

    /// Position in seconds
    pub current_time: f64,

    /// Duration of the loaded source in seconds (0 until metadata arrives)
    pub duration: f64,

    /// Volume level (0-100)
    pub volume: u8,

    pub is_muted: bool,

    pub current_track: Option<Track>,

    pub current_queue: Vec<Track>,

    /// Position of `current_track` in `current_queue`, if any
    pub current_index: Option<usize>,

    pub is_shuffle: bool,

    pub is_loop: bool,
}

impl PlaybackState {
    /// Initial state for a session built with `config`
    pub fn from_config(config: &PlaybackConfig) -> Self {
        Self {
            volume: config.volume.min(100),
            is_shuffle: config.shuffle,
            is_loop: config.repeat,
            ..Self::default()
        }
    }

    /// Whether a queue (playlist/album context) is attached
    pub fn has_active_queue(&self) -> bool {
        !self.current_queue.is_empty()
    }

    /// Whether the current track comes from `tracks` while a queue is active
    ///
    /// Used by list views to decide if "their" playlist is the one playing.
    pub fn is_playing_from(&self, tracks: &[Track]) -> bool {
        if !self.has_active_queue() {
            return false;
        }

        match &self.current_track {
            Some(current) => tracks.iter().any(|t| t.id == current.id),
            None => false,
        }
    }
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            is_playing: false,
            current_time: 0.0,
            duration: 0.0,
            volume: DEFAULT_VOLUME,
            is_muted: false,
            current_track: None,
            current_queue: Vec::new(),
            current_index: None,
            is_shuffle: false,
            is_loop: false,
        }
    }
}

/// Default volume level for a fresh session
pub const DEFAULT_VOLUME: u8 = 50;

/// Configuration for a playback session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Initial volume (0-100, default: 50)
    pub volume: u8,

    /// Initial shuffle flag (default: off)
    pub shuffle: bool,

    /// Initial loop flag (default: off)
    pub repeat: bool,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            volume: DEFAULT_VOLUME,
            shuffle: false,
            repeat: false,
        }
    }
}
