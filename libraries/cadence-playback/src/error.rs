//! Error types for the playback session

use thiserror::Error;

/// Playback errors
///
/// None of these reach callers of the transport methods; the session absorbs
/// them into state (`is_playing = false`) and a log line.
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Track path has no usable file name
    #[error("Could not determine file name from path: {0}")]
    UnresolvableSource(String),

    /// Backend base URL is malformed or not http(s)
    #[error("Invalid backend URL: {0}")]
    InvalidBaseUrl(String),

    /// Engine reported a load/decode error
    #[error("Engine error: {0}")]
    Engine(String),

    /// Engine refused a play request (autoplay block, decode failure)
    #[error("Play request rejected: {0}")]
    PlayRejected(String),

    /// Stored shuffle history could not be decoded
    #[error("Shuffle history is corrupt: {0}")]
    HistoryCorrupt(#[from] serde_json::Error),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
