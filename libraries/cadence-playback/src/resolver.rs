//! Track to media URL resolution
//!
//! The library backend serves audio at `{base}/play-file/{file name}`. The
//! session only needs the URL; fetching is the engine's job.

use crate::error::{PlaybackError, Result};
use crate::types::Track;
use url::Url;

/// Default backend address of the desktop client
pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8000";

/// Maps a track to the URL its engine should load
pub trait SourceResolver: Send {
    /// Resolve `track`, or fail without side effects
    fn resolve(&self, track: &Track) -> Result<String>;
}

/// Resolver for the library backend's `play-file` route
#[derive(Debug, Clone)]
pub struct BackendResolver {
    base: Url,
}

impl BackendResolver {
    /// Create a resolver for the backend at `base_url`
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            base: parse_base_url(base_url)?,
        })
    }

    /// Backend base URL
    pub fn base_url(&self) -> &str {
        self.base.as_str()
    }

    /// Point the resolver at another backend
    ///
    /// Already-loaded sources are not affected; the next `play_track` with a
    /// different URL reloads.
    pub fn set_base_url(&mut self, base_url: &str) -> Result<()> {
        self.base = parse_base_url(base_url)?;
        Ok(())
    }
}

impl Default for BackendResolver {
    fn default() -> Self {
        Self {
            base: Url::parse(DEFAULT_BACKEND_URL).expect("default backend URL is valid"),
        }
    }
}

impl SourceResolver for BackendResolver {
    fn resolve(&self, track: &Track) -> Result<String> {
        let file_name = file_name(&track.path)
            .ok_or_else(|| PlaybackError::UnresolvableSource(track.path.clone()))?;

        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| PlaybackError::InvalidBaseUrl(self.base.to_string()))?
            .pop_if_empty()
            .push("play-file")
            .push(file_name);

        Ok(url.into())
    }
}

/// Last path component, accepting both Windows and POSIX separators
pub fn file_name(path: &str) -> Option<&str> {
    path.rsplit(|c| c == '\\' || c == '/')
        .next()
        .filter(|name| !name.is_empty())
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim())
        .map_err(|e| PlaybackError::InvalidBaseUrl(format!("{raw}: {e}")))?;

    match url.scheme() {
        "http" | "https" if !url.cannot_be_a_base() => Ok(url),
        _ => Err(PlaybackError::InvalidBaseUrl(format!(
            "{raw}: URL must start with http:// or https://"
        ))),
    }
}
