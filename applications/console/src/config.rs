/// Console configuration
use crate::error::{ConsoleError, Result};
use cadence_playback::{BackendResolver, PlaybackConfig, DEFAULT_BACKEND_URL};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file read from the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "cadence.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConsoleConfig {
    #[serde(default)]
    pub playback: PlaybackConfig,

    #[serde(default = "default_backend")]
    pub backend: BackendSettings,

    #[serde(default = "default_engine")]
    pub engine: EngineSettings,

    #[serde(default = "default_logging")]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EngineSettings {
    /// Length of every simulated track, in seconds
    #[serde(default = "default_track_length")]
    pub track_length: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingSettings {
    /// `EnvFilter` directives used when `RUST_LOG` is unset
    #[serde(default = "default_filter")]
    pub filter: String,
}

impl ConsoleConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist; otherwise `cadence.toml` is read if
    /// present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::from_sources(path, environment())
    }

    pub(crate) fn from_sources(path: Option<&Path>, env: config::Environment) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path).required(true));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        // Override with environment variables (CADENCE_PLAYBACK__VOLUME=30)
        settings = settings.add_source(env);

        let config = settings.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.playback.volume > 100 {
            return Err(ConsoleError::Config(format!(
                "playback.volume must be 0-100, got {}",
                self.playback.volume
            )));
        }

        BackendResolver::new(&self.backend.base_url)
            .map_err(|e| ConsoleError::Config(e.to_string()))?;

        if !self.engine.track_length.is_finite() || self.engine.track_length <= 0.0 {
            return Err(ConsoleError::Config(format!(
                "engine.track_length must be a positive number of seconds, got {}",
                self.engine.track_length
            )));
        }

        tracing_subscriber::EnvFilter::try_new(&self.logging.filter).map_err(|e| {
            ConsoleError::Config(format!("invalid logging.filter '{}': {e}", self.logging.filter))
        })?;

        Ok(())
    }
}

pub(crate) fn environment() -> config::Environment {
    config::Environment::with_prefix("CADENCE")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

// Default values
fn default_backend() -> BackendSettings {
    BackendSettings {
        base_url: default_base_url(),
    }
}

fn default_base_url() -> String {
    DEFAULT_BACKEND_URL.to_string()
}

fn default_engine() -> EngineSettings {
    EngineSettings {
        track_length: default_track_length(),
    }
}

fn default_track_length() -> f64 {
    180.0
}

fn default_logging() -> LoggingSettings {
    LoggingSettings {
        filter: default_filter(),
    }
}

fn default_filter() -> String {
    "cadence_console=info,cadence_playback=info".to_string()
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            playback: PlaybackConfig::default(),
            backend: default_backend(),
            engine: default_engine(),
            logging: default_logging(),
        }
    }
}
