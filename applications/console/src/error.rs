/// Console error types
use cadence_playback::PlaybackError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConsoleError>;

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Invalid argument for '{command}': {message}")]
    InvalidArgument {
        command: &'static str,
        message: String,
    },

    #[error("Script line {line}: {source}")]
    Script {
        line: usize,
        #[source]
        source: Box<ConsoleError>,
    },

    #[error("Playback error: {0}")]
    Playback(#[from] PlaybackError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for ConsoleError {
    fn from(err: config::ConfigError) -> Self {
        ConsoleError::Config(err.to_string())
    }
}

impl ConsoleError {
    pub(crate) fn invalid(command: &'static str, message: impl Into<String>) -> Self {
        ConsoleError::InvalidArgument {
            command,
            message: message.into(),
        }
    }
}
