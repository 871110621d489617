//! Cadence console - headless host for the playback session
//!
//! Wires configuration, a simulated engine and a line-oriented transport
//! console around [`cadence_playback::PlaybackSession`].

pub mod commands;
pub mod config;
pub mod console;
pub mod error;
pub mod headless;

pub use commands::Command;
pub use config::ConsoleConfig;
pub use console::{Console, Mode, Outcome};
pub use error::{ConsoleError, Result};
pub use headless::{EngineControl, HeadlessEngine};
