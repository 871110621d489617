//! Transport console
//!
//! Drives a [`PlaybackSession`] over the headless engine from text commands.
//! Time is simulated: the clock only moves on `tick`, and the sleep timer is
//! checked against that clock after every command.

use crate::commands::Command;
use crate::config::ConsoleConfig;
use crate::error::{ConsoleError, Result};
use crate::headless::{EngineControl, HeadlessEngine};
use cadence_playback::{
    file_name, BackendResolver, EngineEvent, PlaybackSession, PlaybackState, Subscription, Track,
};
use crossbeam_channel::Receiver;
use std::io::BufRead;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// What the caller should do after a command
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Continue,
    /// `state` was requested
    Report(PlaybackState),
    Quit,
}

/// How input lines are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Bad lines are logged and skipped
    Interactive,
    /// The first bad line aborts with its line number
    Script,
}

pub struct Console {
    session: PlaybackSession<HeadlessEngine>,
    control: EngineControl,
    events: Receiver<EngineEvent>,
    origin: Instant,
    elapsed: Duration,
}

impl Console {
    pub fn new(config: &ConsoleConfig) -> Result<Self> {
        let (engine, control, events) = HeadlessEngine::new(config.engine.track_length);
        let resolver = BackendResolver::new(&config.backend.base_url)?;
        let session = PlaybackSession::with_resolver(engine, resolver, config.playback.clone());

        Ok(Self {
            session,
            control,
            events,
            origin: Instant::now(),
            elapsed: Duration::ZERO,
        })
    }

    /// Register a snapshot listener on the session
    pub fn subscribe<F>(&mut self, listener: F) -> Subscription
    where
        F: FnMut(&PlaybackState) + Send + 'static,
    {
        self.session.subscribe(listener)
    }

    pub fn session(&self) -> &PlaybackSession<HeadlessEngine> {
        &self.session
    }

    pub fn control(&self) -> &EngineControl {
        &self.control
    }

    /// Current simulated time
    pub fn now(&self) -> Instant {
        self.origin + self.elapsed
    }

    /// Run one command, then deliver engine callbacks and check the sleep timer
    pub fn execute(&mut self, command: Command) -> Outcome {
        debug!(?command, "Executing command");
        let report = matches!(command, Command::State);

        match command {
            Command::Play(paths) => {
                let tracks = paths.iter().map(|path| track_for_path(path)).collect();
                self.session.play_playlist(tracks, 0);
            }
            Command::Pause => self.session.pause(),
            Command::Resume => self.session.resume(),
            Command::Next => self.session.play_next(),
            Command::Prev => self.session.play_previous(),
            Command::Seek(seconds) => self.session.seek(seconds),
            Command::Volume(level) => self.session.set_volume(level),
            Command::Mute => self.session.toggle_mute(),
            Command::Shuffle => self.session.toggle_shuffle(),
            Command::Loop => self.session.toggle_loop(),
            Command::Tick(step) => {
                self.elapsed += step;
                self.control.tick(step.as_secs_f64());
            }
            Command::End => self.control.end(),
            Command::Fail(reason) => self.control.fail(&reason),
            Command::Sleep(Some(after)) => {
                let now = self.now();
                self.session.set_sleep_timer(after, now);
            }
            Command::Sleep(None) => {
                if !self.session.cancel_sleep_timer() {
                    debug!("No sleep timer to cancel");
                }
            }
            Command::State => {}
            Command::Quit => return Outcome::Quit,
        }

        self.pump();

        if self.session.poll_sleep_timer(self.now()) {
            info!("Sleep timer paused playback");
            self.pump();
        }

        if report {
            Outcome::Report(self.session.get_state())
        } else {
            Outcome::Continue
        }
    }

    /// Feed engine callbacks into the session until the engine goes quiet
    fn pump(&mut self) {
        loop {
            self.control.settle();

            let mut handled = false;
            while let Ok(event) = self.events.try_recv() {
                self.session.handle_event(event);
                handled = true;
            }

            if !handled {
                break;
            }
        }
    }

    /// Execute every line of `input`
    ///
    /// `on_report` receives the snapshot for each `state` command. Stops at
    /// `quit` or end of input.
    pub fn run<B, F>(&mut self, input: B, mode: Mode, mut on_report: F) -> Result<()>
    where
        B: BufRead,
        F: FnMut(&PlaybackState),
    {
        for (number, line) in input.lines().enumerate() {
            let line = line?;

            let command = match Command::parse(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(e) => match mode {
                    Mode::Interactive => {
                        warn!(error = %e, "Ignoring input");
                        continue;
                    }
                    Mode::Script => {
                        return Err(ConsoleError::Script {
                            line: number + 1,
                            source: Box::new(e),
                        });
                    }
                },
            };

            match self.execute(command) {
                Outcome::Continue => {}
                Outcome::Report(state) => on_report(&state),
                Outcome::Quit => {
                    info!("Quit requested");
                    break;
                }
            }
        }

        Ok(())
    }
}

/// Build a track for a bare path, named after its file
fn track_for_path(path: &str) -> Track {
    let name = file_name(path).unwrap_or(path);
    Track::new(path, path, name)
}
