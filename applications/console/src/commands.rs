//! Console command parsing
//!
//! One command per line. Blank lines and lines starting with `#` are skipped.

use crate::error::{ConsoleError, Result};
use std::time::Duration;

/// A parsed console command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Play the given paths as a new queue, starting at the first
    Play(Vec<String>),
    Pause,
    Resume,
    Next,
    Prev,
    Seek(f64),
    Volume(u8),
    Mute,
    Shuffle,
    Loop,
    /// Advance the simulated clock
    Tick(Duration),
    /// Make the engine report end of track
    End,
    /// Make the engine report an error
    Fail(String),
    /// Arm the sleep timer, or cancel it with `None`
    Sleep(Option<Duration>),
    State,
    Quit,
}

impl Command {
    /// Parse one input line
    ///
    /// Returns `Ok(None)` for blank lines and comments.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };

        let command = match name.to_ascii_lowercase().as_str() {
            "play" => {
                let paths: Vec<String> = rest.split_whitespace().map(str::to_string).collect();
                if paths.is_empty() {
                    return Err(ConsoleError::invalid("play", "expected at least one path"));
                }
                Command::Play(paths)
            }
            "pause" => Command::Pause,
            "resume" => Command::Resume,
            "next" => Command::Next,
            "prev" | "previous" => Command::Prev,
            "seek" => Command::Seek(parse_seconds("seek", rest)?),
            "volume" | "vol" => Command::Volume(parse_volume(rest)?),
            "mute" => Command::Mute,
            "shuffle" => Command::Shuffle,
            "loop" => Command::Loop,
            "tick" => Command::Tick(parse_duration("tick", rest)?),
            "end" => Command::End,
            "fail" => {
                let reason = if rest.is_empty() { "simulated failure" } else { rest };
                Command::Fail(reason.to_string())
            }
            "sleep" => match rest {
                "off" | "cancel" => Command::Sleep(None),
                _ => Command::Sleep(Some(parse_duration("sleep", rest)?)),
            },
            "state" => Command::State,
            "quit" | "exit" => Command::Quit,
            _ => return Err(ConsoleError::UnknownCommand(name.to_string())),
        };

        Ok(Some(command))
    }
}

fn parse_seconds(command: &'static str, raw: &str) -> Result<f64> {
    let seconds: f64 = raw
        .parse()
        .map_err(|_| ConsoleError::invalid(command, format!("'{raw}' is not a number of seconds")))?;

    if !seconds.is_finite() {
        return Err(ConsoleError::invalid(command, "seconds must be finite"));
    }

    Ok(seconds)
}

fn parse_duration(command: &'static str, raw: &str) -> Result<Duration> {
    let seconds = parse_seconds(command, raw)?;
    Duration::try_from_secs_f64(seconds).map_err(|e| ConsoleError::invalid(command, e.to_string()))
}

fn parse_volume(raw: &str) -> Result<u8> {
    let level: u8 = raw
        .parse()
        .map_err(|_| ConsoleError::invalid("volume", format!("'{raw}' is not 0-100")))?;

    if level > 100 {
        return Err(ConsoleError::invalid("volume", format!("{level} is not 0-100")));
    }

    Ok(level)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Command {
        Command::parse(line).unwrap().unwrap()
    }

    #[test]
    fn skips_blank_and_comments() {
        assert_eq!(Command::parse("").unwrap(), None);
        assert_eq!(Command::parse("   ").unwrap(), None);
        assert_eq!(Command::parse("# queue setup").unwrap(), None);
    }

    #[test]
    fn parses_play_with_paths() {
        assert_eq!(
            parse("play /music/a.mp3   /music/b.mp3"),
            Command::Play(vec!["/music/a.mp3".into(), "/music/b.mp3".into()])
        );
        assert!(Command::parse("play").is_err());
    }

    #[test]
    fn parses_transport() {
        assert_eq!(parse("pause"), Command::Pause);
        assert_eq!(parse("RESUME"), Command::Resume);
        assert_eq!(parse("next"), Command::Next);
        assert_eq!(parse("previous"), Command::Prev);
        assert_eq!(parse("seek 12.5"), Command::Seek(12.5));
        assert_eq!(parse("shuffle"), Command::Shuffle);
        assert_eq!(parse("loop"), Command::Loop);
        assert_eq!(parse("quit"), Command::Quit);
    }

    #[test]
    fn volume_must_be_in_range() {
        assert_eq!(parse("volume 0"), Command::Volume(0));
        assert_eq!(parse("vol 100"), Command::Volume(100));
        assert!(matches!(
            Command::parse("volume 101"),
            Err(ConsoleError::InvalidArgument { command: "volume", .. })
        ));
        assert!(Command::parse("volume loud").is_err());
        assert!(Command::parse("volume -3").is_err());
    }

    #[test]
    fn durations_reject_negative_and_nan() {
        assert_eq!(parse("tick 1.5"), Command::Tick(Duration::from_millis(1500)));
        assert!(Command::parse("tick -1").is_err());
        assert!(Command::parse("tick NaN").is_err());
        assert!(Command::parse("seek inf").is_err());
    }

    #[test]
    fn sleep_and_fail() {
        assert_eq!(parse("sleep 900"), Command::Sleep(Some(Duration::from_secs(900))));
        assert_eq!(parse("sleep off"), Command::Sleep(None));
        assert_eq!(parse("fail decode error"), Command::Fail("decode error".into()));
        assert_eq!(parse("fail"), Command::Fail("simulated failure".into()));
    }

    #[test]
    fn unknown_command() {
        assert!(matches!(
            Command::parse("rewind 10"),
            Err(ConsoleError::UnknownCommand(name)) if name == "rewind"
        ));
    }
}
