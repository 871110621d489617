//! Sleep timer
//!
//! Pauses playback once a chosen amount of time has passed. The timer holds no
//! clock of its own; callers pass `now` so hosts decide the tick source.

use std::time::{Duration, Instant};

/// Sleep timer armed at `started_at` for `duration`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SleepTimer {
    started_at: Instant,
    duration: Duration,
}

impl SleepTimer {
    pub fn new(duration: Duration, now: Instant) -> Self {
        Self {
            started_at: now,
            duration,
        }
    }

    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn deadline(&self) -> Instant {
        self.started_at + self.duration
    }

    /// Time left before the timer fires (zero once expired)
    pub fn remaining(&self, now: Instant) -> Duration {
        self.deadline().saturating_duration_since(now)
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.deadline()
    }

    /// Elapsed fraction in [0.0, 1.0], for progress bars
    pub fn progress(&self, now: Instant) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }

        let elapsed = now.saturating_duration_since(self.started_at);
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0)
    }
}
