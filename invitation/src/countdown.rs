use std::time::Duration;

use chrono::{Local, NaiveDateTime, TimeZone};
use engine::timer::Interval;
use serde::{Deserialize, Serialize};

use crate::clock::Clock;

const SECOND_MS: i64 = 1_000;
const MINUTE_MS: i64 = 60 * SECOND_MS;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownParts {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl CountdownParts {
    pub const ZERO: CountdownParts = CountdownParts {
        days: 0,
        hours: 0,
        minutes: 0,
        seconds: 0,
    };

    /// Splits a remaining distance; anything already past shows as all zeros.
    pub fn from_distance_ms(distance: i64) -> Self {
        if distance < 0 {
            return Self::ZERO;
        }
        Self {
            days: distance / DAY_MS,
            hours: (distance % DAY_MS) / HOUR_MS,
            minutes: (distance % HOUR_MS) / MINUTE_MS,
            seconds: (distance % MINUTE_MS) / SECOND_MS,
        }
    }
}

/// Time remaining until a fixed target. Stateless apart from the target itself;
/// every reading is computed from scratch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    target_ms: Option<i64>,
}

impl Countdown {
    pub fn at_epoch_ms(target_ms: i64) -> Self {
        Self {
            target_ms: Some(target_ms),
        }
    }

    /// Parses `YYYY-MM-DDTHH:MM:SS` in the local time zone. A target that does
    /// not parse (or does not exist locally) yields a countdown stuck at zero.
    pub fn parse_local(target: &str) -> Self {
        let target_ms = NaiveDateTime::parse_from_str(target, "%Y-%m-%dT%H:%M:%S")
            .ok()
            .and_then(|naive| Local.from_local_datetime(&naive).earliest())
            .map(|dt| dt.timestamp_millis());
        if target_ms.is_none() {
            tracing::warn!(value = %target, "countdown target unreadable; showing zeros");
        }
        Self { target_ms }
    }

    pub fn target_ms(&self) -> Option<i64> {
        self.target_ms
    }

    pub fn parts_at(&self, now_ms: i64) -> CountdownParts {
        match self.target_ms {
            Some(target) => CountdownParts::from_distance_ms(target.saturating_sub(now_ms)),
            None => CountdownParts::ZERO,
        }
    }
}

/// Re-reads the countdown on a fixed period until stopped.
#[derive(Debug, Clone)]
pub struct CountdownTicker {
    countdown: Countdown,
    interval: Interval,
    running: bool,
}

impl CountdownTicker {
    pub fn new(countdown: Countdown, period: Duration) -> Self {
        Self {
            countdown,
            interval: Interval::new(period),
            running: true,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn stop(&mut self) {
        if self.running {
            tracing::info!("countdown ticker stopped");
        }
        self.running = false;
    }

    pub fn read(&self, clock: &dyn Clock) -> CountdownParts {
        self.countdown.parts_at(clock.now_ms())
    }

    /// A fresh reading if at least one period elapsed during `dt`.
    pub fn tick(&mut self, dt: Duration, clock: &dyn Clock) -> Option<CountdownParts> {
        if !self.running || self.interval.tick(dt) == 0 {
            return None;
        }
        Some(self.read(clock))
    }
}
