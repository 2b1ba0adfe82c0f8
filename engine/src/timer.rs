use std::time::Duration;

/// A one-shot countdown fed by elapsed time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delay {
    remaining: Duration,
}

impl Delay {
    pub fn new(duration: Duration) -> Self {
        Self {
            remaining: duration,
        }
    }

    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    pub fn is_done(&self) -> bool {
        self.remaining.is_zero()
    }

    /// Consumes up to `dt`. Returns the overshoot once the delay has elapsed,
    /// so chained phases can carry leftover time forward.
    pub fn tick(&mut self, dt: Duration) -> Option<Duration> {
        if dt < self.remaining {
            self.remaining -= dt;
            return None;
        }
        let overshoot = dt - self.remaining;
        self.remaining = Duration::ZERO;
        Some(overshoot)
    }
}

/// A repeating timer. The first fire happens one full period after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    period: Duration,
    elapsed: Duration,
}

impl Interval {
    /// A zero period is bumped to one millisecond so `tick` always terminates.
    pub fn new(period: Duration) -> Self {
        Self {
            period: period.max(Duration::from_millis(1)),
            elapsed: Duration::ZERO,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn until_next(&self) -> Duration {
        self.period - self.elapsed
    }

    /// Returns how many periods completed during `dt`.
    pub fn tick(&mut self, dt: Duration) -> u32 {
        self.elapsed = self.elapsed.saturating_add(dt);
        let mut fires = 0u32;
        while self.elapsed >= self.period {
            self.elapsed -= self.period;
            fires = fires.saturating_add(1);
        }
        fires
    }
}
