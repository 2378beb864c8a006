use chrono::{DateTime, Duration, Utc};
use std::cell::Cell;

/// Source of "now" for block creation.
///
/// Injected into `Chain` so tests can supply deterministic timestamps and
/// assert on hashes without wall-clock flakiness.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time. The default clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Deterministic clock: starts at a fixed instant and advances by a fixed
/// step on every reading.
#[derive(Debug)]
pub struct ManualClock {
    current: Cell<DateTime<Utc>>,
    step: Duration,
}

impl ManualClock {
    /// Clock starting at `start`, stepping one second per reading.
    pub fn starting_at(start: DateTime<Utc>) -> Self {
        Self::with_step(start, Duration::seconds(1))
    }

    pub fn with_step(start: DateTime<Utc>, step: Duration) -> Self {
        Self {
            current: Cell::new(start),
            step,
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        let t = self.current.get();
        self.current.set(t + self.step);
        t
    }
}
