//! Time source for entity and event timestamps.

use chrono::{DateTime, Duration, Utc};
use std::cell::Cell;

/// Provides the current instant to the store.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Deterministic clock that advances by a fixed step on every read.
///
/// Used by tests and scripted sessions that need reproducible timestamps.
#[derive(Debug, Clone)]
pub struct ManualClock {
    next: Cell<DateTime<Utc>>,
    step: Duration,
}

impl ManualClock {
    pub fn starting_at(start: DateTime<Utc>) -> Self {
        Self::with_step(start, Duration::milliseconds(1))
    }

    pub fn with_step(start: DateTime<Utc>, step: Duration) -> Self {
        Self {
            next: Cell::new(start),
            step,
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        let current = self.next.get();
        self.next.set(current + self.step);
        current
    }
}

#[cfg(test)]
mod tests {
    use super::{Clock, ManualClock};
    use chrono::{TimeZone, Utc};

    #[test]
    fn manual_clock_is_strictly_increasing() {
        let clock = ManualClock::starting_at(Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap());
        let first = clock.now();
        let second = clock.now();
        assert!(second > first);
        assert_eq!((second - first).num_milliseconds(), 1);
    }
}
