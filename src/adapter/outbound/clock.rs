//! Clock adapters.

use chrono::Utc;

use crate::domain::Timestamp;
use crate::port::Clock;

/// Wall clock in Unix seconds.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        // Pre-epoch readings clamp to zero.
        Utc::now().timestamp().max(0).unsigned_abs()
    }
}

/// A clock pinned to one reading, for replays and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub Timestamp);

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_is_after_2020() {
        assert!(SystemClock.now() > 1_577_836_800);
    }

    #[test]
    fn fixed_clock_returns_its_reading() {
        assert_eq!(FixedClock(42).now(), 42);
    }
}
