//! Host time sources.
//!
//! All pacing decisions use host time as a [`Duration`] since an arbitrary
//! epoch. Production code reads a monotonic [`Instant`]; tests drive a
//! [`FakeHostClock`] by hand.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// A monotonic host clock.
pub trait HostClock {
    /// Time since the clock's epoch.
    fn now(&self) -> Duration;
}

/// Host clock backed by [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct StdHostClock {
    epoch: Instant,
}

impl StdHostClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }

    /// Convert a host time back to an [`Instant`], e.g. for a
    /// `WaitUntil` deadline.
    #[must_use]
    pub fn instant_at(&self, at: Duration) -> Instant {
        self.epoch + at
    }
}

impl Default for StdHostClock {
    fn default() -> Self {
        Self::new()
    }
}

impl HostClock for StdHostClock {
    fn now(&self) -> Duration {
        self.epoch.elapsed()
    }
}

/// Manually advanced clock for deterministic tests.
///
/// Clones share the same time, so a test can keep a handle while the
/// dispatcher owns another.
#[derive(Debug, Clone, Default)]
pub struct FakeHostClock {
    now: Rc<Cell<Duration>>,
}

impl FakeHostClock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, now: Duration) {
        self.now.set(now);
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl HostClock for FakeHostClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fake_clock_clones_share_time() {
        let clock = FakeHostClock::new();
        let handle = clock.clone();
        handle.advance(Duration::from_millis(15));
        assert_eq!(clock.now(), Duration::from_millis(15));
        clock.set(Duration::from_secs(2));
        assert_eq!(handle.now(), Duration::from_secs(2));
    }

    #[test]
    fn std_clock_is_monotonic() {
        let clock = StdHostClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
        assert_eq!(clock.instant_at(Duration::ZERO), clock.epoch);
    }
}
