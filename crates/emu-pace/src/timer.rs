//! Periodic frame timer and the ticks it produces.

use std::time::Duration;

/// Where a tick came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickSource {
    /// The periodic timer.
    Timer,
    /// Emitted by the pacer itself while running at full speed.
    Internal,
}

/// One scheduling event: run one frame of emulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    /// Host time at which the tick was due (timer) or emitted (internal).
    pub timestamp: Duration,
    pub source: TickSource,
}

impl Tick {
    #[must_use]
    pub const fn timer(timestamp: Duration) -> Self {
        Self {
            timestamp,
            source: TickSource::Timer,
        }
    }

    #[must_use]
    pub const fn internal(timestamp: Duration) -> Self {
        Self {
            timestamp,
            source: TickSource::Internal,
        }
    }
}

/// A periodic timer polled against host time.
///
/// Like a hardware timer it keeps its own schedule and stamps each tick
/// with the time it was due, so the frame driver can see how late it is.
/// A short lag is delivered period by period. A backlog of two periods or
/// more collapses into one tick stamped with the oldest due time, and the
/// schedule jumps to the first boundary after `now`.
#[derive(Debug, Clone)]
pub struct PeriodicTimer {
    interval: Duration,
    next_due: Option<Duration>,
}

impl PeriodicTimer {
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
        }
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Change the period. Takes effect after the next due tick.
    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    /// Arm the timer; the first tick is due one interval from `now`.
    /// Does nothing if already armed.
    pub fn start(&mut self, now: Duration) {
        if self.next_due.is_none() {
            self.next_due = Some(now + self.interval);
        }
    }

    pub fn stop(&mut self) {
        self.next_due = None;
    }

    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.next_due.is_some()
    }

    /// When the next tick is due, if armed.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.next_due
    }

    /// Take the next due tick, if any. Call repeatedly to drain a backlog.
    pub fn poll(&mut self, now: Duration) -> Option<Tick> {
        let due = self.next_due?;
        if now < due {
            return None;
        }

        let late = now - due;
        let periods = if late >= self.interval * 2 {
            let missed = late.as_nanos() / self.interval.as_nanos().max(1);
            u32::try_from(missed + 1).unwrap_or(u32::MAX)
        } else {
            1
        };
        self.next_due = Some(due + self.interval.saturating_mul(periods));
        Some(Tick::timer(due))
    }
}
