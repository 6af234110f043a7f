//! Counts of emulated CPU cycles.

use std::time::Duration;

/// A count of emulated CPU cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Ticks(pub u64);

impl Ticks {
    pub const ZERO: Self = Self(0);

    #[must_use]
    pub const fn new(count: u64) -> Self {
        Self(count)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Cycles per second if these ticks took `elapsed` of wall-clock time.
    ///
    /// Returns 0.0 for a zero-length interval.
    #[must_use]
    pub fn per_second(self, elapsed: Duration) -> f64 {
        let secs = elapsed.as_secs_f64();
        if secs > 0.0 {
            self.0 as f64 / secs
        } else {
            0.0
        }
    }
}

impl core::ops::Add for Ticks {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl core::ops::AddAssign for Ticks {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl core::ops::Mul<u64> for Ticks {
    type Output = Self;

    fn mul(self, rhs: u64) -> Self {
        Self(self.0.saturating_mul(rhs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_over_interval() {
        let cycles = Ticks::new(40_000) * 5;
        assert_eq!(cycles.get(), 200_000);
        let rate = cycles.per_second(Duration::from_millis(100));
        assert!((rate - 2_000_000.0).abs() < 1e-6);
    }

    #[test]
    fn zero_interval_has_no_rate() {
        assert!(Ticks::new(10).per_second(Duration::ZERO).abs() < f64::EPSILON);
    }
}
