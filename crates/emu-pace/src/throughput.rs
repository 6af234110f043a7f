//! Measured emulation throughput.
//!
//! Cycles executed are sampled over a short wall-clock window. The
//! percentage of native speed is smoothed with an exponential moving
//! average so the title bar doesn't flicker, except while the average is
//! still near zero, where the raw figure is taken as-is.

use std::time::Duration;

use emu_core::{MasterClock, Ticks};

/// Minimum wall-clock time between samples.
pub const SAMPLE_WINDOW: Duration = Duration::from_millis(100);

/// Weight given to each new sample.
const SMOOTHING: f64 = 0.25;

/// Below this the smoothed figure has no baseline yet.
const BOOTSTRAP_FLOOR: f64 = 0.01;

/// One published throughput figure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThroughputSample {
    /// Instantaneous emulated clock rate.
    pub mhz: f64,
    /// Smoothed percentage of native speed.
    pub percent: f64,
}

#[derive(Debug, Clone)]
pub struct Throughput {
    cycles: Ticks,
    last_sample: Duration,
    smoothed_percent: f64,
    latest: Option<ThroughputSample>,
}

impl Throughput {
    #[must_use]
    pub fn new(now: Duration) -> Self {
        Self {
            cycles: Ticks::ZERO,
            last_sample: now,
            smoothed_percent: 0.0,
            latest: None,
        }
    }

    /// Account for one executed frame. Returns a new sample once at least
    /// [`SAMPLE_WINDOW`] has passed since the previous one.
    pub fn record_frame(&mut self, clock: MasterClock, now: Duration) -> Option<ThroughputSample> {
        self.cycles += clock.ticks_per_frame();

        let elapsed = now.saturating_sub(self.last_sample);
        if elapsed < SAMPLE_WINDOW {
            return None;
        }

        let rate = self.cycles.per_second(elapsed);
        let instant_percent = 100.0 * rate / clock.frequency_hz as f64;
        self.smoothed_percent = if self.smoothed_percent < BOOTSTRAP_FLOOR {
            instant_percent
        } else {
            self.smoothed_percent * (1.0 - SMOOTHING) + instant_percent * SMOOTHING
        };

        let sample = ThroughputSample {
            mhz: rate / 1_000_000.0,
            percent: self.smoothed_percent,
        };
        self.cycles = Ticks::ZERO;
        self.last_sample = now;
        self.latest = Some(sample);
        Some(sample)
    }

    /// Most recently published sample.
    #[must_use]
    pub fn latest(&self) -> Option<ThroughputSample> {
        self.latest
    }
}
