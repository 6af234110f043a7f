//! Native clock of an emulated machine.

use std::time::Duration;

use crate::Ticks;

/// Native CPU clock and frame rate of an emulated machine.
///
/// The pacer turns "frames executed" into cycles per second with this, and
/// reports throughput as a percentage of the real hardware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MasterClock {
    /// CPU clock in Hz (e.g., `2_000_000` for the BBC Micro's 6502).
    pub frequency_hz: u64,
    /// Video frames per second on the real machine.
    pub frames_per_second: u64,
}

impl MasterClock {
    /// 2 MHz 6502 with a 50 Hz PAL display.
    pub const BBC_MICRO: Self = Self::new(2_000_000, 50);

    #[must_use]
    pub const fn new(frequency_hz: u64, frames_per_second: u64) -> Self {
        Self {
            frequency_hz,
            frames_per_second,
        }
    }

    /// CPU cycles in one emulated frame (integer division).
    #[must_use]
    pub const fn ticks_per_frame(&self) -> Ticks {
        Ticks::new(self.frequency_hz / self.frames_per_second)
    }

    /// Wall-clock length of one frame when running at 100%.
    #[must_use]
    pub const fn frame_duration(&self) -> Duration {
        Duration::from_nanos(1_000_000_000 / self.frames_per_second)
    }

    /// Clock frequency in MHz.
    #[must_use]
    pub fn mhz(&self) -> f64 {
        self.frequency_hz as f64 / 1_000_000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bbc_frame_budget() {
        let clock = MasterClock::BBC_MICRO;
        assert_eq!(clock.ticks_per_frame(), Ticks::new(40_000));
        assert_eq!(clock.frame_duration(), Duration::from_millis(20));
        assert!((clock.mhz() - 2.0).abs() < f64::EPSILON);
    }
}
