//! Frame-counted host indicators.
//!
//! Machines arm these when something visible should linger for a while
//! (a drive LED, the disc head sound, the boot key being held). The pacer
//! decays every armed countdown by exactly one per executed frame, so
//! pacing jitter never shortens them.

/// A host-side indicator with a frame countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Indicator {
    /// Boot key held down after a disc is inserted on the command line.
    Autoboot,
    /// Disc drive head load; the head is lowered when this expires.
    DiscHead,
    /// Cassette motor LED; switched off on expiry if the motor has stopped.
    TapeMotorLed,
    /// Generic keyboard/drive LED refresh.
    Leds,
}

impl Indicator {
    pub const ALL: [Self; 4] = [
        Self::Autoboot,
        Self::DiscHead,
        Self::TapeMotorLed,
        Self::Leds,
    ];

    const fn slot(self) -> usize {
        match self {
            Self::Autoboot => 0,
            Self::DiscHead => 1,
            Self::TapeMotorLed => 2,
            Self::Leds => 3,
        }
    }
}

/// Countdown bank for every [`Indicator`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Indicators {
    remaining: [u32; 4],
}

impl Indicators {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) a countdown of `frames` frames. Zero disarms.
    pub fn arm(&mut self, indicator: Indicator, frames: u32) {
        self.remaining[indicator.slot()] = frames;
    }

    pub fn disarm(&mut self, indicator: Indicator) {
        self.arm(indicator, 0);
    }

    #[must_use]
    pub fn remaining(&self, indicator: Indicator) -> u32 {
        self.remaining[indicator.slot()]
    }

    #[must_use]
    pub fn is_active(&self, indicator: Indicator) -> bool {
        self.remaining(indicator) > 0
    }

    /// Decrement every armed countdown by one frame.
    ///
    /// Returns the indicators that reached zero on this call.
    pub fn tick(&mut self) -> Vec<Indicator> {
        let mut expired = Vec::new();
        for indicator in Indicator::ALL {
            let count = &mut self.remaining[indicator.slot()];
            if *count > 0 {
                *count -= 1;
                if *count == 0 {
                    expired.push(indicator);
                }
            }
        }
        expired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn countdown_expires_once() {
        let mut ind = Indicators::new();
        ind.arm(Indicator::DiscHead, 2);

        assert!(ind.tick().is_empty());
        assert_eq!(ind.remaining(Indicator::DiscHead), 1);
        assert_eq!(ind.tick(), vec![Indicator::DiscHead]);
        assert!(!ind.is_active(Indicator::DiscHead));
        // Disarmed countdowns stay silent.
        assert!(ind.tick().is_empty());
    }

    #[test]
    fn independent_countdowns() {
        let mut ind = Indicators::new();
        ind.arm(Indicator::Autoboot, 3);
        ind.arm(Indicator::Leds, 1);

        assert_eq!(ind.tick(), vec![Indicator::Leds]);
        assert_eq!(ind.remaining(Indicator::Autoboot), 2);

        ind.disarm(Indicator::Autoboot);
        assert!(ind.tick().is_empty());
    }
}
