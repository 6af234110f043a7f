//! Emulation speed presets.
//!
//! The table is fixed at compile time and ordered by increasing speed. Each
//! entry maps a percentage of native speed to the wall-clock interval
//! between frames at a 50 Hz base rate.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::PaceError;

/// Index of the 100% preset, used whenever a selection is out of range.
pub const DEFAULT_PRESET: usize = 4;

/// A named speed configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeedPreset {
    /// Menu label, e.g. `"100%"`.
    pub name: &'static str,
    /// Percentage of native speed.
    pub percent: u32,
    /// Wall-clock time per emulated frame.
    pub interval: Duration,
    /// Advisory ceiling on consecutive video frames the renderer may drop.
    pub max_frame_skip: u32,
}

impl SpeedPreset {
    const fn new(name: &'static str, percent: u32, max_frame_skip: u32) -> Self {
        // 20 ms per frame at 100%.
        Self {
            name,
            percent,
            interval: Duration::from_nanos(2_000_000_000 / percent as u64),
            max_frame_skip,
        }
    }

    /// Age beyond which a tick is too stale to execute.
    #[must_use]
    pub fn time_limit(&self) -> Duration {
        self.interval * 2
    }
}

/// Every selectable preset, slowest first.
pub const PRESETS: [SpeedPreset; 10] = [
    SpeedPreset::new("10%", 10, 1),
    SpeedPreset::new("25%", 25, 1),
    SpeedPreset::new("50%", 50, 1),
    SpeedPreset::new("75%", 75, 1),
    SpeedPreset::new("100%", 100, 2),
    SpeedPreset::new("150%", 150, 2),
    SpeedPreset::new("200%", 200, 2),
    SpeedPreset::new("300%", 300, 3),
    SpeedPreset::new("400%", 400, 4),
    SpeedPreset::new("500%", 500, 5),
];

/// Look up a preset by index.
pub fn preset(index: usize) -> Result<&'static SpeedPreset, PaceError> {
    PRESETS.get(index).ok_or(PaceError::SpeedOutOfRange {
        index,
        count: PRESETS.len(),
    })
}

/// Look up a preset, substituting the 100% preset when `index` is out of
/// range. Returns the index actually used.
pub fn resolve(index: usize) -> (usize, &'static SpeedPreset) {
    match preset(index) {
        Ok(p) => (index, p),
        Err(err) => {
            tracing::warn!("{err}, defaulting to {}", PRESETS[DEFAULT_PRESET].name);
            (DEFAULT_PRESET, &PRESETS[DEFAULT_PRESET])
        }
    }
}

/// The user's speed choice.
///
/// A tagged value rather than a bare index, so "paused" and "full speed"
/// can never be mistaken for a preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeedSelection {
    /// Run paced by the timer at `PRESETS[index]`.
    Preset(usize),
    /// Stopped until another speed is chosen.
    Paused,
    /// Unpaced: the loop re-ticks itself after every frame.
    Full,
}

impl Default for SpeedSelection {
    fn default() -> Self {
        Self::Preset(DEFAULT_PRESET)
    }
}

impl fmt::Display for SpeedSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Preset(index) => match PRESETS.get(*index) {
                Some(p) => f.write_str(p.name),
                None => write!(f, "#{index}"),
            },
            Self::Paused => f.write_str("Paused"),
            Self::Full => f.write_str("Full-speed"),
        }
    }
}

impl FromStr for SpeedSelection {
    type Err = PaceError;

    /// Accepts a preset number (range-checked later, by `set_speed`),
    /// `paused` or `full`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "paused" | "pause" => Ok(Self::Paused),
            "full" | "full-speed" => Ok(Self::Full),
            other => other
                .parse::<usize>()
                .map(Self::Preset)
                .map_err(|_| PaceError::InvalidSpeed(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_ordered_by_speed() {
        for pair in PRESETS.windows(2) {
            assert!(pair[0].interval > pair[1].interval);
            assert!(pair[0].percent < pair[1].percent);
        }
        assert!(PRESETS.iter().all(|p| p.max_frame_skip >= 1));
    }

    #[test]
    fn normal_speed_preset() {
        let p = preset(4).unwrap();
        assert_eq!(p.name, "100%");
        assert_eq!(p.interval, Duration::from_millis(20));
        assert_eq!(p.time_limit(), Duration::from_millis(40));
        assert_eq!(p.max_frame_skip, 2);
    }

    #[test]
    fn slowest_and_fastest() {
        assert_eq!(preset(0).unwrap().interval, Duration::from_millis(200));
        assert_eq!(preset(9).unwrap().interval, Duration::from_millis(4));
    }

    #[test]
    fn out_of_range_is_an_error() {
        assert_eq!(
            preset(10),
            Err(PaceError::SpeedOutOfRange {
                index: 10,
                count: 10
            })
        );
    }

    #[test]
    fn resolve_substitutes_default_not_neighbour() {
        let (index, p) = resolve(10);
        assert_eq!(index, DEFAULT_PRESET);
        assert_eq!(p.name, "100%");

        let (index, _) = resolve(usize::MAX);
        assert_eq!(index, DEFAULT_PRESET);
    }

    #[test]
    fn parse_selection() {
        assert_eq!("3".parse::<SpeedSelection>(), Ok(SpeedSelection::Preset(3)));
        assert_eq!("42".parse::<SpeedSelection>(), Ok(SpeedSelection::Preset(42)));
        assert_eq!("Full".parse::<SpeedSelection>(), Ok(SpeedSelection::Full));
        assert_eq!("paused".parse::<SpeedSelection>(), Ok(SpeedSelection::Paused));
        assert!(matches!(
            "fast".parse::<SpeedSelection>(),
            Err(PaceError::InvalidSpeed(_))
        ));
    }

    #[test]
    fn selection_labels() {
        assert_eq!(SpeedSelection::Preset(9).to_string(), "500%");
        assert_eq!(SpeedSelection::Preset(12).to_string(), "#12");
        assert_eq!(SpeedSelection::Full.to_string(), "Full-speed");
    }
}
