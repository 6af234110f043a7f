//! Machine abstraction for the frame pacer.
//!
//! This module defines the `Machine` trait: everything the pacer needs from
//! an emulated system, and nothing more. CPU execution, video, audio and
//! file formats stay behind it.

use std::path::Path;

use crate::{EmulationFault, Indicator, Indicators, MasterClock, SnapshotError};

/// Raw input forwarded from the host to the machine.
///
/// The pacer does not decode input; it only routes it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Host key press or release, by platform scancode.
    Key { scancode: u32, pressed: bool },
    /// Relative mouse motion.
    MouseMotion { dx: f64, dy: f64 },
    MouseButton { button: u8, pressed: bool },
    /// Analogue stick position in -1.0..=1.0.
    JoystickAxis { stick: u8, axis: u8, value: f32 },
    JoystickButton { button: u8, pressed: bool },
}

/// An emulated machine driven frame-by-frame by the pacer.
pub trait Machine {
    /// Native clock, used to express throughput as a share of real hardware.
    fn clock(&self) -> MasterClock;

    /// Execute one frame of emulation.
    ///
    /// The machine may arm indicator countdowns; the pacer decays them after
    /// the frame.
    fn run_frame(&mut self, indicators: &mut Indicators) -> Result<(), EmulationFault>;

    /// Handle host input.
    fn input(&mut self, event: InputEvent);

    /// Hard reset (power cycle).
    fn reset(&mut self);

    /// Soft reset, as from a BREAK key. Defaults to a hard reset.
    fn soft_reset(&mut self) {
        self.reset();
    }

    /// The host window lost focus; release anything held down.
    fn focus_lost(&mut self) {}

    /// An indicator countdown reached zero.
    fn indicator_expired(&mut self, _indicator: Indicator) {}

    /// Queue a snapshot save to `path`, performed at the next frame boundary.
    fn request_save(&mut self, _path: &Path) -> Result<(), SnapshotError> {
        Err(SnapshotError::Unsupported)
    }

    /// Queue a snapshot load from `path`, performed at the next frame boundary.
    ///
    /// Fails with [`SnapshotError::NotFound`] when there is nothing to load.
    fn request_load(&mut self, _path: &Path) -> Result<(), SnapshotError> {
        Err(SnapshotError::Unsupported)
    }

    fn deferred_load_pending(&self) -> bool {
        false
    }

    fn perform_load(&mut self) -> Result<(), SnapshotError> {
        Ok(())
    }

    fn deferred_save_pending(&self) -> bool {
        false
    }

    fn perform_save(&mut self) -> Result<(), SnapshotError> {
        Ok(())
    }
}
