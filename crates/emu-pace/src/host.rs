//! Display-side collaborator.

use crate::quicksave::Hud;

/// The host window and settings the pacer reports to and reads from.
///
/// Everything here is one-way notification or a cheap query; none of it
/// may block the run loop.
pub trait Host {
    /// New throughput figure, e.g. for the title bar.
    fn publish_throughput(&mut self, mhz: f64, percent: f64);

    /// Emulation has been paused for `reason` ("menu active", "auto-paused").
    fn show_pause(&mut self, _reason: &str) {}

    /// Show or refresh the on-screen quick-save message.
    fn show_hud(&mut self, _hud: &Hud) {}

    /// The display was resized.
    fn resize(&mut self, _width: u32, _height: u32) {}

    /// Frame-skip ceiling for the renderer changed.
    fn set_frame_skip(&mut self, _max: u32) {}

    fn is_debugger_attached(&self) -> bool {
        false
    }

    fn is_autopause_enabled(&self) -> bool;

    fn set_autopause(&mut self, enabled: bool);
}
