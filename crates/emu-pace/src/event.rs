//! Events consumed by the dispatcher.

use std::time::Duration;

use emu_core::InputEvent;

use crate::speed::SpeedSelection;
use crate::timer::Tick;

/// Everything that can wake the run loop.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A pacing tick, from the timer or from full-speed self-pacing.
    Tick(Tick),
    /// Raw input destined for the machine.
    Input(InputEvent),
    Hotkey(Hotkey),
    Menu(MenuCommand),
    /// The display lost focus at host time `at`.
    FocusLost { at: Duration },
    /// The display gained focus at host time `at`.
    FocusGained { at: Duration },
    Resize { width: u32, height: u32 },
    /// The user asked to close the display.
    Close,
}

/// Keys the pacer handles itself instead of forwarding to the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hotkey {
    /// Toggle a user pause.
    Pause,
    /// Fast-forward pressed. `via_modifier` marks a held modifier rather
    /// than a dedicated key.
    FastForward { via_modifier: bool },
    /// Fast-forward released.
    FastForwardReleased { via_modifier: bool },
    /// Soft reset.
    Break,
    QuickSave,
    QuickLoad,
    SlotPrev,
    SlotNext,
}

/// Commands from the host menu. Each is applied with emulation paused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuCommand {
    SetSpeed(SpeedSelection),
    ToggleAutopause,
    QuickSave,
    QuickLoad,
    SlotPrev,
    SlotNext,
    /// Hard reset.
    Restart,
    Quit,
}

/// A blocking queue of host events.
///
/// The dispatcher polls until the queue is dry, then waits for the next
/// event or until `deadline` (host time), whichever comes first.
pub trait EventSource {
    /// Next queued event, without blocking.
    fn poll_event(&mut self) -> Option<Event>;

    /// Block until an event arrives or `deadline` passes. `None` means wait
    /// indefinitely. Returns `None` on timeout or a spurious wake-up; a
    /// source that is shutting down delivers [`Event::Close`].
    fn wait_event(&mut self, deadline: Option<Duration>) -> Option<Event>;
}
