//! Real-time frame pacing for emulator run loops.
//!
//! Decides, frame by frame, when the emulated machine runs: at one of ten
//! preset speeds paced by a periodic timer, paused, or unbounded
//! (fast-forward), while staying responsive to menu, hotkey and focus
//! events.
//!
//! - [`speed`]: the preset table.
//! - [`controller`]: speed selection, pause and the full-speed state machine.
//! - [`driver`]: runs one frame per admitted tick and skips stale ones.
//! - [`dispatch`]: the single-threaded event loop tying it together.
//!
//! With the `native` feature, [`native`] runs the loop in a winit window.

pub mod clock;
pub mod config;
pub mod controller;
pub mod dispatch;
pub mod driver;
mod error;
pub mod event;
pub mod host;
#[cfg(feature = "native")]
pub mod native;
pub mod quicksave;
pub mod speed;
pub mod throughput;
pub mod timer;

pub use clock::{FakeHostClock, HostClock, StdHostClock};
pub use config::{Cli, PaceConfig};
pub use controller::{FullSpeedPhase, PaceController, PaceState};
pub use dispatch::Dispatcher;
pub use driver::{FrameDriver, TickOutcome};
pub use error::PaceError;
pub use event::{Event, EventSource, Hotkey, MenuCommand};
pub use host::Host;
pub use quicksave::{Hud, QuickSlots};
pub use speed::{PRESETS, SpeedPreset, SpeedSelection};
pub use throughput::{Throughput, ThroughputSample};
pub use timer::{Tick, TickSource};
