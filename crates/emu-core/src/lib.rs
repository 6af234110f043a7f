//! Contracts between the frame pacer and the machines it drives.
//!
//! The pacer never looks inside a machine. It asks for one frame at a time,
//! decays the host indicators the machine arms, performs deferred snapshot
//! work at frame boundaries and measures throughput against the machine's
//! native clock.

mod clock;
mod error;
mod indicator;
mod machine;
mod observable;
mod ticks;

pub use clock::MasterClock;
pub use error::{EmulationFault, SnapshotError};
pub use indicator::{Indicator, Indicators};
pub use machine::{InputEvent, Machine};
pub use observable::{Observable, Value};
pub use ticks::Ticks;
