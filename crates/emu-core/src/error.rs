use std::path::PathBuf;

/// A failure reported by a machine while executing a frame.
///
/// The pacer logs these and keeps running; the frame still counts as
/// executed so pacing never drifts from wall-clock time.
#[derive(Debug, thiserror::Error)]
pub enum EmulationFault {
    #[error("CPU jammed on opcode {opcode:#04X} at {pc:#06X}")]
    CpuJam { pc: u16, opcode: u8 },

    #[error("device fault: {0}")]
    Device(String),
}

/// Failure of a state snapshot request or deferred save/load.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("snapshot not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("snapshot format error: {0}")]
    Format(String),

    #[error("machine does not support snapshots")]
    Unsupported,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
