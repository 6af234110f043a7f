/// Errors raised by pacing configuration.
///
/// None of these are fatal: the controller recovers from every one of them
/// by falling back to the default speed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaceError {
    #[error("speed #{index} out of range (table has {count} presets)")]
    SpeedOutOfRange { index: usize, count: usize },

    #[error("invalid speed '{0}': expected a preset number, 'paused' or 'full'")]
    InvalidSpeed(String),
}
