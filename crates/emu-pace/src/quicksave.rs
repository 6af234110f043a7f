//! Quick-save slots and the on-screen message that confirms them.

use std::path::{Path, PathBuf};

/// Number of quick-save slots.
pub const SLOT_COUNT: u8 = 10;

/// File extension of snapshot files.
pub const SNAPSHOT_EXTENSION: &str = "snp";

const DEFAULT_PREFIX: &str = "QuickSave";

/// The selected quick-save slot and how slot files are named.
///
/// Slot files are named after the disc image in use, so each game keeps its
/// own set: `states/Elite_3.snp`.
#[derive(Debug, Clone)]
pub struct QuickSlots {
    dir: PathBuf,
    prefix: String,
    slot: u8,
}

impl QuickSlots {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            prefix: DEFAULT_PREFIX.to_string(),
            slot: 0,
        }
    }

    /// Name slot files after `image` (its file stem), or the generic
    /// prefix when no disc is loaded.
    pub fn set_disc_image(&mut self, image: Option<&Path>) {
        self.prefix = image
            .and_then(Path::file_stem)
            .map_or_else(|| DEFAULT_PREFIX.to_string(), |s| s.to_string_lossy().into_owned());
    }

    #[must_use]
    pub fn slot(&self) -> u8 {
        self.slot
    }

    /// Select the previous slot, stopping at 0.
    pub fn prev_slot(&mut self) -> u8 {
        self.slot = self.slot.saturating_sub(1);
        self.slot
    }

    /// Select the next slot, stopping at the last one.
    pub fn next_slot(&mut self) -> u8 {
        self.slot = (self.slot + 1).min(SLOT_COUNT - 1);
        self.slot
    }

    /// File name of the current slot, e.g. `Elite_3.snp`.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{}_{}.{SNAPSHOT_EXTENSION}", self.prefix, self.slot)
    }

    /// Full path of the current slot's snapshot.
    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.dir.join(self.file_name())
    }
}

/// Fully opaque HUD alpha.
pub const HUD_OPAQUE: u8 = 255;

/// A transient on-screen message that fades out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hud {
    message: String,
    alpha: u8,
}

impl Hud {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            alpha: HUD_OPAQUE,
        }
    }

    pub fn saved(file_name: &str) -> Self {
        Self::new(format!("Saved State: {file_name}"))
    }

    pub fn loaded(file_name: &str) -> Self {
        Self::new(format!("Loaded State: {file_name}"))
    }

    pub fn not_found(file_name: &str) -> Self {
        Self::new(format!("State not found: {file_name}"))
    }

    pub fn failed(file_name: &str) -> Self {
        Self::new(format!("State error: {file_name}"))
    }

    pub fn slot(slot: u8) -> Self {
        Self::new(format!("Set QuickSave slot: {slot}"))
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn alpha(&self) -> u8 {
        self.alpha
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.alpha > 0
    }

    /// Fade by `step`; the renderer calls this once per drawn frame.
    pub fn fade(&mut self, step: u8) {
        self.alpha = self.alpha.saturating_sub(step);
    }
}
