//! Frame pacer demo binary.
//!
//! Paces a stand-in machine that only counts frames, so speed presets,
//! fast-forward, pausing and quick-save slots can be exercised from a real
//! window. Throughput shows in the title bar.

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use emu_core::{EmulationFault, Indicators, InputEvent, Machine, MasterClock, SnapshotError};
use emu_pace::{Cli, native};
use tracing_subscriber::EnvFilter;

/// A machine whose whole state is its frame counter.
#[derive(Default)]
struct FrameCounter {
    frames: u64,
    pending_save: Option<PathBuf>,
    pending_load: Option<PathBuf>,
}

impl Machine for FrameCounter {
    fn clock(&self) -> MasterClock {
        MasterClock::BBC_MICRO
    }

    fn run_frame(&mut self, _indicators: &mut Indicators) -> Result<(), EmulationFault> {
        self.frames += 1;
        Ok(())
    }

    fn input(&mut self, event: InputEvent) {
        tracing::trace!("input {event:?}");
    }

    fn reset(&mut self) {
        tracing::info!("reset after {} frames", self.frames);
        self.frames = 0;
    }

    fn request_save(&mut self, path: &Path) -> Result<(), SnapshotError> {
        self.pending_save = Some(path.to_path_buf());
        Ok(())
    }

    fn request_load(&mut self, path: &Path) -> Result<(), SnapshotError> {
        if !path.exists() {
            return Err(SnapshotError::NotFound(path.to_path_buf()));
        }
        self.pending_load = Some(path.to_path_buf());
        Ok(())
    }

    fn deferred_load_pending(&self) -> bool {
        self.pending_load.is_some()
    }

    fn perform_load(&mut self) -> Result<(), SnapshotError> {
        let Some(path) = self.pending_load.take() else {
            return Ok(());
        };
        let text = fs::read_to_string(&path)?;
        self.frames = text
            .trim()
            .parse()
            .map_err(|e| SnapshotError::Format(format!("{}: {e}", path.display())))?;
        Ok(())
    }

    fn deferred_save_pending(&self) -> bool {
        self.pending_save.is_some()
    }

    fn perform_save(&mut self) -> Result<(), SnapshotError> {
        let Some(path) = self.pending_save.take() else {
            return Ok(());
        };
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(&path, self.frames.to_string())?;
        Ok(())
    }
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = cli.into_config();
    if let Err(e) = native::run(&config, FrameCounter::default(), "emu-pace") {
        tracing::error!("{e}");
        process::exit(1);
    }
}
