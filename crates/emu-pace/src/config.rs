//! Startup configuration and command-line parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::speed::SpeedSelection;

/// Frames the boot key is held after a disc is given on the command line.
pub const AUTOBOOT_FRAMES: u32 = 150;

/// Settings the dispatcher is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaceConfig {
    pub speed: SpeedSelection,
    /// Pause when the display loses focus.
    pub autopause: bool,
    /// Hold the boot key for [`AUTOBOOT_FRAMES`] frames at startup.
    pub autoboot: bool,
    /// Override for the preset's frame-skip ceiling.
    pub frame_skip: Option<u32>,
    /// Directory quick-save snapshots are written to.
    pub states_dir: PathBuf,
    /// Disc image named on the command line; names the quick-save files.
    pub disc_image: Option<PathBuf>,
}

impl Default for PaceConfig {
    fn default() -> Self {
        Self {
            speed: SpeedSelection::default(),
            autopause: false,
            autoboot: false,
            frame_skip: None,
            states_dir: PathBuf::from("."),
            disc_image: None,
        }
    }
}

/// Real-time frame pacer.
#[derive(Parser, Debug)]
#[command(name = "emu-pace", version, about, long_about = None)]
pub struct Cli {
    /// Speed preset index (0 = 10% .. 9 = 500%), `paused` or `full`
    #[arg(short, long, default_value = "4")]
    pub speed: SpeedSelection,

    /// Pause when the window loses focus
    #[arg(long)]
    pub autopause: bool,

    /// Hold the boot key at startup
    #[arg(long)]
    pub autoboot: bool,

    /// Maximum consecutive frames the renderer may skip (1-9)
    #[arg(long)]
    pub frame_skip: Option<u32>,

    /// Directory for quick-save snapshots
    #[arg(long, default_value = ".")]
    pub states_dir: PathBuf,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    pub verbose: bool,

    /// Disc image to boot; implies --autoboot
    pub disc: Option<PathBuf>,
}

impl Cli {
    #[must_use]
    pub fn into_config(self) -> PaceConfig {
        PaceConfig {
            speed: self.speed,
            autopause: self.autopause,
            autoboot: self.autoboot || self.disc.is_some(),
            frame_skip: self.frame_skip,
            states_dir: self.states_dir,
            disc_image: self.disc,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> PaceConfig {
        let mut argv = vec!["emu-pace"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap().into_config()
    }

    #[test]
    fn defaults() {
        assert_eq!(parse(&[]), PaceConfig::default());
    }

    #[test]
    fn speed_forms() {
        assert_eq!(parse(&["--speed", "7"]).speed, SpeedSelection::Preset(7));
        assert_eq!(parse(&["-s", "full"]).speed, SpeedSelection::Full);
        assert_eq!(parse(&["--speed", "paused"]).speed, SpeedSelection::Paused);
        assert!(Cli::try_parse_from(["emu-pace", "--speed", "fast"]).is_err());
    }

    #[test]
    fn disc_implies_autoboot() {
        let config = parse(&["--frame-skip", "3", "games/elite.ssd"]);
        assert!(config.autoboot);
        assert_eq!(config.frame_skip, Some(3));
        assert_eq!(config.disc_image, Some(PathBuf::from("games/elite.ssd")));
    }
}
