//! Command-line argument parsing.

use clap::Parser;

use crate::params::RecordingConfig;

/// Grid subdivision bounds; powers of two tessellate most predictably.
const MAX_SUBDIVISIONS: u32 = 1024;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "wavescape")]
#[command(about = "Animated procedural ocean surface", long_about = None)]
pub struct Args {
    /// Run without a window: print parameter defaults, the camera orbit, and
    /// wave elevation bounds, then exit
    #[arg(long)]
    pub headless: bool,

    /// Capture frames to PNG (duration in seconds)
    #[arg(long, value_name = "SECONDS")]
    pub record: Option<f32>,

    /// Grid subdivisions per side (power of two recommended)
    #[arg(long, value_name = "COUNT", default_value_t = 512)]
    pub subdivisions: u32,

    /// Start with the debug panel hidden (press H to toggle)
    #[arg(long)]
    pub no_panel: bool,
}

impl Args {
    /// Subdivision count clamped to the supported range.
    pub fn effective_subdivisions(&self) -> u32 {
        let clamped = self.subdivisions.clamp(1, MAX_SUBDIVISIONS);
        if clamped != self.subdivisions {
            eprintln!(
                "Warning: subdivisions {} out of range, using {}",
                self.subdivisions, clamped
            );
        }
        clamped
    }

    /// Create recording configuration if recording mode is enabled
    pub fn create_recording_config(&self) -> anyhow::Result<Option<RecordingConfig>> {
        self.record
            .map(|duration| {
                let config = RecordingConfig::new(duration);
                std::fs::create_dir_all(config.frames_dir())
                    .map_err(anyhow::Error::from)
                    .map(|_| config)
            })
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subdivisions_are_clamped() {
        let mut args = Args::parse_from(["wavescape"]);
        assert_eq!(args.effective_subdivisions(), 512);

        args.subdivisions = 0;
        assert_eq!(args.effective_subdivisions(), 1);

        args.subdivisions = 4096;
        assert_eq!(args.effective_subdivisions(), MAX_SUBDIVISIONS);
    }

    #[test]
    fn no_recording_by_default() {
        let args = Args::parse_from(["wavescape"]);
        assert!(args.create_recording_config().unwrap().is_none());
        assert!(!args.headless);
        assert!(!args.no_panel);
    }
}
