//! Command line arguments.

use std::path::PathBuf;

use clap::Parser;
use starfall_config::{Config, ConfigError};

/// Shooting stars across your terminal.
#[derive(Debug, Parser)]
#[command(name = "starfall")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file to read instead of the default location
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Seed the random source for a repeatable sky
    #[arg(long)]
    pub seed: Option<u64>,

    /// Target frames per second
    #[arg(long)]
    pub fps: Option<u32>,

    /// Number of background stars
    #[arg(long)]
    pub stars: Option<usize>,

    /// Keep the terminal's own background instead of the violet gradient
    #[arg(long)]
    pub no_backdrop: bool,

    /// Write logs to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Save the effective configuration and exit
    #[arg(long)]
    pub write_config: bool,
}

impl Cli {
    /// Config file location, explicit or default.
    pub fn config_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.config {
            Some(path) => Ok(path.clone()),
            None => Config::default_path(),
        }
    }

    /// Apply command line overrides on top of `config`.
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(fps) = self.fps {
            config.display.frame_rate = fps;
        }
        if let Some(stars) = self.stars {
            config.animation.star_count = stars;
        }
        if self.no_backdrop {
            config.display.backdrop = false;
        }
        config.sanitized()
    }
}
