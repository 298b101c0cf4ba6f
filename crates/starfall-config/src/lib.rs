//! Configuration file handling for starfall.
//!
//! The configuration lives at `<config dir>/starfall/config.toml`. A missing
//! file is not an error; every field falls back to its default.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use starfall_core::AnimationSettings;
use thiserror::Error;

/// File name inside the configuration directory.
const CONFIG_FILE: &str = "config.toml";

/// Errors raised while reading or writing the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access config file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config file")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize config")]
    Serialize(#[from] toml::ser::Error),
    #[error("could not determine a configuration directory")]
    NoConfigDir,
}

/// How the animation is presented in the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// Target frames per second.
    pub frame_rate: u32,
    /// Width of one terminal cell in virtual pixels.
    pub cell_width_px: u16,
    /// Height of one terminal cell in virtual pixels.
    pub cell_height_px: u16,
    /// Opacity of the whole animation layer.
    pub opacity: f32,
    /// Paint the violet page gradient behind the stars.
    pub backdrop: bool,
    /// Show the key hint on the bottom row.
    pub show_help: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            frame_rate: 60,
            cell_width_px: 8,
            cell_height_px: 16,
            opacity: 0.9,
            backdrop: true,
            show_help: true,
        }
    }
}

impl DisplaySettings {
    /// Time between frames at the target frame rate.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs(1) / self.frame_rate.max(1)
    }

    fn sanitized(self) -> Self {
        Self {
            frame_rate: self.frame_rate.max(1),
            cell_width_px: self.cell_width_px.max(1),
            cell_height_px: self.cell_height_px.max(1),
            opacity: if self.opacity.is_nan() {
                1.0
            } else {
                self.opacity.clamp(0.0, 1.0)
            },
            ..self
        }
    }
}

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub animation: AnimationSettings,
    pub display: DisplaySettings,
}

impl Config {
    /// Default location of the configuration file.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        ProjectDirs::from("", "", "starfall")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Load from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::default_path()?)
    }

    /// Load from `path`, falling back to defaults when the file is missing.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(contents) => Self::from_toml(&contents),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Parse TOML text. Out-of-range values are corrected.
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(contents)?;
        Ok(config.sanitized())
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Write to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        fs::write(path, self.to_toml()?).map_err(io_err)
    }

    /// Copy with zero rates and sizes raised to one and opacity clamped.
    pub fn sanitized(self) -> Self {
        Self {
            animation: self.animation.sanitized(),
            display: self.display.sanitized(),
        }
    }
}
