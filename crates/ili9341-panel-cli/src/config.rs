//! Configuration management.

use anyhow::{Context, Result};
use ili9341_panel_hw::{Orientation, Rgb565};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Main configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Panel configuration
    #[serde(default)]
    pub panel: PanelConfig,

    /// Screenshot output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

/// Driver setup applied before anything is drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelConfig {
    /// Orientation applied during init (portrait, landscape, portrait-inverted,
    /// landscape-inverted)
    #[serde(default)]
    pub orientation: Orientation,

    /// Reject off-panel geometry instead of clipping it
    #[serde(default)]
    pub strict: bool,

    /// Actually sleep through the init settle delays
    #[serde(default = "default_settle_delays")]
    pub settle_delays: bool,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            orientation: Orientation::default(),
            strict: false,
            settle_delays: default_settle_delays(),
        }
    }
}

/// Screenshot output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// PNG path used when no --output is given
    #[serde(default = "default_output_path")]
    pub path: PathBuf,

    /// Color the screen is cleared to before drawing
    #[serde(default = "default_background")]
    pub background: Rgb565,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            background: default_background(),
        }
    }
}

fn default_settle_delays() -> bool {
    true
}

fn default_output_path() -> PathBuf {
    PathBuf::from("screenshot.png")
}

fn default_background() -> Rgb565 {
    Rgb565::BLACK
}

impl Config {
    /// Loads configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content =
            std::fs::read_to_string(path.as_ref()).context("Failed to read configuration file")?;
        let config: Config = toml::from_str(&content).context("Failed to parse configuration")?;
        debug!("Loaded configuration from {}", path.as_ref().display());
        Ok(config)
    }

    /// Loads `path` if given, otherwise returns the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}
