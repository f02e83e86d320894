//! User-tunable rendering settings
//!
//! Settings travel in an explicit value; nothing reads ambient globals. A
//! TOML file can override any field:
//!
//! ```toml
//! line_height = 280.0
//! padding = 8.0
//! photo_dir = "photos"
//! default_root = "Leopold"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::layout::LayoutConfig;
use crate::renderer::SvgConfig;

/// Errors that can occur when loading a settings file
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Rendering settings, with sensible defaults for every field
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Vertical distance between generation rows, in pixels
    pub line_height: f64,
    /// Horizontal clearance around each person's box
    pub padding: f64,
    /// Directory photo paths are resolved against
    pub photo_dir: PathBuf,
    /// Root to use when the caller names none
    pub default_root: Option<String>,
}

/// TOML structure for deserializing settings; every field optional
#[derive(Deserialize)]
struct TomlSettings {
    line_height: Option<f64>,
    padding: Option<f64>,
    photo_dir: Option<PathBuf>,
    default_root: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            line_height: 220.0,
            padding: 8.0,
            photo_dir: PathBuf::from("photos"),
            default_root: None,
        }
    }
}

impl Settings {
    /// Load settings from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        Self::from_toml(&fs::read_to_string(path)?)
    }

    /// Parse settings from TOML text, defaulting absent fields
    pub fn from_toml(text: &str) -> Result<Self, SettingsError> {
        let parsed: TomlSettings = toml::from_str(text)?;
        let defaults = Settings::default();
        Ok(Settings {
            line_height: parsed.line_height.unwrap_or(defaults.line_height),
            padding: parsed.padding.unwrap_or(defaults.padding),
            photo_dir: parsed.photo_dir.unwrap_or(defaults.photo_dir),
            default_root: parsed.default_root,
        })
    }

    /// The layout configuration these settings describe
    pub fn layout_config(&self) -> LayoutConfig {
        LayoutConfig::new()
            .with_line_height(self.line_height)
            .with_padding(self.padding)
    }

    /// The SVG configuration these settings describe
    pub fn svg_config(&self) -> SvgConfig {
        SvgConfig::new().with_photo_dir(self.photo_dir.clone())
    }
}
