//! Configuration for SVG rendering

use std::path::PathBuf;

/// Configuration options for SVG output
#[derive(Debug, Clone)]
pub struct SvgConfig {
    /// Padding around the viewBox
    pub viewbox_padding: f64,

    /// Whether to include the XML declaration
    pub standalone: bool,

    /// Whether to format output with indentation
    pub pretty_print: bool,

    /// Prefix for CSS class names (e.g., "fam-" for "fam-person")
    pub class_prefix: Option<String>,

    /// Directory photo paths are resolved against; `None` disables photo
    /// embedding entirely
    pub photo_dir: Option<PathBuf>,
}

impl Default for SvgConfig {
    fn default() -> Self {
        Self {
            viewbox_padding: 40.0,
            standalone: true,
            pretty_print: true,
            class_prefix: Some("fam-".to_string()),
            photo_dir: None,
        }
    }
}

impl SvgConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the viewBox padding
    pub fn with_viewbox_padding(mut self, padding: f64) -> Self {
        self.viewbox_padding = padding;
        self
    }

    /// Set the directory photos are loaded from
    pub fn with_photo_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.photo_dir = Some(dir.into());
        self
    }

    /// Enable or disable pretty printing
    pub fn with_pretty_print(mut self, pretty: bool) -> Self {
        self.pretty_print = pretty;
        self
    }
}
