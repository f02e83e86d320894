//! Configuration for the layout engine

/// Configuration options for layout computation
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    /// Vertical distance between generation rows, in pixels.
    pub line_height: f64,

    /// Horizontal clearance added around each person's box.
    pub padding: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            line_height: 220.0,
            padding: 8.0,
        }
    }
}

impl LayoutConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the vertical distance between generation rows
    pub fn with_line_height(mut self, line_height: f64) -> Self {
        self.line_height = line_height;
        self
    }

    /// Set the horizontal clearance around person boxes
    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LayoutConfig::default();
        assert_eq!(config.line_height, 220.0);
        assert_eq!(config.padding, 8.0);
    }

    #[test]
    fn test_builder_pattern() {
        let config = LayoutConfig::new().with_line_height(280.0).with_padding(4.0);
        assert_eq!(config.line_height, 280.0);
        assert_eq!(config.padding, 4.0);
    }
}
