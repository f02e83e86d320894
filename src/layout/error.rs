//! Error types for the layout engine

use thiserror::Error;

/// Errors that can occur during layout computation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// The requested root is not part of the dataset
    #[error("root '{name}' not found in the family data")]
    UnknownRoot { name: String },

    /// A union's children row would overlap its parents' boxes
    #[error("union '{union}' overlaps its children vertically; try increasing the line height")]
    VerticalClearance { union: String },

    /// A defect in the engine itself, not in the input
    #[error("internal layout error: {reason}")]
    Internal { reason: String },
}

impl LayoutError {
    /// Create an unknown-root error
    pub fn unknown_root(name: impl Into<String>) -> Self {
        Self::UnknownRoot { name: name.into() }
    }

    /// Create a vertical clearance error
    pub fn vertical_clearance(union: impl Into<String>) -> Self {
        Self::VerticalClearance {
            union: union.into(),
        }
    }

    /// Create an internal error
    pub fn internal(reason: impl Into<String>) -> Self {
        Self::Internal {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_root_display() {
        let err = LayoutError::unknown_root("Nobody");
        assert!(err.to_string().contains("Nobody"));
    }

    #[test]
    fn test_vertical_clearance_is_actionable() {
        let err = LayoutError::vertical_clearance("A + B");
        assert!(err.to_string().contains("line height"));
    }
}
