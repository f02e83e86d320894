//! Size oracle for rendered person boxes
//!
//! The layout engine never measures anything itself: it asks a
//! [`NodeMetrics`] for each person's half-extents. Renderers with real
//! measurements implement the trait; before measurements exist, the
//! fallback implementations keep the first layout usable.

use crate::parser::ast::{display_name, Document};

/// Intrinsic half-extents of a person's rendered box.
///
/// Unions have no box; the engine never asks about them.
pub trait NodeMetrics {
    /// Half the rendered width of the person's box.
    fn half_width(&self, name: &str) -> f64;
    /// Half the rendered height of the person's box.
    fn half_height(&self, name: &str) -> f64;
}

/// Constant-size fallback, used until real measurements are available.
#[derive(Debug, Clone, Copy)]
pub struct FixedMetrics {
    pub half_width: f64,
    pub half_height: f64,
}

impl Default for FixedMetrics {
    fn default() -> Self {
        Self {
            half_width: 40.0,
            half_height: 24.0,
        }
    }
}

impl NodeMetrics for FixedMetrics {
    fn half_width(&self, _name: &str) -> f64 {
        self.half_width
    }

    fn half_height(&self, _name: &str) -> f64 {
        self.half_height
    }
}

/// Deterministic estimate from entry content.
///
/// Mirrors how boxes are rendered: the display name wraps at spaces onto one
/// line per word, the lifespan adds a line per declared year, a photo adds a
/// fixed block.
#[derive(Debug, Clone)]
pub struct TextMetrics<'a> {
    doc: &'a Document,
    /// Estimated advance per character.
    pub char_width: f64,
    /// Height of one text line.
    pub text_line: f64,
    /// Height reserved for an embedded photo.
    pub photo_height: f64,
    /// Lower bound on a box's half-width.
    pub min_half_width: f64,
}

impl<'a> TextMetrics<'a> {
    pub fn new(doc: &'a Document) -> Self {
        Self {
            doc,
            char_width: 7.5,
            text_line: 16.0,
            photo_height: 90.0,
            min_half_width: 24.0,
        }
    }
}

impl NodeMetrics for TextMetrics<'_> {
    fn half_width(&self, name: &str) -> f64 {
        let longest = display_name(name)
            .split_whitespace()
            .map(|word| word.chars().count())
            .max()
            .unwrap_or(1);
        let text_half = longest as f64 * self.char_width / 2.0;
        let photo_half = match self.doc.get(name).and_then(|e| e.photo()) {
            Some(_) => 35.0,
            None => 0.0,
        };
        text_half.max(photo_half).max(self.min_half_width)
    }

    fn half_height(&self, name: &str) -> f64 {
        let name_lines = display_name(name).split_whitespace().count().max(1);
        let mut height = name_lines as f64 * self.text_line;
        if let Some(entry) = self.doc.get(name) {
            if let Some((birth, death)) = entry.lifespan() {
                let year_lines = birth.is_some() as usize + death.is_some() as usize;
                height += year_lines as f64 * self.text_line;
            }
            if entry.photo().is_some() {
                height += self.photo_height;
            }
        }
        height / 2.0
    }
}
