//! stemma - a genealogical tree layout engine
//!
//! This library parses a small line-oriented family description into a
//! bipartite person/union graph, validates that the graph is a single tree,
//! selects the subset visible around a chosen root, computes a
//! collision-free layout, and renders the result as an SVG (or hands an
//! abstract [`Scene`] to any other renderer).
//!
//! # Example
//!
//! ```rust
//! use stemma::render;
//!
//! let svg = render("Abe + Mona\n c: Homer\n", "Homer").unwrap();
//! assert!(svg.contains("<svg"));
//! assert!(svg.contains("Homer"));
//! ```

pub mod error;
pub mod graph;
pub mod layout;
pub mod parser;
pub mod renderer;
pub mod settings;
pub mod viewstate;

pub use error::ParseError;
pub use graph::{Filter, Relation, TreeError, VisibleSet};
pub use layout::{LayoutConfig, LayoutError, TreeLayout};
pub use parser::{parse, Document};
pub use renderer::{Scene, SvgConfig};
pub use settings::Settings;
pub use viewstate::ViewState;

use thiserror::Error;

use graph::{validate, visible_set, FamilyGraph};
use layout::{compute, LayoutContext, NodeMetrics, TextMetrics};
use renderer::{build_scene, render_svg};

/// Errors that can occur in the load/draw pipeline
#[derive(Debug, Error)]
pub enum RenderError {
    /// The description text is malformed
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// The description parsed but is not a single family tree
    #[error("structure error: {0}")]
    Tree(#[from] TreeError),

    /// The tree cannot be laid out as requested
    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),
}

/// A parsed and validated family, immutable once loaded.
///
/// Every redraw (root change, filter change, resource completion) recomputes
/// layout and scene from this snapshot; nothing here is ever mutated.
#[derive(Debug, Clone)]
pub struct Family {
    pub doc: Document,
    pub graph: FamilyGraph,
}

impl Family {
    /// The root to use when the caller names none: the first declared
    /// person, or failing that the first person in the graph.
    pub fn default_root(&self) -> Option<&str> {
        self.doc.first_person().or_else(|| self.graph.persons().next())
    }
}

/// Parse and validate a family description.
pub fn load(source: &str) -> Result<Family, RenderError> {
    let doc = parse(source)?;
    let graph = FamilyGraph::build(&doc);
    validate(&graph)?;
    Ok(Family { doc, graph })
}

/// Compute layout and scene for one view of a loaded family.
pub fn draw(
    family: &Family,
    root: &str,
    filter: Filter,
    config: &LayoutConfig,
    metrics: &dyn NodeMetrics,
) -> Result<(TreeLayout, Scene), RenderError> {
    if !family.graph.contains(root) {
        return Err(LayoutError::unknown_root(root).into());
    }
    let visible = visible_set(&family.graph, root, filter);
    let ctx = LayoutContext::new(&family.graph, &visible, metrics, config);
    let layout = compute(root, &ctx)?;
    let scene = build_scene(&family.graph, &layout, root, metrics, config.padding);
    Ok((layout, scene))
}

/// Configuration for the complete render pipeline
#[derive(Debug, Clone, Default)]
pub struct RenderConfig {
    /// Layout configuration
    pub layout: LayoutConfig,
    /// SVG output configuration
    pub svg: SvgConfig,
    /// Which relatives of the root to show
    pub filter: Filter,
    /// Debug mode: dump the computed layout to stderr
    pub debug: bool,
}

impl RenderConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the layout configuration
    pub fn with_layout(mut self, config: LayoutConfig) -> Self {
        self.layout = config;
        self
    }

    /// Set the SVG configuration
    pub fn with_svg(mut self, config: SvgConfig) -> Self {
        self.svg = config;
        self
    }

    /// Set the detail filter
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }

    /// Enable or disable debug mode
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

/// Render a family description to SVG with default configuration.
///
/// # Example
///
/// ```rust
/// use stemma::render;
///
/// let svg = render("A + B\n c: C, D\n", "A").unwrap();
/// assert!(svg.contains("<svg"));
/// assert!(svg.contains(">C<"));
/// ```
pub fn render(source: &str, root: &str) -> Result<String, RenderError> {
    render_with_config(source, root, RenderConfig::default())
}

/// Render a family description to SVG with custom configuration.
pub fn render_with_config(
    source: &str,
    root: &str,
    config: RenderConfig,
) -> Result<String, RenderError> {
    let family = load(source)?;
    let metrics = TextMetrics::new(&family.doc);
    let (layout, scene) = draw(&family, root, config.filter, &config.layout, &metrics)?;

    if config.debug {
        eprintln!("=== Layout Debug ===");
        for (name, point) in layout.iter() {
            eprintln!("[{}] x={:.1} y={:.1}", name, point.x, point.y);
        }
        eprintln!("====================");
    }

    Ok(render_svg(
        &scene,
        &family.doc,
        &family.graph,
        &metrics,
        &config.svg,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const FAMILY: &str = "\
Abe + Mona
 c: Homer
Homer + Marge
 c: Bart, Lisa, Maggie
";

    #[test]
    fn test_render_simple_family() {
        let svg = render(FAMILY, "Homer").unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("</svg>"));
        assert!(svg.contains(">Bart<"));
        assert!(svg.contains(">Abe<"));
    }

    #[test]
    fn test_render_unknown_root_error() {
        let result = render(FAMILY, "Ned");
        assert!(matches!(
            result,
            Err(RenderError::Layout(LayoutError::UnknownRoot { .. }))
        ));
    }

    #[test]
    fn test_render_parse_error() {
        let result = render("A + B + C\n", "A");
        assert!(matches!(result, Err(RenderError::Parse(_))));
    }

    #[test]
    fn test_render_structure_error() {
        let result = render("A + B\nC + D\n", "A");
        assert!(matches!(result, Err(RenderError::Tree(_))));
    }

    #[test]
    fn test_depth_filter_hides_relatives() {
        let config = RenderConfig::new().with_filter(Filter::depth(0));
        let svg = render_with_config(FAMILY, "Homer", config).unwrap();
        assert!(svg.contains(">Marge<"));
        assert!(!svg.contains(">Maggie<"));
    }

    #[test]
    fn test_default_root_is_first_person() {
        let family = load(FAMILY).unwrap();
        assert_eq!(family.default_root(), Some("Homer"));
    }

    #[test]
    fn test_draw_is_idempotent() {
        let family = load(FAMILY).unwrap();
        let metrics = TextMetrics::new(&family.doc);
        let config = LayoutConfig::default();
        let first = draw(&family, "Homer", Filter::blood(), &config, &metrics).unwrap();
        let second = draw(&family, "Homer", Filter::blood(), &config, &metrics).unwrap();
        assert_eq!(first.0, second.0);
        assert_eq!(first.1, second.1);
    }
}
