//! Rendering: abstract scene commands and the SVG backend

pub mod config;
pub mod resources;
pub mod scene;
pub mod svg;

pub use config::SvgConfig;
pub use resources::ResourceTracker;
pub use scene::{build_scene, Connection, Placement, Scene};
pub use svg::{render_svg, render_svg_with_tracker};
