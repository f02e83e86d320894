//! Layout engine for positioning family tree nodes
//!
//! Takes the validated graph plus the visible set and computes a
//! collision-free layout: persons and unions on discrete generation rows,
//! no overlapping horizontal intervals within a row.

pub mod config;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod metrics;
pub mod types;

pub use config::LayoutConfig;
pub use engine::{compute, LayoutContext};
pub use error::LayoutError;
pub use metrics::{FixedMetrics, NodeMetrics, TextMetrics};
pub use types::{BoundingBox, GridLayout, GridPoint, Point, TreeLayout};
