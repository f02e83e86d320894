//! Recursive layout construction
//!
//! The engine builds a coordinate map for the visible subset of the family
//! graph, rooted at the current root person:
//!
//! 1. Each node lays out its neighbour sub-trees with a bounded recursion
//!    that terminates as soon as it reaches back to the predecessor.
//! 2. Disjoint sub-layouts sharing a boundary node are merged by computing,
//!    per shared generation row, the minimal horizontal shift that separates
//!    their intervals, and applying the maximum across rows. Merges under a
//!    person may instead overlay unshifted when nothing collides, letting an
//!    in-law union tuck underneath.
//! 3. The finished grid is normalized (bottom-left to the origin plus one
//!    unit of margin), rows are scaled to pixel y-coordinates, and union
//!    nodes are re-centered vertically between their parents and children.
//!
//! The recursion reads an immutable snapshot (graph, visible set, metrics);
//! recomputing with the same inputs yields coordinate-identical results.

use crate::graph::{FamilyGraph, VisibleSet};
use crate::parser::ast::{is_person, is_union, union_members};

use super::config::LayoutConfig;
use super::error::LayoutError;
use super::geometry::{collides, grid_bounds, row_ranges};
use super::metrics::NodeMetrics;
use super::types::{GridLayout, GridPoint, Point, TreeLayout};

/// Everything a layout computation reads; nothing in it is mutated.
pub struct LayoutContext<'a> {
    pub graph: &'a FamilyGraph,
    pub visible: &'a VisibleSet,
    pub metrics: &'a dyn NodeMetrics,
    pub config: &'a LayoutConfig,
}

impl<'a> LayoutContext<'a> {
    pub fn new(
        graph: &'a FamilyGraph,
        visible: &'a VisibleSet,
        metrics: &'a dyn NodeMetrics,
        config: &'a LayoutConfig,
    ) -> Self {
        Self {
            graph,
            visible,
            metrics,
            config,
        }
    }

    /// Horizontal clearance radius: padded half-width for persons, zero for
    /// unions (they occupy a single point).
    fn x_radius(&self, name: &str) -> f64 {
        if is_union(name) {
            0.0
        } else {
            self.config.padding + self.metrics.half_width(name)
        }
    }

    fn is_visible(&self, name: &str) -> bool {
        self.visible.contains(name)
    }
}

/// Compute the finalized layout for the visible set around `root`.
pub fn compute(root: &str, ctx: &LayoutContext) -> Result<TreeLayout, LayoutError> {
    if !ctx.graph.contains(root) {
        return Err(LayoutError::unknown_root(root));
    }
    let mut grid = node_layout(root, None, ctx)?;

    let bounds = grid_bounds(&grid, |n| ctx.x_radius(n))
        .ok_or_else(|| LayoutError::internal("layout of the visible set is empty"))?;
    // Bottom-left corner to the origin, then one unit of margin on both axes.
    grid.shift(-bounds.min_x + 1.0, -bounds.min_row + 1);

    let mut tree = TreeLayout::new();
    for (name, point) in grid.iter() {
        tree.insert(
            name,
            Point::new(point.x, point.row as f64 * ctx.config.line_height),
        );
    }
    adjust_unions(&mut tree, ctx)?;
    Ok(tree)
}

/// Lay out the sub-tree reachable from `name` without crossing back over
/// `pred`. The returned layout places `name` at the origin and includes
/// `pred` (when present) at a fixed relative offset.
fn node_layout(
    name: &str,
    pred: Option<&str>,
    ctx: &LayoutContext,
) -> Result<GridLayout, LayoutError> {
    if is_person(name) {
        person_layout(name, pred, ctx)
    } else {
        union_layout(name, pred, ctx)
    }
}

fn person_layout(
    name: &str,
    pred: Option<&str>,
    ctx: &LayoutContext,
) -> Result<GridLayout, LayoutError> {
    let radius = ctx.x_radius(name);

    // A neighbouring union's sub-layout, in this person's frame. Recursion
    // stops at the predecessor with a fixed two-entry layout.
    let sub = |union: Option<&str>,
               person_at: GridPoint,
               dx: f64|
     -> Result<Option<GridLayout>, LayoutError> {
        let Some(union) = union.filter(|u| ctx.is_visible(u)) else {
            return Ok(None);
        };
        let mut layout = if Some(union) == pred {
            GridLayout::pair(union, GridPoint::ORIGIN, name, person_at)
        } else {
            node_layout(union, Some(name), ctx)?
        };
        layout.shift(dx, 0);
        Ok(Some(layout))
    };

    let above_layout = sub(ctx.graph.above_union(name), GridPoint::new(0.0, 1), 0.0)?;
    let left_layout = sub(
        ctx.graph.left_union(name),
        GridPoint::new(radius, 0),
        -radius,
    )?;
    let right_layout = sub(
        ctx.graph.right_union(name),
        GridPoint::new(-radius, 0),
        radius,
    )?;

    let mut result = match above_layout {
        Some(mut above) => {
            // The parents' layout becomes the main layout, re-anchored so
            // this person sits at the origin one row below its union.
            let anchor = *above.get(name).ok_or_else(|| {
                LayoutError::internal(format!("'{name}' missing from its parents' layout"))
            })?;
            above.shift(-anchor.x, -anchor.row);
            above
        }
        None => GridLayout::singleton(name, GridPoint::ORIGIN),
    };

    if let Some(mut left) = left_layout {
        left.remove(name);
        result = merged(left, result, false, true, ctx)?;
    }
    if let Some(mut right) = right_layout {
        right.remove(name);
        result = merged(result, right, true, true, ctx)?;
    }
    Ok(result)
}

fn union_layout(
    name: &str,
    pred: Option<&str>,
    ctx: &LayoutContext,
) -> Result<GridLayout, LayoutError> {
    let Some((left_parent, right_parent)) = union_members(name) else {
        return Err(LayoutError::internal(format!("'{name}' is not a union")));
    };

    // Both partners and every visible child go through the same bounded
    // recursion; `union_at` is where this union sits in the member's frame.
    let member_sub = |person: &str, union_at: GridPoint| -> Result<GridLayout, LayoutError> {
        if Some(person) == pred {
            Ok(GridLayout::pair(person, GridPoint::ORIGIN, name, union_at))
        } else {
            node_layout(person, Some(name), ctx)
        }
    };

    let left_layout = member_sub(left_parent, GridPoint::new(ctx.x_radius(left_parent), 0))?;
    let right_layout = member_sub(right_parent, GridPoint::new(-ctx.x_radius(right_parent), 0))?;

    let children: Vec<&str> = ctx
        .graph
        .children(name)
        .into_iter()
        .filter(|child| ctx.is_visible(child))
        .collect();

    let mut result = if children.is_empty() {
        GridLayout::singleton(name, GridPoint::ORIGIN)
    } else {
        let mut layouts = Vec::with_capacity(children.len());
        for child in &children {
            let mut layout = member_sub(child, GridPoint::new(0.0, -1))?;
            layout.remove(name);
            layouts.push(layout);
        }
        let mut iter = layouts.into_iter();
        let mut group = iter
            .next()
            .ok_or_else(|| LayoutError::internal("empty child group"))?;
        for layout in iter {
            group = merged(group, layout, true, false, ctx)?;
        }
        // Centre the sibling row under the union, one row down.
        let mut min_x = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        for child in &children {
            let point = group.get(child).ok_or_else(|| {
                LayoutError::internal(format!("child '{child}' missing from its group"))
            })?;
            min_x = min_x.min(point.x);
            max_x = max_x.max(point.x);
        }
        group.shift(-(min_x + max_x) / 2.0, 1);
        group.insert(name, GridPoint::ORIGIN);
        group
    };

    let mut left = left_layout;
    left.remove(name);
    result = merged(left, result, false, false, ctx)?;

    let mut right = right_layout;
    right.remove(name);
    result = merged(result, right, true, false, ctx)?;

    Ok(result)
}

/// Combine two disjoint sub-layouts that share a boundary node.
///
/// With `try_under`, an unshifted overlay is kept when no intervals collide.
/// Otherwise the minimal per-shared-row separation shift is computed, its
/// maximum applied to the right layout (or, negated, to the left one), and
/// the maps are unioned. The shift may be negative, pulling the layouts
/// together.
fn merged(
    mut left: GridLayout,
    mut right: GridLayout,
    move_right: bool,
    try_under: bool,
    ctx: &LayoutContext,
) -> Result<GridLayout, LayoutError> {
    if try_under && !collides(&left, &right, |n| ctx.x_radius(n)) {
        left.absorb(right);
        return Ok(left);
    }

    let left_rows = row_ranges(&left, |n| ctx.x_radius(n));
    let right_rows = row_ranges(&right, |n| ctx.x_radius(n));
    let mut shift: Option<f64> = None;
    for (row, range) in &left_rows {
        if let Some(other) = right_rows.get(row) {
            let delta = range.max - other.min;
            shift = Some(match shift {
                Some(s) => s.max(delta),
                None => delta,
            });
        }
    }
    let Some(shift) = shift else {
        return Err(LayoutError::internal(
            "merge of layouts sharing no generation row",
        ));
    };

    if move_right {
        right.shift(shift, 0);
    } else {
        left.shift(-shift, 0);
    }
    left.absorb(right);
    Ok(left)
}

/// Re-center every union with rendered children vertically: halfway between
/// the deepest parent bottom edge and the shallowest child top edge.
fn adjust_unions(tree: &mut TreeLayout, ctx: &LayoutContext) -> Result<(), LayoutError> {
    let unions: Vec<String> = tree
        .names()
        .filter(|name| is_union(name))
        .map(str::to_string)
        .collect();
    for union in unions {
        let rendered: Vec<&str> = ctx
            .graph
            .children(&union)
            .into_iter()
            .filter(|child| tree.contains(child))
            .collect();
        if rendered.is_empty() {
            continue;
        }
        let Some((p1, p2)) = union_members(&union) else {
            continue;
        };

        let mut parent_bottom = f64::NEG_INFINITY;
        for parent in [p1, p2] {
            if let Some(point) = tree.get(parent) {
                parent_bottom = parent_bottom.max(point.y + ctx.metrics.half_height(parent));
            }
        }
        let mut child_top = f64::INFINITY;
        for child in &rendered {
            if let Some(point) = tree.get(child) {
                child_top = child_top.min(point.y - ctx.metrics.half_height(child));
            }
        }

        if child_top < parent_bottom {
            return Err(LayoutError::vertical_clearance(&union));
        }
        tree.set_y(&union, (parent_bottom + child_top) / 2.0);
    }
    Ok(())
}
