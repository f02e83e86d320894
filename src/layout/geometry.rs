//! Geometry helpers shared by the layout engine
//!
//! All helpers work on construction-time layouts, where y is still a
//! discrete generation row. Horizontal extents come from a radius function:
//! padded half-width for persons, zero for unions.

use std::collections::BTreeMap;

use super::types::GridLayout;

/// Occupied horizontal interval of one generation row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowRange {
    pub min: f64,
    pub max: f64,
}

/// For each generation row of `layout`, the interval spanned by its nodes.
pub fn row_ranges<R>(layout: &GridLayout, radius: R) -> BTreeMap<i32, RowRange>
where
    R: Fn(&str) -> f64,
{
    let mut result: BTreeMap<i32, RowRange> = BTreeMap::new();
    for (name, point) in layout.iter() {
        let r = radius(name);
        result
            .entry(point.row)
            .and_modify(|range| {
                range.min = range.min.min(point.x - r);
                range.max = range.max.max(point.x + r);
            })
            .or_insert(RowRange {
                min: point.x - r,
                max: point.x + r,
            });
    }
    result
}

/// True if overlaying the two layouts unshifted would overlap any two node
/// intervals on a shared row.
pub fn collides<R>(left: &GridLayout, right: &GridLayout, radius: R) -> bool
where
    R: Fn(&str) -> f64,
{
    let mut rows: BTreeMap<i32, Vec<(f64, f64)>> = BTreeMap::new();
    for (name, point) in left.iter().chain(right.iter()) {
        let r = radius(name);
        rows.entry(point.row)
            .or_default()
            .push((point.x - r, point.x + r));
    }
    for intervals in rows.values_mut() {
        intervals.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)));
        for pair in intervals.windows(2) {
            if pair[0].1 > pair[1].0 {
                return true;
            }
        }
    }
    false
}

/// Extent of a construction-time layout, x-edges radius-inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridBounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_row: i32,
    pub max_row: i32,
}

/// Bounding extent of `layout`, or `None` if it is empty.
pub fn grid_bounds<R>(layout: &GridLayout, radius: R) -> Option<GridBounds>
where
    R: Fn(&str) -> f64,
{
    let mut bounds: Option<GridBounds> = None;
    for (name, point) in layout.iter() {
        let r = radius(name);
        let b = bounds.get_or_insert(GridBounds {
            min_x: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            min_row: point.row,
            max_row: point.row,
        });
        b.min_x = b.min_x.min(point.x - r);
        b.max_x = b.max_x.max(point.x + r);
        b.min_row = b.min_row.min(point.row);
        b.max_row = b.max_row.max(point.row);
    }
    bounds
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::types::GridPoint;

    fn unit_radius(_: &str) -> f64 {
        1.0
    }

    #[test]
    fn test_row_ranges_span_all_nodes() {
        let mut layout = GridLayout::new();
        layout.insert("a", GridPoint::new(0.0, 0));
        layout.insert("b", GridPoint::new(5.0, 0));
        layout.insert("c", GridPoint::new(-3.0, 1));
        let ranges = row_ranges(&layout, unit_radius);
        assert_eq!(ranges[&0], RowRange { min: -1.0, max: 6.0 });
        assert_eq!(ranges[&1], RowRange { min: -4.0, max: -2.0 });
    }

    #[test]
    fn test_collides_on_shared_row() {
        let left = GridLayout::singleton("a", GridPoint::new(0.0, 0));
        let touching = GridLayout::singleton("b", GridPoint::new(2.0, 0));
        let overlapping = GridLayout::singleton("b", GridPoint::new(1.5, 0));
        let elsewhere = GridLayout::singleton("b", GridPoint::new(0.0, 1));
        // Touching intervals do not collide; strict overlap does.
        assert!(!collides(&left, &touching, unit_radius));
        assert!(collides(&left, &overlapping, unit_radius));
        assert!(!collides(&left, &elsewhere, unit_radius));
    }

    #[test]
    fn test_zero_width_point_inside_interval_collides() {
        let person = GridLayout::singleton("a", GridPoint::new(0.0, 0));
        let union = GridLayout::singleton("u + v", GridPoint::new(0.5, 0));
        assert!(collides(&person, &union, |name| {
            if name.contains(" + ") {
                0.0
            } else {
                1.0
            }
        }));
    }

    #[test]
    fn test_grid_bounds() {
        let mut layout = GridLayout::new();
        layout.insert("a", GridPoint::new(0.0, 0));
        layout.insert("b", GridPoint::new(4.0, 2));
        let bounds = grid_bounds(&layout, unit_radius).unwrap();
        assert_eq!(bounds.min_x, -1.0);
        assert_eq!(bounds.max_x, 5.0);
        assert_eq!(bounds.min_row, 0);
        assert_eq!(bounds.max_row, 2);
        assert!(grid_bounds(&GridLayout::new(), unit_radius).is_none());
    }
}
