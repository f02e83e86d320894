//! Core types for the layout engine

use indexmap::IndexMap;

/// A position during layout construction: continuous x, discrete generation
/// row. Rows become pixel y-coordinates only at finalization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridPoint {
    pub x: f64,
    pub row: i32,
}

impl GridPoint {
    pub const ORIGIN: GridPoint = GridPoint { x: 0.0, row: 0 };

    pub fn new(x: f64, row: i32) -> Self {
        Self { x, row }
    }
}

/// A coordinate map under construction, insertion-ordered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridLayout {
    points: IndexMap<String, GridPoint>,
}

impl GridLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// A layout holding a single node.
    pub fn singleton(name: &str, point: GridPoint) -> Self {
        let mut layout = Self::new();
        layout.insert(name, point);
        layout
    }

    /// A layout holding two nodes at fixed relative positions; the terminal
    /// case of the bounded recursion.
    pub fn pair(a: &str, at_a: GridPoint, b: &str, at_b: GridPoint) -> Self {
        let mut layout = Self::new();
        layout.insert(a, at_a);
        layout.insert(b, at_b);
        layout
    }

    pub fn insert(&mut self, name: &str, point: GridPoint) {
        self.points.insert(name.to_string(), point);
    }

    /// Remove a node, preserving the order of the rest.
    pub fn remove(&mut self, name: &str) {
        self.points.shift_remove(name);
    }

    pub fn get(&self, name: &str) -> Option<&GridPoint> {
        self.points.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.points.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &GridPoint)> {
        self.points.iter().map(|(name, point)| (name.as_str(), point))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.points.keys().map(String::as_str)
    }

    /// Translate every point. Deltas are plain values, so a delta read out of
    /// the layout itself cannot alias the mutation.
    pub fn shift(&mut self, dx: f64, drows: i32) {
        for point in self.points.values_mut() {
            point.x += dx;
            point.row += drows;
        }
    }

    /// Move every entry of `other` into `self`; entries of `other` win.
    pub fn absorb(&mut self, other: GridLayout) {
        for (name, point) in other.points {
            self.points.insert(name, point);
        }
    }
}

/// A 2D point in the final pixel coordinate system
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Finalized layout: node name → center point in pixel space.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreeLayout {
    points: IndexMap<String, Point>,
}

impl TreeLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, point: Point) {
        self.points.insert(name.to_string(), point);
    }

    pub fn get(&self, name: &str) -> Option<&Point> {
        self.points.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.points.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Point)> {
        self.points.iter().map(|(name, point)| (name.as_str(), point))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.points.keys().map(String::as_str)
    }

    /// Overwrite one node's y-coordinate (the union adjustment pass).
    pub fn set_y(&mut self, name: &str, y: f64) {
        if let Some(point) = self.points.get_mut(name) {
            point.y = y;
        }
    }
}

/// A bounding box representing the spatial extent of a finalized layout
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge x-coordinate
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge y-coordinate
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Expand this bounding box to include another
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        BoundingBox::new(x, y, right - x, bottom - y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shift_moves_every_point() {
        let mut layout = GridLayout::pair("a", GridPoint::new(0.0, 0), "b", GridPoint::new(10.0, 1));
        layout.shift(5.0, -1);
        assert_eq!(layout.get("a"), Some(&GridPoint::new(5.0, -1)));
        assert_eq!(layout.get("b"), Some(&GridPoint::new(15.0, 0)));
    }

    #[test]
    fn test_absorb_prefers_other() {
        let mut left = GridLayout::singleton("a", GridPoint::ORIGIN);
        let right = GridLayout::singleton("a", GridPoint::new(3.0, 2));
        left.absorb(right);
        assert_eq!(left.get("a"), Some(&GridPoint::new(3.0, 2)));
        assert_eq!(left.len(), 1);
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut layout = GridLayout::new();
        layout.insert("a", GridPoint::ORIGIN);
        layout.insert("b", GridPoint::ORIGIN);
        layout.insert("c", GridPoint::ORIGIN);
        layout.remove("b");
        assert_eq!(layout.names().collect::<Vec<_>>(), vec!["a", "c"]);
    }

    #[test]
    fn test_bounding_box_union() {
        let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BoundingBox::new(5.0, -5.0, 10.0, 10.0);
        let u = a.union(&b);
        assert_eq!(u, BoundingBox::new(0.0, -5.0, 15.0, 15.0));
    }
}
