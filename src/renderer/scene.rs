//! Abstract render commands produced by the core
//!
//! A scene tells a renderer everything it needs without prescribing pixels:
//! where each visible person's center goes, which persons to hide, and which
//! classified connection lines to draw between anchor points.

use crate::graph::{traverse_relations, FamilyGraph, Relation};
use crate::layout::{BoundingBox, NodeMetrics, Point, TreeLayout};
use crate::parser::ast::{is_person, is_union, union_members};

/// Child links leave a parent's box slightly above its bottom edge.
const CHILD_LINK_INSET: f64 = 4.0;

/// Place one person's box at a center point.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub name: String,
    pub center: Point,
    pub relation: Relation,
}

/// Draw one classified connection line.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    pub from: Point,
    pub to: Point,
    pub relation: Relation,
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub root: String,
    pub placements: Vec<Placement>,
    /// Persons of the dataset that are not part of this frame.
    pub hidden: Vec<String>,
    pub connections: Vec<Connection>,
    pub bounds: BoundingBox,
}

/// Build the scene for a computed layout.
///
/// The relationship traversal runs once and feeds both person classes and
/// connection classes, so the two can never disagree.
pub fn build_scene(
    graph: &FamilyGraph,
    layout: &TreeLayout,
    root: &str,
    metrics: &dyn NodeMetrics,
    padding: f64,
) -> Scene {
    let mut relations = indexmap::IndexMap::new();
    let mut connections = Vec::new();

    traverse_relations(graph, root, |node, pred, relation| {
        relations.insert(node.to_string(), relation);
        let Some(pred) = pred else {
            return;
        };
        if !layout.contains(node) || !layout.contains(pred) {
            return;
        }
        // A childless union's link to its partners carries no lineage color,
        // so the pair's two links never come out half-colored.
        let relation = if is_union(node)
            && union_members(node).is_some_and(|(l, r)| l == pred || r == pred)
            && rendered_children(graph, layout, node).is_empty()
        {
            Relation::Other
        } else {
            relation
        };
        if let Some((from, to)) = connect(graph, layout, metrics, node, pred) {
            connections.push(Connection { from, to, relation });
        }
    });

    let mut placements = Vec::new();
    let mut hidden = Vec::new();
    for person in graph.persons() {
        match layout.get(person) {
            Some(point) => placements.push(Placement {
                name: person.to_string(),
                center: *point,
                relation: *relations.get(person).unwrap_or(&Relation::Other),
            }),
            None => hidden.push(person.to_string()),
        }
    }

    let bounds = scene_bounds(layout, metrics, padding);

    Scene {
        root: root.to_string(),
        placements,
        hidden,
        connections,
        bounds,
    }
}

/// The union's children that made it into the layout.
pub fn rendered_children<'a>(
    graph: &'a FamilyGraph,
    layout: &TreeLayout,
    union: &str,
) -> Vec<&'a str> {
    graph
        .children(union)
        .into_iter()
        .filter(|child| layout.contains(child))
        .collect()
}

/// Anchor points for the edge between a person and a union.
///
/// Partner links leave the person's inner side edge, or the bottom edge when
/// the union has rendered children below it; child links leave the top edge.
fn connect(
    graph: &FamilyGraph,
    layout: &TreeLayout,
    metrics: &dyn NodeMetrics,
    node: &str,
    pred: &str,
) -> Option<(Point, Point)> {
    let (person, union) = if is_person(node) {
        (node, pred)
    } else {
        (pred, node)
    };
    let person_at = layout.get(person)?;
    let union_at = layout.get(union)?;
    let (left, right) = union_members(union)?;

    let from = if left == person || right == person {
        if !rendered_children(graph, layout, union).is_empty() {
            Point::new(
                person_at.x,
                person_at.y + metrics.half_height(person) - CHILD_LINK_INSET,
            )
        } else {
            let sign = if left == person { 1.0 } else { -1.0 };
            Point::new(person_at.x + sign * metrics.half_width(person), person_at.y)
        }
    } else {
        Point::new(person_at.x, person_at.y - metrics.half_height(person))
    };
    Some((from, Point::new(union_at.x, union_at.y)))
}

fn scene_bounds(layout: &TreeLayout, metrics: &dyn NodeMetrics, padding: f64) -> BoundingBox {
    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for (name, point) in layout.iter() {
        let (rx, ry) = if is_person(name) {
            (padding + metrics.half_width(name), metrics.half_height(name))
        } else {
            (0.0, 0.0)
        };
        min_x = min_x.min(point.x - rx);
        max_x = max_x.max(point.x + rx);
        min_y = min_y.min(point.y - ry);
        max_y = max_y.max(point.y + ry);
    }
    if layout.is_empty() {
        return BoundingBox::new(0.0, 0.0, 0.0, 0.0);
    }
    BoundingBox::new(min_x, min_y, max_x - min_x, max_y - min_y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{validate, visible_set, Filter};
    use crate::layout::{compute, FixedMetrics, LayoutConfig, LayoutContext};
    use crate::parser::parse;

    const METRICS: FixedMetrics = FixedMetrics {
        half_width: 40.0,
        half_height: 24.0,
    };

    fn scene_for(source: &str, root: &str, filter: Filter) -> Scene {
        let doc = parse(source).expect("should parse");
        let graph = FamilyGraph::build(&doc);
        validate(&graph).expect("should validate");
        let visible = visible_set(&graph, root, filter);
        let config = LayoutConfig::default();
        let ctx = LayoutContext::new(&graph, &visible, &METRICS, &config);
        let layout = compute(root, &ctx).expect("should lay out");
        build_scene(&graph, &layout, root, &METRICS, config.padding)
    }

    const FAMILY: &str = "A + B\n c: C, D\nC + E\n";

    #[test]
    fn test_places_visible_and_hides_the_rest() {
        let scene = scene_for(FAMILY, "A", Filter::depth(0));
        let placed: Vec<&str> = scene.placements.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(placed, vec!["A", "B"]);
        assert!(scene.hidden.contains(&"C".to_string()));
        assert!(scene.hidden.contains(&"E".to_string()));
    }

    #[test]
    fn test_connection_count_is_tree_edges() {
        // A spanning tree over n laid-out nodes has n - 1 edges.
        let scene = scene_for(FAMILY, "A", Filter::everyone());
        let laid_out = scene.placements.len() + 2; // two unions
        assert_eq!(scene.connections.len(), laid_out - 1);
    }

    #[test]
    fn test_childless_union_links_are_neutral() {
        let scene = scene_for(FAMILY, "A", Filter::depth(0));
        // Only A - (A + B) and (A + B) - B survive, and the union's children
        // are not rendered, so both links are neutral.
        assert_eq!(scene.connections.len(), 2);
        for connection in &scene.connections {
            assert_eq!(connection.relation, Relation::Other);
        }
    }

    #[test]
    fn test_child_links_leave_the_top_edge() {
        let scene = scene_for(FAMILY, "A", Filter::everyone());
        let layout_c = scene
            .placements
            .iter()
            .find(|p| p.name == "C")
            .expect("C placed");
        let child_link = scene
            .connections
            .iter()
            .find(|c| (c.from.x - layout_c.center.x).abs() < 1e-9 && c.from.y < layout_c.center.y)
            .expect("child link from C's top edge");
        assert_eq!(child_link.from.y, layout_c.center.y - 24.0);
    }

    #[test]
    fn test_partner_with_children_links_from_bottom_edge() {
        let scene = scene_for(FAMILY, "A", Filter::everyone());
        let a = scene
            .placements
            .iter()
            .find(|p| p.name == "A")
            .expect("A placed");
        let link = scene
            .connections
            .iter()
            .find(|c| (c.from.x - a.center.x).abs() < 1e-9 && c.from.y > a.center.y)
            .expect("link from A's bottom edge");
        assert_eq!(link.from.y, a.center.y + 24.0 - 4.0);
    }

    #[test]
    fn test_bounds_cover_all_boxes() {
        let scene = scene_for(FAMILY, "A", Filter::everyone());
        for placement in &scene.placements {
            assert!(placement.center.x - 48.0 >= scene.bounds.x - 1e-9);
            assert!(placement.center.x + 48.0 <= scene.bounds.right() + 1e-9);
            assert!(placement.center.y - 24.0 >= scene.bounds.y - 1e-9);
            assert!(placement.center.y + 24.0 <= scene.bounds.bottom() + 1e-9);
        }
    }
}
