//! Selection of the visible subset of the family graph
//!
//! Given a root and a detail filter, decides which nodes get laid out and
//! drawn. Ascent along the blood line is unbounded; descent is limited by a
//! generation budget until a descent has begun, after which a lineage is
//! followed to its end.

use indexmap::IndexSet;

use super::walk::depth_first_infallible;
use super::FamilyGraph;
use crate::parser::ast::{is_person, union_members};

/// How much of the family to show around the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Filter {
    /// Show every node regardless of relation to the root.
    pub include_all: bool,
    /// Generations of descent permitted from the ascent line;
    /// `None` is unlimited.
    pub depth: Option<u32>,
}

impl Filter {
    /// Everyone in the dataset, in-laws' families included.
    pub fn everyone() -> Self {
        Filter {
            include_all: true,
            depth: None,
        }
    }

    /// All blood relatives of the root.
    pub fn blood() -> Self {
        Filter {
            include_all: false,
            depth: None,
        }
    }

    /// Blood relatives up to `depth` generations below the ascent line
    /// (0: ancestors only; 1: adds siblings and children; 2: adds cousins).
    pub fn depth(depth: u32) -> Self {
        Filter {
            include_all: false,
            depth: Some(depth),
        }
    }
}

impl Default for Filter {
    fn default() -> Self {
        Filter::blood()
    }
}

/// The set of nodes to lay out, in discovery order.
pub type VisibleSet = IndexSet<String>;

#[derive(Debug, Clone, Copy)]
struct Flags {
    /// May ascend to this node's own parents' union.
    allow_up: bool,
    /// Remaining generations of descent; `None` is unlimited.
    downs_left: Option<u32>,
    /// A descent step has been taken on this path.
    on_descent: bool,
}

/// Compute the visible subset of `graph` around `root`.
///
/// Requires a validated graph (the walk relies on the tree shape to
/// terminate). The root itself is always a member of the result.
pub fn visible_set(graph: &FamilyGraph, root: &str, filter: Filter) -> VisibleSet {
    if filter.include_all {
        return graph.names().map(str::to_string).collect();
    }

    let mut set = VisibleSet::new();
    let seed = Flags {
        allow_up: true,
        downs_left: filter.depth,
        on_descent: false,
    };
    depth_first_infallible(root, None, seed, &mut |node, _pred, flags: Flags| {
        set.insert(node.to_string());
        let mut next = Vec::new();
        if is_person(node) {
            for union in [graph.left_union(node), graph.right_union(node)]
                .into_iter()
                .flatten()
            {
                next.push((
                    union.to_string(),
                    Flags {
                        allow_up: false,
                        ..flags
                    },
                ));
            }
            if flags.allow_up {
                if let Some(above) = graph.above_union(node) {
                    next.push((
                        above.to_string(),
                        Flags {
                            allow_up: true,
                            downs_left: flags.downs_left,
                            on_descent: false,
                        },
                    ));
                }
            }
        } else if let Some((left, right)) = union_members(node) {
            for partner in [left, right] {
                next.push((
                    partner.to_string(),
                    Flags {
                        on_descent: false,
                        ..flags
                    },
                ));
            }
            let may_descend = flags.on_descent || flags.downs_left.map_or(true, |d| d > 0);
            if may_descend {
                for child in graph.children(node) {
                    next.push((
                        child.to_string(),
                        Flags {
                            allow_up: false,
                            downs_left: flags.downs_left.map(|d| d.saturating_sub(1)),
                            on_descent: true,
                        },
                    ));
                }
            }
        }
        next
    });
    set
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn graph(source: &str) -> FamilyGraph {
        FamilyGraph::build(&parse(source).expect("should parse"))
    }

    fn names(set: &VisibleSet) -> Vec<&str> {
        set.iter().map(String::as_str).collect()
    }

    const COUPLE_WITH_KIDS: &str = "A + B\n c: C, D\n";

    #[test]
    fn test_everyone_ignores_depth() {
        let g = graph(COUPLE_WITH_KIDS);
        let set = visible_set(&g, "A", Filter::everyone());
        assert_eq!(set.len(), g.len());
    }

    #[test]
    fn test_depth_zero_is_root_unions_and_partners() {
        let g = graph(COUPLE_WITH_KIDS);
        let set = visible_set(&g, "A", Filter::depth(0));
        assert_eq!(names(&set), vec!["A", "A + B", "B"]);
    }

    #[test]
    fn test_depth_one_reaches_children() {
        let g = graph(COUPLE_WITH_KIDS);
        let set = visible_set(&g, "A", Filter::depth(1));
        assert_eq!(set.len(), 5);
        assert!(set.contains("C") && set.contains("D"));
    }

    #[test]
    fn test_depth_zero_keeps_full_ancestor_chain() {
        let g = graph(
            "GF + GM\n c: Pa\nPa + Ma\n c: Me, Sis\nMe + Spouse\n c: Kid\n",
        );
        let set = visible_set(&g, "Me", Filter::depth(0));
        // Ancestors all the way up, no siblings, no children.
        for name in ["Me", "Pa + Ma", "Pa", "Ma", "GF + GM", "GF", "GM", "Me + Spouse", "Spouse"] {
            assert!(set.contains(name), "missing {name}");
        }
        assert!(!set.contains("Sis"));
        assert!(!set.contains("Kid"));
    }

    #[test]
    fn test_depth_one_adds_siblings_and_their_lineage() {
        let g = graph(
            "Pa + Ma\n c: Me, Sis\nSis + InLaw\n c: Niece\nMe + Spouse\n",
        );
        let set = visible_set(&g, "Me", Filter::depth(1));
        // Once descent begins (at Sis), the lineage follows to its end.
        for name in ["Sis", "Sis + InLaw", "InLaw", "Niece"] {
            assert!(set.contains(name), "missing {name}");
        }
    }

    #[test]
    fn test_in_laws_ancestry_stays_hidden_without_include_all() {
        let g = graph(
            "Pa + Ma\n c: Me\nMe + Spouse\nTheirPa + TheirMa\n c: Spouse\n",
        );
        let set = visible_set(&g, "Me", Filter::blood());
        assert!(set.contains("Spouse"));
        // One union away only: the spouse's parents stay hidden.
        assert!(!set.contains("TheirPa + TheirMa"));
        assert!(!set.contains("TheirPa"));

        let everyone = visible_set(&g, "Me", Filter::everyone());
        assert!(everyone.contains("TheirPa"));
    }

    #[test]
    fn test_root_is_always_member() {
        let g = graph(COUPLE_WITH_KIDS);
        let set = visible_set(&g, "C", Filter::depth(0));
        assert!(set.contains("C"));
    }
}
