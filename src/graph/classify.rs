//! Relationship classification relative to the current root
//!
//! Every node of the full graph gets exactly one class. The same traversal
//! (same visit order) serves both node classification and connection
//! drawing, so edge and node categories can never disagree.

use indexmap::IndexMap;

use super::walk::depth_first_infallible;
use super::FamilyGraph;
use crate::parser::ast::{is_person, union_members};

/// Relationship of a node to the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    Root,
    /// On the strict ascent line from the root.
    Ancestor,
    /// On a strict descent line from the root.
    Descendant,
    /// Shares an ancestor with the root: siblings, cousins, their lineages.
    Blood,
    /// Connected only through marriage.
    Other,
}

impl Relation {
    /// CSS class suffix used by renderers.
    pub fn css_class(&self) -> &'static str {
        match self {
            Relation::Root => "root",
            Relation::Ancestor => "ancestor",
            Relation::Descendant => "descendant",
            Relation::Blood => "blood",
            Relation::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Flags {
    ancestor: bool,
    descendant: bool,
    blood: bool,
}

/// Walk the full graph from `root`, reporting each node once with its
/// predecessor and relation class.
pub fn traverse_relations<V>(graph: &FamilyGraph, root: &str, mut visit: V)
where
    V: FnMut(&str, Option<&str>, Relation),
{
    let seed = Flags {
        ancestor: true,
        descendant: true,
        blood: true,
    };
    depth_first_infallible(root, None, seed, &mut |node, pred, flags: Flags| {
        let relation = if pred.is_none() {
            Relation::Root
        } else if flags.ancestor {
            Relation::Ancestor
        } else if flags.descendant {
            Relation::Descendant
        } else if flags.blood {
            Relation::Blood
        } else {
            Relation::Other
        };
        visit(node, pred, relation);

        let mut next = Vec::new();
        if is_person(node) {
            for union in [graph.left_union(node), graph.right_union(node)]
                .into_iter()
                .flatten()
            {
                next.push((
                    union.to_string(),
                    Flags {
                        ancestor: false,
                        descendant: flags.descendant,
                        blood: flags.blood || flags.ancestor,
                    },
                ));
            }
            if let Some(above) = graph.above_union(node) {
                next.push((
                    above.to_string(),
                    Flags {
                        ancestor: flags.ancestor,
                        descendant: false,
                        blood: false,
                    },
                ));
            }
        } else if let Some((left, right)) = union_members(node) {
            for partner in [left, right] {
                next.push((
                    partner.to_string(),
                    Flags {
                        ancestor: flags.ancestor,
                        descendant: false,
                        blood: false,
                    },
                ));
            }
            for child in graph.children(node) {
                next.push((
                    child.to_string(),
                    Flags {
                        ancestor: false,
                        descendant: flags.descendant,
                        blood: flags.blood || flags.ancestor,
                    },
                ));
            }
        }
        next
    });
}

/// Classify every node of the graph relative to `root`.
pub fn classify(graph: &FamilyGraph, root: &str) -> IndexMap<String, Relation> {
    let mut result = IndexMap::new();
    traverse_relations(graph, root, |node, _pred, relation| {
        result.insert(node.to_string(), relation);
    });
    result
}
