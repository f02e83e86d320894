//! Structural validation of the family graph
//!
//! A loadable family is exactly one tree: a single connected component with
//! no cycles, where no person is the same-side partner of two unions.

use indexmap::IndexMap;
use thiserror::Error;

use super::walk::depth_first;
use super::{FamilyGraph, Side};
use crate::parser::ast::is_person;

/// One connected component, for the disconnection report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    pub representative: String,
    pub size: usize,
}

/// Structural defects that make a family graph unusable.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("singleton node or malformed entry: '{name}'")]
    Singleton { name: String },

    #[error("'{person}' appears in more than one union as the {side} partner")]
    DuplicateSideUnion { person: String, side: &'static str },

    #[error("relationship loop detected: {}", path.join(" -> "))]
    Cycle { path: Vec<String> },

    #[error("family is not one connected tree: {}", format_components(components))]
    Disconnected { components: Vec<Component> },

    #[error("internal traversal error at '{name}'")]
    Internal { name: String },
}

fn format_components(components: &[Component]) -> String {
    components
        .iter()
        .map(|c| format!("{} connected to '{}'", c.size, c.representative))
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Check that the graph is a single connected tree.
///
/// Reports the first defect found: a zero-degree node, a person partnering
/// two unions on the same side, a cycle (with the reconstructed loop), or a
/// partition into components (each with size and a representative).
pub fn validate(graph: &FamilyGraph) -> Result<(), TreeError> {
    for name in graph.names() {
        if graph.neighbours(name).is_empty() {
            return Err(TreeError::Singleton {
                name: name.to_string(),
            });
        }
    }

    for person in graph.names().filter(|n| is_person(n)) {
        for side in [Side::Left, Side::Right] {
            if graph.side_unions(person, side).len() > 1 {
                return Err(TreeError::DuplicateSideUnion {
                    person: person.to_string(),
                    side: side.label(),
                });
            }
        }
    }

    // DFS over every component, keeping each node's discovery predecessor so
    // a revisit can be unrolled into the offending loop.
    let mut parent: IndexMap<String, Option<String>> = IndexMap::new();
    let mut components: Vec<Component> = Vec::new();
    for name in graph.names() {
        if parent.contains_key(name) {
            continue;
        }
        let mut size = 0usize;
        depth_first(name, None, (), &mut |node: &str, pred: Option<&str>, _flags: ()| {
            if parent.contains_key(node) {
                return Err(cycle_error(node, pred, &parent));
            }
            parent.insert(node.to_string(), pred.map(str::to_string));
            size += 1;
            Ok(graph
                .neighbours(node)
                .iter()
                .map(|n| (n.clone(), ()))
                .collect())
        })?;
        components.push(Component {
            representative: name.to_string(),
            size,
        });
    }

    if components.len() > 1 {
        return Err(TreeError::Disconnected { components });
    }
    Ok(())
}

/// Rebuild the loop by walking predecessor links from the second arrival
/// back to the first. The walk is recursive, so the revisited node is an
/// ancestor of the current chain and the unroll terminates.
fn cycle_error(
    node: &str,
    pred: Option<&str>,
    parent: &IndexMap<String, Option<String>>,
) -> TreeError {
    let Some(pred) = pred else {
        return TreeError::Internal {
            name: node.to_string(),
        };
    };
    let mut path = vec![node.to_string(), pred.to_string()];
    let mut cursor = pred.to_string();
    while cursor != node {
        match parent.get(&cursor).and_then(Clone::clone) {
            Some(next) => {
                path.push(next.clone());
                cursor = next;
            }
            None => {
                return TreeError::Internal {
                    name: node.to_string(),
                }
            }
        }
    }
    TreeError::Cycle { path }
}
