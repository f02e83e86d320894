//! Bipartite person/union graph built from a parsed document
//!
//! Person nodes connect only to union nodes and vice versa; an edge
//! (union, member) exists iff the member is one of the union's two partners
//! or one of its declared children.

pub mod classify;
pub mod validate;
pub mod visibility;
pub mod walk;

pub use classify::{classify, traverse_relations, Relation};
pub use validate::{validate, TreeError};
pub use visibility::{visible_set, Filter, VisibleSet};

use indexmap::IndexMap;

use crate::parser::ast::{is_person, union_members, Document};

/// Which side of a person a union hangs off.
///
/// A person is the *right-hand* partner of the union drawn to their left,
/// and the *left-hand* partner of the union drawn to their right.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn label(&self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

/// Undirected adjacency over person and union names, insertion-ordered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FamilyGraph {
    adjacency: IndexMap<String, Vec<String>>,
}

impl FamilyGraph {
    /// Build the adjacency from a parsed document.
    ///
    /// Every declared key gets an entry (bare persons keep an empty list, for
    /// the validator to flag); each union contributes bidirectional edges to
    /// both partners and every declared child.
    pub fn build(doc: &Document) -> Self {
        let mut graph = FamilyGraph {
            adjacency: doc
                .names()
                .map(|name| (name.to_string(), Vec::new()))
                .collect(),
        };
        for (union, entry) in doc.unions() {
            let Some((left, right)) = union_members(union) else {
                continue;
            };
            for member in entry
                .children()
                .iter()
                .map(String::as_str)
                .chain([left, right])
            {
                graph.add_edge(union, member);
            }
        }
        graph
    }

    fn add_edge(&mut self, a: &str, b: &str) {
        self.adjacency
            .entry(a.to_string())
            .or_default()
            .push(b.to_string());
        self.adjacency
            .entry(b.to_string())
            .or_default()
            .push(a.to_string());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.adjacency.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.adjacency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// All node names, in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.adjacency.keys().map(String::as_str)
    }

    /// Adjacent names of `name` (empty for unknown names).
    pub fn neighbours(&self, name: &str) -> &[String] {
        self.adjacency.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every union in which `person` is the partner on the given side.
    /// A validated graph has at most one per side.
    pub fn side_unions(&self, person: &str, side: Side) -> Vec<&str> {
        self.neighbours(person)
            .iter()
            .filter(|union| {
                union_members(union).is_some_and(|(left, right)| match side {
                    Side::Left => right == person,
                    Side::Right => left == person,
                })
            })
            .map(String::as_str)
            .collect()
    }

    /// The union drawn at `person`'s left (person is its right-hand partner).
    pub fn left_union(&self, person: &str) -> Option<&str> {
        self.side_unions(person, Side::Left).first().copied()
    }

    /// The union drawn at `person`'s right (person is its left-hand partner).
    pub fn right_union(&self, person: &str) -> Option<&str> {
        self.side_unions(person, Side::Right).first().copied()
    }

    /// The union `person` is a child of, if any.
    pub fn above_union(&self, person: &str) -> Option<&str> {
        self.neighbours(person)
            .iter()
            .find(|union| {
                union_members(union)
                    .is_some_and(|(left, right)| left != person && right != person)
            })
            .map(String::as_str)
    }

    /// The children of a union: its neighbours that are not its partners.
    pub fn children(&self, union: &str) -> Vec<&str> {
        let Some((left, right)) = union_members(union) else {
            return Vec::new();
        };
        self.neighbours(union)
            .iter()
            .map(String::as_str)
            .filter(|name| *name != left && *name != right)
            .collect()
    }

    /// True if `name` is a person node of this graph.
    pub fn is_person_node(&self, name: &str) -> bool {
        self.contains(name) && is_person(name)
    }

    /// Person names in insertion order.
    pub fn persons(&self) -> impl Iterator<Item = &str> {
        self.names().filter(|name| is_person(name))
    }
}
