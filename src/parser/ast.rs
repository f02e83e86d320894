//! Data model for parsed family descriptions

use indexmap::IndexMap;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// Separator between the two partner names in a union key.
pub const UNION_SEPARATOR: &str = " + ";

/// Tokens that stand for an unknown individual and are replaced by a
/// freshly minted unique label during parsing.
pub const PLACEHOLDER_TOKENS: [&str; 2] = ["?", "..."];

/// True if `name` identifies a person (no union separator).
pub fn is_person(name: &str) -> bool {
    !name.contains(UNION_SEPARATOR)
}

/// True if `name` identifies a union of two partners.
pub fn is_union(name: &str) -> bool {
    name.contains(UNION_SEPARATOR)
}

/// Split a union name into its two partner names.
///
/// Returns `None` for person names.
pub fn union_members(name: &str) -> Option<(&str, &str)> {
    name.split_once(UNION_SEPARATOR)
}

/// The name as shown to the user: everything from the first `#` on is a
/// disambiguation suffix and is stripped.
pub fn display_name(name: &str) -> &str {
    match name.split_once('#') {
        Some((shown, _)) => shown,
        None => name,
    }
}

/// True if `token` stands for an unknown individual.
pub fn is_placeholder(token: &str) -> bool {
    PLACEHOLDER_TOKENS.contains(&token)
}

/// Mints unique labels for placeholder individuals.
///
/// Owned by the parse context so repeated parses of the same source produce
/// identical labels (no shared global counter).
#[derive(Debug, Default)]
pub struct PlaceholderMinter {
    count: u32,
}

impl PlaceholderMinter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Produce the next unique label. The `#` suffix keeps repeated unknown
    /// individuals distinct while displaying as a bare `?`.
    pub fn mint(&mut self) -> String {
        self.count += 1;
        format!("?#{}", self.count)
    }
}

/// One typed attribute line under a key.
///
/// Attribute kinds are fixed at parse time; downstream code never re-examines
/// line prefixes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attribute {
    /// `n: ` free text, possibly containing URLs.
    Note(String),
    /// `l: birth-death`, either side optional.
    Lifespan {
        birth: Option<String>,
        death: Option<String>,
    },
    /// `p: ` photo path, relative to the configured photo directory.
    Photo(String),
    /// `c: ` ordered child names (unions only), placeholders already expanded.
    Children(Vec<String>),
}

/// The attribute block declared under one key.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Entry {
    pub attributes: Vec<Attribute>,
    /// Span of the key line, for diagnostics.
    pub span: Span,
}

impl Entry {
    /// All note lines, in declaration order.
    pub fn notes(&self) -> impl Iterator<Item = &str> {
        self.attributes.iter().filter_map(|a| match a {
            Attribute::Note(text) => Some(text.as_str()),
            _ => None,
        })
    }

    /// The lifespan, if declared.
    pub fn lifespan(&self) -> Option<(Option<&str>, Option<&str>)> {
        self.attributes.iter().find_map(|a| match a {
            Attribute::Lifespan { birth, death } => Some((birth.as_deref(), death.as_deref())),
            _ => None,
        })
    }

    /// The photo path, if declared.
    pub fn photo(&self) -> Option<&str> {
        self.attributes.iter().find_map(|a| match a {
            Attribute::Photo(path) => Some(path.as_str()),
            _ => None,
        })
    }

    /// Declared children (empty for persons and childless unions).
    pub fn children(&self) -> &[String] {
        self.attributes
            .iter()
            .find_map(|a| match a {
                Attribute::Children(names) => Some(names.as_slice()),
                _ => None,
            })
            .unwrap_or(&[])
    }
}

/// A complete parsed family description: every declared key mapped to its
/// attribute block, in declaration order.
///
/// Insertion order is preserved so that every downstream pass (graph
/// building, layout, rendering) is deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    pub entries: IndexMap<String, Entry>,
}

impl Document {
    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.entries.get(name)
    }

    /// All declared keys in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Declared union keys in declaration order.
    pub fn unions(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.entries
            .iter()
            .filter(|(name, _)| is_union(name))
            .map(|(name, entry)| (name.as_str(), entry))
    }

    /// The first declared person, used as a root fallback.
    pub fn first_person(&self) -> Option<&str> {
        self.names().find(|name| is_person(name))
    }
}
