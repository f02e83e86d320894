//! Line-oriented parser for the family description format
//!
//! The format is a sequence of records: a non-indented key line (a person
//! name or `"A + B"` union) followed by space-indented attribute lines
//! (`n:`/`l:`/`p:` for persons, `n:`/`c:` for unions). Blank lines and lines
//! whose first non-space character is `#` are skipped everywhere.

use crate::error::ParseError;
use crate::parser::ast::{
    is_placeholder, Attribute, Document, Entry, PlaceholderMinter, Span, UNION_SEPARATOR,
};

/// One source line with its byte span (trailing `\r` excluded).
struct Line<'a> {
    text: &'a str,
    span: Span,
}

fn scan_lines(source: &str) -> Vec<Line<'_>> {
    let mut lines = Vec::new();
    let mut offset = 0;
    for raw in source.split('\n') {
        let text = raw.strip_suffix('\r').unwrap_or(raw);
        lines.push(Line {
            text,
            span: offset..offset + text.len(),
        });
        offset += raw.len() + 1;
    }
    lines
}

/// Blank, or first non-space character is `#`.
fn skippable(text: &str) -> bool {
    let trimmed = text.trim_start();
    trimmed.is_empty() || trimmed.starts_with('#')
}

/// Parse a family description into a [`Document`].
pub fn parse(source: &str) -> Result<Document, ParseError> {
    parse_with_minter(source, &mut PlaceholderMinter::new())
}

/// Parse with a caller-supplied placeholder minter, so tests can observe or
/// pre-seed the generated labels.
pub fn parse_with_minter(
    source: &str,
    minter: &mut PlaceholderMinter,
) -> Result<Document, ParseError> {
    let lines = scan_lines(source);
    let mut doc = Document::default();
    let mut pos = 0;

    while pos < lines.len() {
        if skippable(lines[pos].text) {
            pos += 1;
            continue;
        }

        let key_line = &lines[pos];
        let key = parse_key(key_line, minter)?;
        if doc.entries.contains_key(&key.name) {
            return Err(ParseError::DuplicateKey {
                key: key.name,
                span: key_line.span.clone(),
            });
        }
        let key_span = key_line.span.clone();
        pos += 1;

        let mut attributes = Vec::new();
        while pos < lines.len() {
            if skippable(lines[pos].text) {
                pos += 1;
                continue;
            }
            if !lines[pos].text.starts_with(' ') {
                break;
            }
            attributes.push(parse_attribute(&lines[pos], &key, minter)?);
            pos += 1;
        }

        doc.entries.insert(
            key.name,
            Entry {
                attributes,
                span: key_span,
            },
        );
    }

    Ok(doc)
}

/// A validated key line: the canonical name plus the union partners, if any.
struct Key {
    name: String,
    partners: Option<(String, String)>,
}

fn parse_key(line: &Line<'_>, minter: &mut PlaceholderMinter) -> Result<Key, ParseError> {
    let raw = line.text;
    let tokens: Vec<&str> = raw.split(UNION_SEPARATOR).collect();
    if tokens.len() > 2 {
        return Err(ParseError::MultiplePlus {
            key: raw.to_string(),
            span: line.span.clone(),
        });
    }
    let trimmed: Vec<&str> = tokens.iter().map(|t| t.trim()).collect();
    if trimmed.iter().any(|t| t.is_empty()) {
        return Err(ParseError::EmptyName {
            key: raw.to_string(),
            span: line.span.clone(),
        });
    }
    if raw.contains(',') {
        return Err(ParseError::CommaInName {
            key: raw.to_string(),
            span: line.span.clone(),
        });
    }

    if trimmed.len() == 2 {
        // Placeholders are minted here so the union can be referenced by its
        // final name, and repeated unknowns never collide.
        let expand = |token: &str, minter: &mut PlaceholderMinter| {
            if is_placeholder(token) {
                minter.mint()
            } else {
                token.to_string()
            }
        };
        let left = expand(trimmed[0], minter);
        let right = expand(trimmed[1], minter);
        let name = format!("{left}{UNION_SEPARATOR}{right}");
        Ok(Key {
            name,
            partners: Some((left, right)),
        })
    } else {
        Ok(Key {
            name: trimmed[0].to_string(),
            partners: None,
        })
    }
}

fn parse_attribute(
    line: &Line<'_>,
    key: &Key,
    minter: &mut PlaceholderMinter,
) -> Result<Attribute, ParseError> {
    let trimmed = line.text.trim();
    let bad = || ParseError::BadAttribute {
        key: key.name.clone(),
        line: trimmed.to_string(),
        span: line.span.clone(),
    };

    // "X: rest" where X is one recognized ASCII letter.
    let bytes = trimmed.as_bytes();
    let well_formed =
        bytes.len() >= 3 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' && bytes[2] == b' ';
    if !well_formed {
        return Err(bad());
    }
    let kind = bytes[0] as char;
    let body = &trimmed[3..];

    match (key.partners.is_some(), kind) {
        (false, 'n') | (true, 'n') => Ok(Attribute::Note(body.to_string())),
        (false, 'l') => Ok(parse_lifespan(body)),
        (false, 'p') => Ok(Attribute::Photo(body.to_string())),
        (true, 'c') => {
            let Some((left, right)) = key.partners.as_ref() else {
                return Err(bad());
            };
            let mut children = Vec::new();
            for token in body.split(", ") {
                let child = if is_placeholder(token) {
                    minter.mint()
                } else {
                    token.to_string()
                };
                if child == *left || child == *right {
                    return Err(ParseError::SelfParent {
                        key: key.name.clone(),
                        child,
                        span: line.span.clone(),
                    });
                }
                children.push(child);
            }
            Ok(Attribute::Children(children))
        }
        _ => Err(bad()),
    }
}

fn parse_lifespan(body: &str) -> Attribute {
    let non_empty = |s: &str| {
        if s.is_empty() {
            None
        } else {
            Some(s.to_string())
        }
    };
    // A bare year with no dash counts as a birth year.
    let (birth, death) = match body.split_once('-') {
        Some((birth, death)) => (non_empty(birth), non_empty(death)),
        None => (non_empty(body), None),
    };
    Attribute::Lifespan { birth, death }
}
