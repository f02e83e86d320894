//! Parser for the family description format

pub mod ast;
pub mod grammar;

pub use ast::{Attribute, Document, Entry, PlaceholderMinter};
pub use grammar::{parse, parse_with_minter};
