//! Error types for parsing family descriptions

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// Errors detected while parsing a family description.
///
/// Parsing is fail-fast: the first defect aborts the load with one of these.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("multiple ' + ' separators in union key '{key}'")]
    MultiplePlus { key: String, span: Span },

    #[error("malformed key line '{key}': names must be non-empty")]
    EmptyName { key: String, span: Span },

    #[error("names cannot contain commas: '{key}'")]
    CommaInName { key: String, span: Span },

    #[error("duplicate entry for '{key}'")]
    DuplicateKey { key: String, span: Span },

    #[error("malformed line under '{key}': '{line}'")]
    BadAttribute {
        key: String,
        line: String,
        span: Span,
    },

    #[error("union '{key}' lists its own parent '{child}' as a child")]
    SelfParent {
        key: String,
        child: String,
        span: Span,
    },
}

impl ParseError {
    /// The source span the error points at.
    pub fn span(&self) -> &Span {
        match self {
            ParseError::MultiplePlus { span, .. }
            | ParseError::EmptyName { span, .. }
            | ParseError::CommaInName { span, .. }
            | ParseError::DuplicateKey { span, .. }
            | ParseError::BadAttribute { span, .. }
            | ParseError::SelfParent { span, .. } => span,
        }
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let span = self.span().clone();
        let message = self.to_string();

        let mut buf = Vec::new();
        Report::build(ReportKind::Error, filename, span.start)
            .with_message(&message)
            .with_label(
                Label::new((filename, span))
                    .with_message(&message)
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf)
            .unwrap();
        String::from_utf8(buf).unwrap()
    }
}
