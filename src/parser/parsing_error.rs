//! Error types for NEXUS and Newick parser.
//!
//! This module provides [ParsingError] and [ParsingErrorKind] for representing
//! and reporting errors that occur while reading phylogenetic data files.

use std::fmt;
use thiserror::Error;

// =#========================================================================#=
// POSITION
// =#========================================================================€=
/// Location in the input text, both counters 1-based.
///
/// Columns count bytes, so a multibyte UTF-8 character advances the
/// column by more than one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

// =#========================================================================#=
// PARSING ERROR KIND
// =#========================================================================€=
/// Error kinds that can occur during NEXUS and NEWICK parsing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParsingErrorKind {
    /// A structurally required token is missing or mismatched.
    #[error("Syntax error - {0}")]
    Syntax(String),
    /// Input ended inside a multi-token statement or block.
    #[error("Unexpected end of input - {0}")]
    UnexpectedEof(String),
    /// Characters inside a `{...}` group match no ambiguity code.
    #[error("Unrecognized characters in ambiguity group \"{0}\"")]
    AmbiguityResolution(String),
    /// Strict taxon lookup found no taxon with this label.
    #[error("Could not resolve taxon \"{0}\"")]
    UnresolvedTaxon(String),
    /// Format detection needs to rewind, but the source is forward-only.
    #[error("Source cannot be rewound for format detection")]
    SourceNotSeekable,
    #[error("IO error - {0}")]
    Io(String),
}

// =#========================================================================#=
// PARSING ERROR
// =#========================================================================$=
/// Parsing error carrying its kind and, if known, the [Position] where
/// it was detected.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind}{}", position_suffix(.position))]
pub struct ParsingError {
    kind: ParsingErrorKind,
    position: Option<Position>,
}

fn position_suffix(position: &Option<Position>) -> String {
    match position {
        Some(position) => format!(" (at {position})"),
        None => String::new(),
    }
}

impl ParsingError {
    /// Creates an error of the given kind at an optional position.
    pub fn new(kind: ParsingErrorKind, position: Option<Position>) -> Self {
        Self { kind, position }
    }

    /// Convenience constructor for [ParsingErrorKind::Syntax]
    pub fn syntax(message: impl Into<String>, position: Position) -> Self {
        Self::new(ParsingErrorKind::Syntax(message.into()), Some(position))
    }

    /// Convenience constructor for [ParsingErrorKind::UnexpectedEof]
    pub fn unexpected_eof(message: impl Into<String>, position: Position) -> Self {
        Self::new(ParsingErrorKind::UnexpectedEof(message.into()), Some(position))
    }

    /// Convenience constructor for [ParsingErrorKind::AmbiguityResolution]
    pub fn ambiguity(group: impl Into<String>, position: Option<Position>) -> Self {
        Self::new(ParsingErrorKind::AmbiguityResolution(group.into()), position)
    }

    /// Convenience constructor for [ParsingErrorKind::UnresolvedTaxon]
    pub fn unresolved_taxon(label: impl Into<String>, position: Option<Position>) -> Self {
        Self::new(ParsingErrorKind::UnresolvedTaxon(label.into()), position)
    }

    /// Convenience constructor for [ParsingErrorKind::SourceNotSeekable]
    pub fn source_not_seekable() -> Self {
        Self::new(ParsingErrorKind::SourceNotSeekable, None)
    }

    /// Fills in the position if the error does not carry one yet.
    pub(crate) fn or_at(mut self, position: Position) -> Self {
        self.position.get_or_insert(position);
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> &ParsingErrorKind {
        &self.kind
    }

    /// Get the position where the error occurred, if known
    pub fn position(&self) -> Option<Position> {
        self.position
    }

    /// Line of the error, 0 if unknown
    pub fn line(&self) -> usize {
        self.position.map_or(0, |p| p.line)
    }

    /// Column of the error, 0 if unknown
    pub fn column(&self) -> usize {
        self.position.map_or(0, |p| p.column)
    }
}

impl From<std::io::Error> for ParsingError {
    fn from(err: std::io::Error) -> Self {
        Self::new(ParsingErrorKind::Io(err.to_string()), None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_position() {
        let err = ParsingError::syntax("Expecting \"=\"", Position::new(3, 14));
        assert_eq!(
            err.to_string(),
            "Syntax error - Expecting \"=\" (at line 3, column 14)"
        );
        assert_eq!(err.line(), 3);
        assert_eq!(err.column(), 14);
    }

    #[test]
    fn test_io_error_has_no_position() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = ParsingError::from(io);
        assert_eq!(err.position(), None);
        assert_eq!(err.to_string(), "IO error - gone");
        assert_eq!(err.or_at(Position::new(1, 1)).line(), 1);
    }
}
