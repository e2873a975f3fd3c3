//! Character-level scanner over a [ByteSource].
//!
//! The [Scanner] holds exactly one current character, tracks line and
//! column, and skips (possibly nested) `[...]` comments. Top-level
//! comments starting with `&` are recorded as annotations so that callers
//! can pick up commands such as `[&R]`.

use crate::parser::byte_source::ByteSource;
use crate::parser::parsing_error::{ParsingError, Position};
use std::io;

/// Fixed NEXUS punctuation alphabet.
pub const PUNCTUATION: &[u8] = b"()[]{}\\/,;:=*'\"`+-<>";

/// NEXUS whitespace alphabet.
pub const WHITESPACE: &[u8] = b" \0\t\n\r";

/// Whether `byte` belongs to the [PUNCTUATION] alphabet.
#[inline]
pub fn is_punctuation(byte: u8) -> bool {
    PUNCTUATION.contains(&byte)
}

/// Whether `byte` belongs to the [WHITESPACE] alphabet.
#[inline]
pub fn is_whitespace(byte: u8) -> bool {
    WHITESPACE.contains(&byte)
}

// =#========================================================================#=
// SCANNER
// =#========================================================================$=
/// Reads one character at a time from a [ByteSource].
///
/// The scanner is primed on construction: [current](Scanner::current)
/// already holds the first character (or `None` for empty input).
/// Reaching end of input is not an error here; callers decide whether an
/// early end is malformed.
pub struct Scanner<S: ByteSource> {
    source: S,
    current: Option<u8>,
    line: usize,
    column: usize,
    after_newline: bool,
    annotations: Vec<String>,
}

// ============================================================================
// Construction, Rewind (pub)
// ============================================================================
impl<S: ByteSource> Scanner<S> {
    /// Creates a scanner and reads the first character.
    pub fn new(source: S) -> Self {
        let mut scanner = Self {
            source,
            current: None,
            line: 1,
            column: 0,
            after_newline: false,
            annotations: Vec::new(),
        };
        scanner.advance();
        scanner
    }

    /// Moves back to the first character of a seekable source and resets
    /// line and column counters.
    ///
    /// # Errors
    /// Forwards the error of [ByteSource::rewind].
    pub fn rewind(&mut self) -> io::Result<()> {
        self.source.rewind()?;
        self.line = 1;
        self.column = 0;
        self.after_newline = false;
        self.annotations.clear();
        self.current = None;
        self.advance();
        Ok(())
    }

    /// Whether [rewind](Self::rewind) can succeed.
    pub fn is_seekable(&self) -> bool {
        self.source.is_seekable()
    }

    /// The read failure that ended the input as an
    /// [Io](crate::parser::ParsingErrorKind::Io) error at the current
    /// position, if the source reported one.
    pub fn take_source_error(&mut self) -> Option<ParsingError> {
        let position = self.position();
        self.source
            .take_error()
            .map(|err| ParsingError::from(err).or_at(position))
    }
}

// ============================================================================
// Character access (pub)
// ============================================================================
impl<S: ByteSource> Scanner<S> {
    /// The current character, `None` at end of input.
    #[inline]
    pub fn current(&self) -> Option<u8> {
        self.current
    }

    /// Whether the input is exhausted.
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.current.is_none()
    }

    /// Line and column of the current character.
    pub fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    /// Consumes the current character and returns the next one.
    pub fn advance(&mut self) -> Option<u8> {
        self.current = self.source.next_byte();
        if let Some(byte) = self.current {
            if self.after_newline {
                self.line += 1;
                self.column = 0;
            }
            self.column += 1;
            self.after_newline = byte == b'\n';
        }
        self.current
    }
}

// ============================================================================
// Skipping (pub)
// ============================================================================
impl<S: ByteSource> Scanner<S> {
    /// Consumes a `[...]` comment starting at the current `[`, including
    /// nested comments, and leaves the cursor just past the matching `]`.
    ///
    /// An unterminated comment silently runs to end of input.
    pub fn skip_comment(&mut self) {
        debug_assert_eq!(self.current, Some(b'['));
        let mut depth = 0usize;
        let mut body: Vec<u8> = Vec::new();
        while let Some(byte) = self.current {
            match byte {
                b'[' => depth += 1,
                b']' => depth = depth.saturating_sub(1),
                _ => {}
            }
            if depth == 0 {
                // consume the closing ']'
                self.advance();
                break;
            }
            // Only the outermost comment body is kept, without its '['
            if !(depth == 1 && byte == b'[' && body.is_empty()) {
                body.push(byte);
            }
            self.advance();
        }

        if body.first() == Some(&b'&') {
            self.annotations
                .push(String::from_utf8_lossy(&body).into_owned());
        }
    }

    /// Skips whitespace characters only.
    pub fn skip_whitespace(&mut self) {
        while let Some(byte) = self.current {
            if !is_whitespace(byte) {
                break;
            }
            self.advance();
        }
    }

    /// Skips whitespace and comments until a content character or end of
    /// input.
    pub fn skip_to_significant(&mut self) -> Option<u8> {
        loop {
            self.skip_whitespace();
            match self.current {
                Some(b'[') => self.skip_comment(),
                other => return other,
            }
        }
    }

    /// Returns and clears the `&`-comments recorded since the last call,
    /// e.g. `"&R"` for `[&R]`.
    pub fn take_annotations(&mut self) -> Vec<String> {
        std::mem::take(&mut self.annotations)
    }

    /// Drops annotations recorded so far.
    pub fn clear_annotations(&mut self) {
        self.annotations.clear();
    }
}
