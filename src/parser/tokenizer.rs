//! Stream tokenizer on top of the [Scanner].
//!
//! Produces [Token]s on demand: single punctuation characters, unquoted
//! words, and quoted labels. Comments and whitespace between tokens are
//! skipped transparently.

use crate::parser::byte_source::ByteSource;
use crate::parser::parsing_error::{ParsingError, Position};
use crate::parser::scanner::{Scanner, is_punctuation, is_whitespace};
use std::fmt;
use std::io;

// =#========================================================================#=
// TOKEN
// =#========================================================================€=
/// A lexical token of NEXUS/Newick text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A single character of the punctuation alphabet
    Punct(char),
    /// An unquoted run of characters
    Word(String),
    /// Content of a `'...'` label, with `''` already unescaped
    Quoted(String),
}

impl Token {
    /// Whether this is the punctuation character `c`.
    #[inline]
    pub fn is_punct(&self, c: char) -> bool {
        matches!(self, Token::Punct(p) if *p == c)
    }

    /// Whether this is an unquoted word equal to `keyword`, ignoring ASCII case.
    pub fn is_keyword(&self, keyword: &str) -> bool {
        matches!(self, Token::Word(w) if w.eq_ignore_ascii_case(keyword))
    }

    /// Whether this token came from a quoted label.
    pub fn is_quoted(&self) -> bool {
        matches!(self, Token::Quoted(_))
    }

    /// Converts the token into a taxon or node label.
    ///
    /// Underscores of unquoted words become spaces; quoted labels are
    /// kept verbatim.
    pub fn into_label(self) -> String {
        match self {
            Token::Word(word) => {
                if word.contains('_') {
                    word.replace('_', " ")
                } else {
                    word
                }
            }
            Token::Quoted(label) => label,
            Token::Punct(c) => c.to_string(),
        }
    }

    /// Raw token text, without any label processing.
    pub fn into_text(self) -> String {
        match self {
            Token::Word(text) | Token::Quoted(text) => text,
            Token::Punct(c) => c.to_string(),
        }
    }

    fn uppercased(self) -> Self {
        match self {
            Token::Word(w) => Token::Word(w.to_uppercase()),
            Token::Quoted(q) => Token::Quoted(q.to_uppercase()),
            punct => punct,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Punct(c) => write!(f, "{c}"),
            Token::Word(text) | Token::Quoted(text) => f.write_str(text),
        }
    }
}

// =#========================================================================#=
// NEXUS TOKENIZER
// =#========================================================================$=
/// Pull-based tokenizer over one exclusively held [ByteSource].
///
/// Besides handing out tokens, it remembers the last token read
/// ([current_token](Self::current_token)) and exposes the current raw
/// character ([current_char](Self::current_char)) for parsers that
/// continue character by character after a token, e.g. interleaved
/// matrix rows.
pub struct NexusTokenizer<S: ByteSource> {
    scanner: Scanner<S>,
    current_token: Option<Token>,
}

// ============================================================================
// Construction & State (pub)
// ============================================================================
impl<S: ByteSource> NexusTokenizer<S> {
    pub fn new(source: S) -> Self {
        Self {
            scanner: Scanner::new(source),
            current_token: None,
        }
    }

    /// The token returned by the last `next_token*` call.
    pub fn current_token(&self) -> Option<&Token> {
        self.current_token.as_ref()
    }

    /// The character right after the last token (not yet consumed).
    pub fn current_char(&self) -> Option<u8> {
        self.scanner.current()
    }

    /// Whether the input is exhausted.
    pub fn is_eof(&self) -> bool {
        self.scanner.is_eof()
    }

    /// Line and column of the current character.
    pub fn position(&self) -> Position {
        self.scanner.position()
    }

    /// Direct character access, e.g. for row-wise matrix reading.
    pub(crate) fn scanner_mut(&mut self) -> &mut Scanner<S> {
        &mut self.scanner
    }

    /// Skips whitespace and comments without reading a token.
    pub fn skip_to_significant(&mut self) -> Option<u8> {
        self.scanner.skip_to_significant()
    }

    /// Returns `&`-comments recorded since the last call (see [Scanner::take_annotations]).
    pub fn take_annotations(&mut self) -> Vec<String> {
        self.scanner.take_annotations()
    }

    /// Rewinds the underlying source to its first byte.
    pub fn rewind(&mut self) -> io::Result<()> {
        self.scanner.rewind()?;
        self.current_token = None;
        Ok(())
    }

    /// Whether the underlying source supports [rewind](Self::rewind).
    pub fn is_seekable(&self) -> bool {
        self.scanner.is_seekable()
    }
}

// ============================================================================
// Token Reading (pub)
// ============================================================================
impl<S: ByteSource> NexusTokenizer<S> {
    /// Reads the next token, `None` at end of input.
    pub fn next_token(&mut self) -> Option<Token> {
        self.next_token_ignoring(&[])
    }

    /// Reads the next token, treating the characters in `ignored` as
    /// ordinary word characters instead of punctuation.
    ///
    /// # Example
    /// ```
    /// use phylonex::parser::{InMemoryByteSource, NexusTokenizer, Token};
    ///
    /// let mut tokenizer = NexusTokenizer::new(InMemoryByteSource::from_str(":-1.5e+2"));
    /// assert_eq!(tokenizer.next_token(), Some(Token::Punct(':')));
    /// assert_eq!(tokenizer.next_token_ignoring(b"-+"), Some(Token::Word("-1.5e+2".into())));
    /// ```
    pub fn next_token_ignoring(&mut self, ignored: &[u8]) -> Option<Token> {
        let token = match self.scanner.skip_to_significant() {
            None => None,
            Some(b'\'') => Some(self.read_quoted()),
            Some(byte) if is_punctuation(byte) && !ignored.contains(&byte) => {
                self.scanner.advance();
                Some(Token::Punct(byte as char))
            }
            Some(_) => Some(self.read_word(ignored)),
        };
        self.current_token = token.clone();
        token
    }

    /// Reads the next token and upper-cases words and quoted labels,
    /// for matching case-insensitive NEXUS keywords.
    pub fn next_token_uppercased(&mut self) -> Option<Token> {
        let token = self.next_token()?.uppercased();
        self.current_token = Some(token.clone());
        Some(token)
    }

    /// Reads the next token; end of input is an error naming `context`.
    pub fn require_token(&mut self, context: &str) -> Result<Token, ParsingError> {
        self.next_token()
            .ok_or_else(|| self.eof_error(context))
    }

    /// Upper-casing variant of [require_token](Self::require_token).
    pub fn require_token_uppercased(&mut self, context: &str) -> Result<Token, ParsingError> {
        self.next_token_uppercased()
            .ok_or_else(|| self.eof_error(context))
    }

    /// Discards tokens up to and including the next `;` (or end of input).
    pub fn skip_to_semicolon(&mut self) {
        while let Some(token) = self.next_token() {
            if token.is_punct(';') {
                break;
            }
        }
    }

    /// Builds an [UnexpectedEof](crate::parser::ParsingErrorKind::UnexpectedEof)
    /// at the current position, or an [Io](crate::parser::ParsingErrorKind::Io)
    /// error if a failed read ended the input.
    pub fn eof_error(&mut self, context: &str) -> ParsingError {
        match self.scanner.take_source_error() {
            Some(err) => err,
            None => ParsingError::unexpected_eof(
                format!("input ended while reading {context}"),
                self.position(),
            ),
        }
    }

    /// Fails if the input ended because of a read failure rather than at
    /// its true end.
    pub fn check_source(&mut self) -> Result<(), ParsingError> {
        match self.scanner.take_source_error() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Builds a [Syntax](crate::parser::ParsingErrorKind::Syntax) error at
    /// the current position.
    pub fn syntax_error(&self, message: impl Into<String>) -> ParsingError {
        ParsingError::syntax(message, self.position())
    }
}

// ============================================================================
// Helpers (private)
// ============================================================================
impl<S: ByteSource> NexusTokenizer<S> {
    /// Reads a quoted label; the cursor is on the opening `'`.
    fn read_quoted(&mut self) -> Token {
        let mut bytes = Vec::new();
        self.scanner.advance();
        while let Some(byte) = self.scanner.current() {
            self.scanner.advance();
            if byte == b'\'' {
                if self.scanner.current() == Some(b'\'') {
                    bytes.push(b'\'');
                    self.scanner.advance();
                } else {
                    break;
                }
            } else {
                bytes.push(byte);
            }
        }
        Token::Quoted(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Reads a word up to whitespace, (non-ignored) punctuation, or end of input.
    fn read_word(&mut self, ignored: &[u8]) -> Token {
        let mut bytes = Vec::new();
        while let Some(byte) = self.scanner.current() {
            if is_whitespace(byte) || (is_punctuation(byte) && !ignored.contains(&byte)) {
                break;
            }
            bytes.push(byte);
            self.scanner.advance();
        }
        Token::Word(String::from_utf8_lossy(&bytes).into_owned())
    }
}
