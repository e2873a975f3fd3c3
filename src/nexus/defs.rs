//! Keywords and definitions for NEXUS parsing and writing.
//!
//! Block and command names are recognized on upper-cased tokens and
//! dispatched through the closed [BlockKind] and [Command] enums.

use crate::parser::tokenizer::Token;

pub(crate) const NEXUS_HEADER: &str = "#NEXUS";

pub(crate) const BLOCK_BEGIN: &str = "BEGIN";

pub(crate) const BLOCK_END: &str = "END";

pub(crate) const BLOCK_END_ALT: &str = "ENDBLOCK";

// Block names
pub(crate) const TAXA: &str = "TAXA";

pub(crate) const CHARACTERS: &str = "CHARACTERS";

pub(crate) const DATA: &str = "DATA";

pub(crate) const TREES: &str = "TREES";

// Commands
pub(crate) const DIMENSIONS: &str = "DIMENSIONS";

pub(crate) const TAXLABELS: &str = "TAXLABELS";

pub(crate) const FORMAT: &str = "FORMAT";

pub(crate) const MATRIX: &str = "MATRIX";

pub(crate) const TRANSLATE: &str = "TRANSLATE";

pub(crate) const TREE: &str = "TREE";

// DIMENSIONS & FORMAT keys
pub(crate) const NTAX: &str = "NTAX";

pub(crate) const NCHAR: &str = "NCHAR";

pub(crate) const DATATYPE: &str = "DATATYPE";

pub(crate) const SYMBOLS: &str = "SYMBOLS";

pub(crate) const GAP: &str = "GAP";

pub(crate) const MISSING: &str = "MISSING";

pub(crate) const MATCHCHAR: &str = "MATCHCHAR";

pub(crate) const INTERLEAVE: &str = "INTERLEAVE";

/// Default symbols of STANDARD data without any DATATYPE.
pub(crate) const DEFAULT_STANDARD_SYMBOLS: &str = "012";

/// Default symbols of an explicit `DATATYPE=STANDARD`.
pub(crate) const EXPLICIT_STANDARD_SYMBOLS: &str = "12";

pub(crate) const DEFAULT_GAP: char = '-';

pub(crate) const DEFAULT_MISSING: char = '?';

pub(crate) const DEFAULT_MATCHCHAR: char = '.';

/// NEXUS blocks the reader distinguishes.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum BlockKind {
    Taxa,
    Characters,
    Data,
    Trees,
    Unknown(String),
}

impl BlockKind {
    /// Parse a block name (case-insensitive) into a BlockKind variant
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_uppercase().as_str() {
            TAXA => BlockKind::Taxa,
            CHARACTERS => BlockKind::Characters,
            DATA => BlockKind::Data,
            TREES => BlockKind::Trees,
            _ => BlockKind::Unknown(name.to_string()),
        }
    }

    /// Whether the block holds a character matrix.
    pub fn is_character_block(&self) -> bool {
        matches!(self, BlockKind::Characters | BlockKind::Data)
    }

    pub fn name(&self) -> &str {
        match self {
            BlockKind::Taxa => TAXA,
            BlockKind::Characters => CHARACTERS,
            BlockKind::Data => DATA,
            BlockKind::Trees => TREES,
            BlockKind::Unknown(name) => name,
        }
    }
}

/// Statements inside a block.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Command {
    Dimensions,
    TaxLabels,
    Format,
    Matrix,
    Translate,
    Tree,
    End,
    /// A lone `;`.
    Empty,
    Other(String),
}

impl Command {
    /// Classifies the first token of a statement.
    pub fn from_token(token: &Token) -> Self {
        match token {
            Token::Punct(';') => Command::Empty,
            Token::Word(word) => match word.to_ascii_uppercase().as_str() {
                DIMENSIONS => Command::Dimensions,
                TAXLABELS => Command::TaxLabels,
                FORMAT => Command::Format,
                MATRIX => Command::Matrix,
                TRANSLATE => Command::Translate,
                TREE => Command::Tree,
                BLOCK_END | BLOCK_END_ALT => Command::End,
                _ => Command::Other(word.clone()),
            },
            other => Command::Other(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_names_case_insensitive() {
        assert_eq!(BlockKind::from_name("Trees"), BlockKind::Trees);
        assert_eq!(BlockKind::from_name("data"), BlockKind::Data);
        assert_eq!(BlockKind::from_name("Assumptions"), BlockKind::Unknown("Assumptions".into()));
    }

    #[test]
    fn test_character_blocks() {
        assert!(BlockKind::Characters.is_character_block());
        assert!(BlockKind::Data.is_character_block());
        assert!(!BlockKind::Taxa.is_character_block());
        assert!(!BlockKind::Unknown("CODONS".into()).is_character_block());
    }

    #[test]
    fn test_command_from_token() {
        assert_eq!(Command::from_token(&Token::Word("EndBlock".into())), Command::End);
        assert_eq!(Command::from_token(&Token::Punct(';')), Command::Empty);
        assert_eq!(Command::from_token(&Token::Quoted("tree".into())), Command::Other("tree".into()));
    }
}
