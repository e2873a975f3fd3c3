//! Newick format parser and writer for phylogenetic trees.
//!
//! This module provides [`NewickParser`] to parse Newick tree statements
//! into [Tree]s and [`NewickWriter`] to write them back. The parser is used
//! directly for bare Newick text and by the NEXUS parser for `TREE`
//! statements.
//!
//! # Quick API
//! * [`parse_str`] - parses a single tree, returns it with its [TaxaCollection]
//! * [`parse_all_str`] - parses all trees of a string
//!
//! # Full API
//! For more control, create a [`NexusTokenizer`] over any
//! [ByteSource](crate::parser::ByteSource) and use:
//! * [`NewickParser::parse_tree`] - parse a single tree
//! * [`NewickIterator`] - parse trees lazily until the input ends
//!
//! # Format
//! The Newick format has the following simple grammar:
//! * `tree ::= node ';'`
//! * `node ::= [clade] [label] [':' length]`
//! * `clade ::= '(' node {',' node} ')'`
//!
//! Furthermore:
//! * Whitespace and comments (`[...]`, nestable) can occur between tokens
//! * Unquoted labels have underscores replaced by spaces; quoted labels
//!   (`'...'`, with `''` for a literal quote) are kept verbatim
//! * A label after a clade labels the clade's node (e.g. a support value)
//! * Lengths that are not numbers are kept as literal text
//! * A `[&R]`/`[&U]` comment before a tree marks it rooted/unrooted

mod parser;
pub mod writer;

pub use self::parser::{NewickIterator, NewickParser, TranslateTable};
pub use self::writer::{NewickWriter, split_to_newick};

use crate::model::{TaxaCollection, Tree};
use crate::parser::{InMemoryByteSource, NexusTokenizer, ParsingError};

// ============================================================================
// QUICK PARSING API (pub)
// ============================================================================
/// Parses the first tree of a Newick string.
///
/// # Errors
/// Returns a [ParsingError] if the string holds no tree or is malformed.
///
/// # Example
/// ```
/// let (tree, taxa) = phylonex::newick::parse_str("(A,(B,C));")?;
/// assert_eq!(tree.num_leaves(), 3);
/// assert_eq!(taxa.labels().collect::<Vec<_>>(), vec!["A", "B", "C"]);
/// # Ok::<(), phylonex::ParsingError>(())
/// ```
pub fn parse_str(input: &str) -> Result<(Tree, TaxaCollection), ParsingError> {
    let mut tokenizer = NexusTokenizer::new(InMemoryByteSource::from_str(input));
    let mut taxa = TaxaCollection::new();
    let tree = NewickParser::new(&mut taxa)
        .parse_tree(&mut tokenizer)?
        .ok_or_else(|| tokenizer.eof_error("a Newick tree"))?;
    Ok((tree, taxa))
}

/// Parses all trees of a string of `;`-terminated Newick statements.
pub fn parse_all_str(input: &str) -> Result<(Vec<Tree>, TaxaCollection), ParsingError> {
    let tokenizer = NexusTokenizer::new(InMemoryByteSource::from_str(input));
    let mut iter = NewickIterator::new(tokenizer, TaxaCollection::new());
    let trees = iter.by_ref().collect::<Result<Vec<_>, _>>()?;
    Ok((trees, iter.into_taxa()))
}
