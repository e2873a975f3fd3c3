//! Structs and logic to parse Newick strings.
//!
//! This module provides the [NewickParser] struct, which parses one tree
//! statement from a [NexusTokenizer], as well as lazy parsing of all trees
//! of a source via a [NewickIterator].

use crate::model::{EdgeLength, Node, TaxaCollection, TaxonId, Tree};
use crate::parser::byte_source::ByteSource;
use crate::parser::parsing_error::ParsingError;
use crate::parser::tokenizer::{NexusTokenizer, Token};
use std::collections::HashMap;

/// Characters kept inside an edge length token (`-1.5`, `2e+3`).
const EDGE_LENGTH_CHARS: &[u8] = b"-+";

/// Maps short tokens used in TREE statements to taxa, built by a
/// `TRANSLATE` command and scoped to one TREES block.
pub type TranslateTable = HashMap<String, TaxonId>;

// =#========================================================================#=
// NEWICK PARSER
// =#========================================================================$=
/// Recursive-descent parser for single Newick tree statements.
///
/// Leaf labels are resolved against the borrowed [TaxaCollection] once a
/// statement is complete: through the [TranslateTable] if one is set and
/// contains the raw label, by get-or-create lookup otherwise.
///
/// # Example
/// ```
/// use phylonex::model::TaxaCollection;
/// use phylonex::newick::NewickParser;
/// use phylonex::parser::{InMemoryByteSource, NexusTokenizer};
///
/// let input = "((Apteryx_haastii:1.0,Apteryx_owenii:1.0):0.5,Apteryx_australis:1.5);";
/// let mut tokenizer = NexusTokenizer::new(InMemoryByteSource::from_str(input));
/// let mut taxa = TaxaCollection::new();
///
/// let tree = NewickParser::new(&mut taxa).parse_tree(&mut tokenizer)?.unwrap();
/// assert_eq!(tree.num_leaves(), 3);
/// assert!(taxa.contains_label("Apteryx owenii"));
/// # Ok::<(), phylonex::ParsingError>(())
/// ```
pub struct NewickParser<'a> {
    taxa: &'a mut TaxaCollection,
    translate: Option<&'a TranslateTable>,
}

// ============================================================================
// Construction & Configuration (pub)
// ============================================================================
impl<'a> NewickParser<'a> {
    /// Creates a parser resolving leaves against `taxa`.
    pub fn new(taxa: &'a mut TaxaCollection) -> Self {
        Self {
            taxa,
            translate: None,
        }
    }

    /// Resolves leaf labels through `table` first.
    pub fn with_translate_table(mut self, table: &'a TranslateTable) -> Self {
        self.translate = Some(table);
        self
    }
}

// ============================================================================
// Parsing (pub)
// ============================================================================
impl NewickParser<'_> {
    /// Parses the next tree statement, including its closing `;`.
    ///
    /// A `[&R]` or `[&U]` comment directly before the statement sets the
    /// rootedness of the tree.
    ///
    /// # Returns
    /// * `Ok(Some(Tree))` - The parsed tree
    /// * `Ok(None)` - If the input holds no further token
    /// * `Err(ParsingError)` - If the statement is malformed
    pub fn parse_tree<S: ByteSource>(
        &mut self,
        tokenizer: &mut NexusTokenizer<S>,
    ) -> Result<Option<Tree>, ParsingError> {
        tokenizer.take_annotations();
        tokenizer.skip_to_significant();
        let rooting = rooting_from_annotations(&tokenizer.take_annotations());

        let Some(first) = tokenizer.next_token() else {
            tokenizer.check_source()?;
            return Ok(None);
        };
        let mut tree = self.parse_tree_from(tokenizer, first)?;
        tree.set_rooted(rooting.unwrap_or(false));
        Ok(Some(tree))
    }

    /// Parses a tree statement whose first token was already read.
    ///
    /// A single parenthesized clade (`(A,B)x;`) becomes the seed node
    /// itself. Otherwise, top-level subtrees (`A,B;` or `A;`) are
    /// attached as children of a new, unlabeled seed node.
    pub fn parse_tree_from<S: ByteSource>(
        &mut self,
        tokenizer: &mut NexusTokenizer<S>,
        first: Token,
    ) -> Result<Tree, ParsingError> {
        let parenthesized = first.is_punct('(');
        let (node, mut end) = parse_node(tokenizer, Some(first))?;
        let mut subtrees = vec![node];
        while end.as_ref().is_some_and(|token| token.is_punct(',')) {
            let next = tokenizer.next_token();
            let (node, next_end) = parse_node(tokenizer, next)?;
            subtrees.push(node);
            end = next_end;
        }
        match end {
            None => {}
            Some(token) if token.is_punct(';') => {}
            Some(token) => {
                return Err(tokenizer.syntax_error(format!(
                    "Expecting \";\" at end of tree statement but found \"{token}\""
                )));
            }
        }

        let mut seed = match (parenthesized, subtrees.len()) {
            (true, 1) => subtrees.swap_remove(0),
            _ => Node::with_children(subtrees),
        };

        let taxa = &mut *self.taxa;
        let translate = self.translate;
        seed.resolve_leaf_taxa(|label| {
            Ok::<_, ParsingError>(match translate.and_then(|table| table.get(label)) {
                Some(&id) => id,
                None => taxa.lookup_or_insert(label),
            })
        })?;

        let tree = Tree::new(seed);
        tracing::trace!("Parsed tree with {} leaves", tree.num_leaves());
        Ok(tree)
    }
}

// ============================================================================
// Parsing helpers (private)
// ============================================================================
/// Parses one node starting at `token`, including its clade, label and
/// edge length.
///
/// # Returns
/// The node and the token that ended it (`)`, `,` or `;`), or `None` if
/// the input ended.
fn parse_node<S: ByteSource>(
    tokenizer: &mut NexusTokenizer<S>,
    mut token: Option<Token>,
) -> Result<(Node, Option<Token>), ParsingError> {
    let mut node = Node::new();

    // > Clade: '(' child {',' child} ')'
    if token.as_ref().is_some_and(|t| t.is_punct('(')) {
        loop {
            let next = tokenizer.next_token();
            let (child, end) = parse_node(tokenizer, next)?;
            node.add_child(child);
            match end {
                Some(Token::Punct(',')) => continue,
                Some(Token::Punct(')')) => break,
                Some(other) => {
                    return Err(tokenizer.syntax_error(format!(
                        "Expecting \",\" or \")\" in clade but found \"{other}\""
                    )));
                }
                None => return Err(tokenizer.eof_error("a clade")),
            }
        }
        token = tokenizer.next_token();
    }

    // > Label and edge length, until ')', ',' or ';'
    let mut label: Option<String> = None;
    loop {
        let Some(current) = token else {
            node.set_label(label);
            return Ok((node, None));
        };
        match current {
            Token::Punct(')' | ',' | ';') => {
                node.set_label(label);
                return Ok((node, Some(current)));
            }
            Token::Punct(':') => match tokenizer.next_token_ignoring(EDGE_LENGTH_CHARS) {
                None => return Err(tokenizer.eof_error("an edge length")),
                Some(Token::Punct(c)) => {
                    // ':' without a length
                    token = Some(Token::Punct(c));
                    continue;
                }
                Some(text) => node.edge_mut().length = EdgeLength::parse(&text.into_text()),
            },
            Token::Punct('(') => {
                return Err(tokenizer.syntax_error(format!(
                    "Unexpected \"(\" after node label \"{}\"",
                    label.unwrap_or_default()
                )));
            }
            Token::Punct(_) => {}
            word => {
                let part = word.into_label();
                match label.as_mut() {
                    Some(existing) => existing.push_str(&part),
                    None => label = Some(part),
                }
            }
        }
        token = tokenizer.next_token();
    }
}

/// Rootedness from `&R` / `&U` command comments; the last one wins.
fn rooting_from_annotations(annotations: &[String]) -> Option<bool> {
    annotations
        .iter()
        .rev()
        .find_map(|annotation| match annotation.trim().to_ascii_uppercase().as_str() {
            "&R" => Some(true),
            "&U" => Some(false),
            _ => None,
        })
}

// =#========================================================================#=
// NEWICK ITERATOR
// =#========================================================================$=
/// Iterator to lazily parse Newick trees until the input ends.
///
/// Owns its tokenizer and the [TaxaCollection] leaves are resolved
/// against; stops after the first error.
pub struct NewickIterator<S: ByteSource> {
    tokenizer: NexusTokenizer<S>,
    taxa: TaxaCollection,
    failed: bool,
}

impl<S: ByteSource> NewickIterator<S> {
    /// Creates an iterator resolving leaves against (and extending) `taxa`.
    pub fn new(tokenizer: NexusTokenizer<S>, taxa: TaxaCollection) -> Self {
        Self {
            tokenizer,
            taxa,
            failed: false,
        }
    }

    /// Taxa collected so far.
    pub fn taxa(&self) -> &TaxaCollection {
        &self.taxa
    }

    /// Consumes the iterator, returning the taxa collected.
    pub fn into_taxa(self) -> TaxaCollection {
        self.taxa
    }
}

impl<S: ByteSource> Iterator for NewickIterator<S> {
    type Item = Result<Tree, ParsingError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match NewickParser::new(&mut self.taxa).parse_tree(&mut self.tokenizer) {
            Ok(tree) => tree.map(Ok),
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}
