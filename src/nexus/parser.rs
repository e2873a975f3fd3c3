//! NEXUS block parser.
//!
//! [NexusReader] is the configurable entry point returning a [Dataset].
//! Internally, a [NexusParser] walks the document one statement at a
//! time, so that the streaming [TreeIter](crate::reader::TreeIter) can
//! hand out trees as they are read.

use crate::model::{DataType, Dataset, TaxaCollection, Tree, TreesBlock};
use crate::newick::{NewickParser, TranslateTable};
use crate::nexus::defs::{
    BLOCK_BEGIN, BlockKind, Command, DATATYPE, GAP, INTERLEAVE, MATCHCHAR, MISSING, NCHAR,
    NEXUS_HEADER, NTAX, SYMBOLS,
};
use crate::nexus::matrix::{MatrixFormat, MatrixReader};
use crate::parser::byte_source::ByteSource;
use crate::parser::InMemoryByteSource;
use crate::parser::parsing_error::ParsingError;
use crate::parser::tokenizer::{NexusTokenizer, Token};
use tracing::{debug, warn};

// =#========================================================================#=
// NEXUS READER
// =#========================================================================$=
/// Reads NEXUS documents into a [Dataset].
///
/// # Configuration
/// * [`with_dataset(Dataset)`](Self::with_dataset) - read into an existing
///   dataset, sharing its taxa (default: a new, empty one)
/// * [`with_characters(bool)`](Self::with_characters) - read CHARACTERS and
///   DATA blocks (default: `true`)
/// * [`with_trees(bool)`](Self::with_trees) - read TREES blocks (default: `true`)
///
/// # Example
/// ```
/// use phylonex::nexus::NexusReader;
///
/// let nexus = "#NEXUS
/// BEGIN TAXA; DIMENSIONS NTAX=3; TAXLABELS Kiwi Emu Rhea; END;
/// BEGIN TREES; TREE t1 = (Kiwi,(Emu,Rhea)); END;";
///
/// let dataset = NexusReader::new().with_characters(false).read_str(nexus)?;
/// assert_eq!(dataset.taxa().len(), 3);
/// assert_eq!(dataset.trees().count(), 1);
/// # Ok::<(), phylonex::ParsingError>(())
/// ```
#[derive(Debug, Clone)]
pub struct NexusReader {
    dataset: Option<Dataset>,
    include_characters: bool,
    include_trees: bool,
}

impl Default for NexusReader {
    fn default() -> Self {
        Self {
            dataset: None,
            include_characters: true,
            include_trees: true,
        }
    }
}

// ============================================================================
// Construction & Configuration (pub)
// ============================================================================
impl NexusReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads into `dataset`, so taxa are shared with what it already holds.
    pub fn with_dataset(mut self, dataset: Dataset) -> Self {
        self.dataset = Some(dataset);
        self
    }

    /// Whether CHARACTERS/DATA blocks are read or skipped.
    pub fn with_characters(mut self, include: bool) -> Self {
        self.include_characters = include;
        self
    }

    /// Whether TREES blocks are read or skipped.
    pub fn with_trees(mut self, include: bool) -> Self {
        self.include_trees = include;
        self
    }
}

// ============================================================================
// Reading (pub)
// ============================================================================
impl NexusReader {
    /// Reads a whole NEXUS document starting with the `#NEXUS` header.
    ///
    /// # Errors
    /// Returns a [ParsingError] if the header is missing or any statement
    /// is malformed.
    pub fn read<S: ByteSource>(self, source: S) -> Result<Dataset, ParsingError> {
        let mut tokenizer = NexusTokenizer::new(source);
        match tokenizer.next_token_uppercased() {
            Some(Token::Word(word)) if word == NEXUS_HEADER => {}
            other => {
                return Err(tokenizer.syntax_error(format!(
                    "Expecting \"{NEXUS_HEADER}\", but found \"{}\"",
                    other.map(|token| token.to_string()).unwrap_or_default()
                )));
            }
        }
        self.read_after_header(tokenizer)
    }

    /// Reads a NEXUS document held in a string.
    pub fn read_str(self, input: &str) -> Result<Dataset, ParsingError> {
        self.read(InMemoryByteSource::from_str(input))
    }

    /// Reads the blocks of a document whose header was already consumed.
    pub(crate) fn read_after_header<S: ByteSource>(
        self,
        tokenizer: NexusTokenizer<S>,
    ) -> Result<Dataset, ParsingError> {
        let mut parser = NexusParser::new(tokenizer, self.dataset.unwrap_or_default())
            .with_characters(self.include_characters)
            .with_trees(self.include_trees);
        while parser.step()? != Step::Finished {}
        Ok(parser.into_dataset())
    }
}

// =#========================================================================#=
// NEXUS PARSER (state machine)
// =#========================================================================$=
/// Where the parser is in the document.
#[derive(Debug, Clone, PartialEq)]
enum ParserState {
    OutsideBlock,
    InBlock(BlockKind),
    /// Inside a block whose content is discarded
    Skipping(BlockKind),
    Finished,
}

/// Outcome of one [NexusParser::step].
#[derive(Debug, PartialEq)]
pub(crate) enum Step {
    /// A statement or block boundary was processed.
    Continue,
    /// A TREE statement was read while trees are not being collected.
    Tree(Tree),
    Finished,
}

/// Statement-level NEXUS state machine over a tokenizer positioned after
/// the `#NEXUS` header.
pub(crate) struct NexusParser<S: ByteSource> {
    tokenizer: NexusTokenizer<S>,
    dataset: Dataset,
    include_characters: bool,
    include_trees: bool,
    collect_trees: bool,
    state: ParserState,
    /// Set once a TAXLABELS command was read; TRANSLATE targets must then
    /// name known taxa
    taxa_defined: bool,
    // > Block-scoped state
    declared_ntax: usize,
    declared_nchar: usize,
    taxlabels_read: usize,
    format: MatrixFormat,
    translate: TranslateTable,
    trees_block: TreesBlock,
}

// ============================================================================
// Construction & Configuration (crate)
// ============================================================================
impl<S: ByteSource> NexusParser<S> {
    pub(crate) fn new(tokenizer: NexusTokenizer<S>, dataset: Dataset) -> Self {
        Self {
            tokenizer,
            dataset,
            include_characters: true,
            include_trees: true,
            collect_trees: true,
            state: ParserState::OutsideBlock,
            taxa_defined: false,
            declared_ntax: 0,
            declared_nchar: 0,
            taxlabels_read: 0,
            format: MatrixFormat::default(),
            translate: TranslateTable::new(),
            trees_block: TreesBlock::new(),
        }
    }

    pub(crate) fn with_characters(mut self, include: bool) -> Self {
        self.include_characters = include;
        self
    }

    pub(crate) fn with_trees(mut self, include: bool) -> Self {
        self.include_trees = include;
        self
    }

    /// Hands trees out as [Step::Tree] instead of storing them in the dataset.
    pub(crate) fn streaming(mut self) -> Self {
        self.collect_trees = false;
        self
    }

    pub(crate) fn taxa(&self) -> &TaxaCollection {
        self.dataset.taxa()
    }

    pub(crate) fn into_dataset(self) -> Dataset {
        self.dataset
    }
}

// ============================================================================
// Stepping (crate)
// ============================================================================
impl<S: ByteSource> NexusParser<S> {
    /// Processes the next block opening, statement or block end.
    pub(crate) fn step(&mut self) -> Result<Step, ParsingError> {
        match self.state.clone() {
            ParserState::Finished => Ok(Step::Finished),
            ParserState::OutsideBlock => self.enter_next_block(),
            ParserState::InBlock(kind) => self.block_statement(kind),
            ParserState::Skipping(kind) => self.skip_statement(kind),
        }
    }

    /// Skips to the next `BEGIN <name>;` and enters that block.
    fn enter_next_block(&mut self) -> Result<Step, ParsingError> {
        loop {
            match self.tokenizer.next_token_uppercased() {
                None => {
                    self.tokenizer.check_source()?;
                    self.state = ParserState::Finished;
                    return Ok(Step::Finished);
                }
                Some(token) if token.is_keyword(BLOCK_BEGIN) => break,
                Some(_) => {}
            }
        }

        let name = self.tokenizer.require_token("a block name after BEGIN")?;
        let kind = BlockKind::from_name(&name.into_text());
        self.tokenizer.skip_to_semicolon();

        let skip = match &kind {
            BlockKind::Unknown(_) => true,
            BlockKind::Trees => !self.include_trees,
            kind if kind.is_character_block() => !self.include_characters,
            _ => false,
        };
        if skip {
            match &kind {
                BlockKind::Unknown(name) => warn!("Skipping unknown {name} block"),
                _ => debug!("Skipping {} block", kind.name()),
            }
            self.state = ParserState::Skipping(kind);
            return Ok(Step::Continue);
        }

        debug!("Entering {} block", kind.name());
        match &kind {
            BlockKind::Taxa => self.taxlabels_read = 0,
            BlockKind::Trees => {
                self.translate.clear();
                self.trees_block = TreesBlock::new();
            }
            kind if kind.is_character_block() => {
                self.declared_nchar = 0;
                self.format = MatrixFormat::default();
            }
            _ => {}
        }
        self.state = ParserState::InBlock(kind);
        Ok(Step::Continue)
    }

    /// Processes one statement of a recognized block.
    fn block_statement(&mut self, kind: BlockKind) -> Result<Step, ParsingError> {
        let context = format!("{} block", kind.name());
        let token = self.tokenizer.require_token(&context)?;

        match (&kind, Command::from_token(&token)) {
            (_, Command::End) => {
                self.tokenizer.skip_to_semicolon();
                self.finish_block(&kind);
            }
            (_, Command::Empty) => {}
            (BlockKind::Taxa, Command::Dimensions) => self.parse_dimensions()?,
            (BlockKind::Taxa, Command::TaxLabels) => self.parse_taxlabels()?,
            (kind, Command::Dimensions) if kind.is_character_block() => self.parse_dimensions()?,
            (kind, Command::Format) if kind.is_character_block() => self.parse_format()?,
            (kind, Command::Matrix) if kind.is_character_block() => self.parse_matrix()?,
            (BlockKind::Trees, Command::Translate) => self.parse_translate()?,
            (BlockKind::Trees, Command::Tree) => {
                let tree = self.parse_tree_statement()?;
                if !self.collect_trees {
                    return Ok(Step::Tree(tree));
                }
                self.trees_block.push(tree);
            }
            (_, command) => {
                debug!("Skipping {command:?} statement in {context}");
                self.tokenizer.skip_to_semicolon();
            }
        }
        Ok(Step::Continue)
    }

    /// Discards one statement of a skipped block.
    fn skip_statement(&mut self, kind: BlockKind) -> Result<Step, ParsingError> {
        let context = format!("{} block", kind.name());
        let token = self.tokenizer.require_token(&context)?;
        match Command::from_token(&token) {
            Command::End => {
                self.tokenizer.skip_to_semicolon();
                debug!("Skipped {context}");
                self.state = ParserState::OutsideBlock;
            }
            Command::Empty => {}
            _ => self.tokenizer.skip_to_semicolon(),
        }
        Ok(Step::Continue)
    }

    fn finish_block(&mut self, kind: &BlockKind) {
        match kind {
            BlockKind::Taxa if self.declared_ntax != 0 && self.taxlabels_read != self.declared_ntax => {
                warn!(
                    "TAXA block declares NTAX={} but lists {} labels",
                    self.declared_ntax, self.taxlabels_read
                );
            }
            BlockKind::Trees => {
                self.translate.clear();
                let block = std::mem::take(&mut self.trees_block);
                if self.collect_trees {
                    debug!("Read TREES block with {} trees", block.len());
                    self.dataset.add_trees_block(block);
                }
            }
            _ => {}
        }
        debug!("Leaving {} block", kind.name());
        self.state = ParserState::OutsideBlock;
    }
}

// ============================================================================
// Statement parsers (private)
// ============================================================================
impl<S: ByteSource> NexusParser<S> {
    /// `DIMENSIONS [NTAX=n] [NCHAR=n];`
    fn parse_dimensions(&mut self) -> Result<(), ParsingError> {
        loop {
            let token = self.tokenizer.require_token_uppercased("DIMENSIONS")?;
            if token.is_punct(';') {
                return Ok(());
            }
            if token.is_keyword(NTAX) {
                self.declared_ntax = self.read_count(NTAX)?;
            } else if token.is_keyword(NCHAR) {
                self.declared_nchar = self.read_count(NCHAR)?;
            }
        }
    }

    /// Reads `= <number>` after a DIMENSIONS keyword.
    fn read_count(&mut self, keyword: &str) -> Result<usize, ParsingError> {
        self.expect_equals(keyword)?;
        let value = self.tokenizer.require_token(keyword)?;
        value
            .to_string()
            .parse::<usize>()
            .map_err(|_| self.tokenizer.syntax_error(format!("Expecting numeric value for {keyword}")))
    }

    fn expect_equals(&mut self, keyword: &str) -> Result<(), ParsingError> {
        let token = self.tokenizer.require_token(keyword)?;
        if token.is_punct('=') {
            Ok(())
        } else {
            Err(self
                .tokenizer
                .syntax_error(format!("Expecting \"=\" after {keyword} keyword")))
        }
    }

    /// `TAXLABELS label ...;`
    fn parse_taxlabels(&mut self) -> Result<(), ParsingError> {
        let taxa = self.dataset.taxa_mut();
        loop {
            let token = self.tokenizer.require_token("TAXLABELS")?;
            if token.is_punct(';') {
                break;
            }
            taxa.lookup_or_insert(&token.into_label());
            self.taxlabels_read += 1;
        }
        self.taxa_defined = true;
        debug!("Read {} taxon labels", self.taxlabels_read);
        Ok(())
    }

    /// `FORMAT` with `DATATYPE`, `SYMBOLS`, `GAP`, `MISSING`, `MATCHCHAR`
    /// and `INTERLEAVE` in any order; other keys are ignored.
    fn parse_format(&mut self) -> Result<(), ParsingError> {
        let mut token = self.tokenizer.require_token_uppercased("FORMAT")?;
        while !token.is_punct(';') {
            let mut lookahead = None;
            match &token {
                Token::Word(key) if key == DATATYPE => {
                    self.expect_equals(DATATYPE)?;
                    let value = self.tokenizer.require_token(DATATYPE)?;
                    self.format.set_data_type(DataType::from_name(&value.into_text()));
                }
                Token::Word(key) if key == SYMBOLS => {
                    self.expect_equals(SYMBOLS)?;
                    let symbols = self.read_symbols()?;
                    self.format.set_symbols(&symbols);
                }
                Token::Word(key) if key == GAP => self.format.gap = self.read_format_char(GAP)?,
                Token::Word(key) if key == MISSING => {
                    self.format.missing = self.read_format_char(MISSING)?;
                }
                Token::Word(key) if key == MATCHCHAR => {
                    self.format.match_char = self.read_format_char(MATCHCHAR)?;
                }
                Token::Word(key) if key == INTERLEAVE => {
                    let next = self.tokenizer.require_token_uppercased(INTERLEAVE)?;
                    if next.is_punct('=') {
                        let value = self.tokenizer.require_token_uppercased(INTERLEAVE)?;
                        self.format.interleave = !value.to_string().starts_with('N');
                    } else {
                        self.format.interleave = true;
                        lookahead = Some(next);
                    }
                }
                _ => {}
            }
            token = match lookahead {
                Some(next) => next,
                None => self.tokenizer.require_token_uppercased("FORMAT")?,
            };
        }

        if self.format.data_type().is_molecular() && self.format.symbols().is_some() {
            warn!(
                "SYMBOLS ignored for DATATYPE={}",
                self.format.data_type().keyword()
            );
        }
        Ok(())
    }

    /// Symbol list after `SYMBOLS=`: `"..."` (or a single word).
    fn read_symbols(&mut self) -> Result<String, ParsingError> {
        match self.tokenizer.require_token(SYMBOLS)? {
            Token::Punct('"') => {
                let mut symbols = String::new();
                loop {
                    let token = self.tokenizer.require_token(SYMBOLS)?;
                    if token.is_punct('"') {
                        return Ok(symbols);
                    }
                    symbols.push_str(&token.into_text());
                }
            }
            Token::Word(symbols) | Token::Quoted(symbols) => Ok(symbols),
            Token::Punct(_) => Err(self
                .tokenizer
                .syntax_error("Expecting '\"' before beginning SYMBOLS list")),
        }
    }

    /// Single character after `GAP=`, `MISSING=` or `MATCHCHAR=`.
    fn read_format_char(&mut self, keyword: &str) -> Result<char, ParsingError> {
        self.expect_equals(keyword)?;
        let text = self.tokenizer.require_token(keyword)?.into_text();
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(symbol), None) => Ok(symbol),
            _ => Err(self.tokenizer.syntax_error(format!(
                "Expecting a single character for {keyword} but found \"{text}\""
            ))),
        }
    }

    /// `MATRIX` rows until `;`.
    fn parse_matrix(&mut self) -> Result<(), ParsingError> {
        if self.declared_ntax == 0 {
            return Err(self.tokenizer.syntax_error(
                "NTAX must be defined by DIMENSIONS command to non-zero value before MATRIX command",
            ));
        }
        if self.declared_nchar == 0 {
            return Err(self.tokenizer.syntax_error(
                "NCHAR must be defined by DIMENSIONS command to non-zero value before MATRIX command",
            ));
        }

        let reader = MatrixReader::new(&self.format, self.declared_ntax, self.declared_nchar);
        let matrix = reader.read(&mut self.tokenizer, self.dataset.taxa_mut())?;
        self.dataset.add_char_matrix(matrix);
        Ok(())
    }

    /// `TRANSLATE key [=] label {, key [=] label};`
    fn parse_translate(&mut self) -> Result<(), ParsingError> {
        let strict = self.taxa_defined;
        loop {
            let key = self.tokenizer.require_token("TRANSLATE")?;
            if key.is_punct(';') {
                break;
            }
            let mut label = self.tokenizer.require_token("TRANSLATE")?;
            if label.is_punct('=') {
                label = self.tokenizer.require_token("TRANSLATE")?;
            }
            let separator = self.tokenizer.require_token("TRANSLATE")?;
            if !separator.is_punct(',') && !separator.is_punct(';') {
                return Err(self.tokenizer.syntax_error(format!(
                    "Expecting \",\" in TRANSLATE statement after definition for {key} = \"{label}\", but found \"{separator}\" instead"
                )));
            }

            let label = label.into_label();
            let taxa = self.dataset.taxa_mut();
            let taxon = if strict {
                taxa.lookup_strict(&label).ok_or_else(|| {
                    ParsingError::unresolved_taxon(&label, Some(self.tokenizer.position()))
                })?
            } else {
                taxa.lookup_or_insert(&label)
            };
            self.translate.insert(key.into_label(), taxon);

            if separator.is_punct(';') {
                break;
            }
        }
        debug!("Read TRANSLATE table with {} entries", self.translate.len());
        Ok(())
    }

    /// `TREE [*] name = [&R|&U] newick;`
    fn parse_tree_statement(&mut self) -> Result<Tree, ParsingError> {
        let mut name = self.tokenizer.require_token("TREE")?;
        if name.is_punct('*') {
            name = self.tokenizer.require_token("TREE")?;
        }
        let name = name.into_label();
        let context = format!("definition of Tree \"{name}\"");

        let equals = self.tokenizer.require_token(&context)?;
        if !equals.is_punct('=') {
            return Err(self.tokenizer.syntax_error(format!(
                "Expecting \"=\" in definition of Tree \"{name}\" but found \"{equals}\""
            )));
        }

        let mut parser = NewickParser::new(self.dataset.taxa_mut());
        if !self.translate.is_empty() {
            parser = parser.with_translate_table(&self.translate);
        }
        let mut tree = parser
            .parse_tree(&mut self.tokenizer)?
            .ok_or_else(|| self.tokenizer.eof_error(&context))?;
        tree.set_label(Some(name));
        Ok(tree)
    }
}

// =#========================================================================#=
// TESTS - NEXUS PARSER
// =#========================================================================$=
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_header() {
        let err = NexusReader::new().read_str("BEGIN TAXA; END;").unwrap_err();
        assert!(err.to_string().contains("#NEXUS"));
    }

    #[test]
    fn test_unknown_block_is_skipped() {
        let dataset = NexusReader::new()
            .read_str("#NEXUS\nBEGIN ASSUMPTIONS; TYPESET * x = unord: 1-3; END;\nBEGIN TREES; TREE a = (A,B); END;")
            .unwrap();
        assert_eq!(dataset.trees().count(), 1);
    }

    #[test]
    fn test_format_interleave_lookahead() {
        // FORMAT keyword already consumed, the statement starts at INTERLEAVE
        let tokenizer = NexusTokenizer::new(InMemoryByteSource::from_str(
            "INTERLEAVE DATATYPE=DNA MISSING=N;",
        ));
        let mut parser = NexusParser::new(tokenizer, Dataset::new());
        parser.parse_format().unwrap();
        assert!(parser.format.interleave);
        assert_eq!(parser.format.data_type(), DataType::Dna);
        assert_eq!(parser.format.missing, 'N');
    }

    #[test]
    fn test_step_yields_trees_when_streaming() {
        let tokenizer = NexusTokenizer::new(InMemoryByteSource::from_str(
            "BEGIN TREES; TREE a = (A,B); TREE b = (B,A); END;",
        ));
        let mut parser = NexusParser::new(tokenizer, Dataset::new()).streaming();
        let mut names = Vec::new();
        loop {
            match parser.step().unwrap() {
                Step::Tree(tree) => names.push(tree.label().map(str::to_string)),
                Step::Continue => {}
                Step::Finished => break,
            }
        }
        assert_eq!(names, vec![Some("a".to_string()), Some("b".to_string())]);
        assert!(parser.into_dataset().trees_blocks().is_empty());
    }
}
