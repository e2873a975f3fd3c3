//! Format detection and dataset/tree reading for NEXUS and Newick sources.
//!
//! [read_dataset] looks at the first token of a source: `#NEXUS` starts a
//! NEXUS document, anything else is read as a list of Newick trees after
//! rewinding the source. [TreeIter] does the same but hands out one tree
//! at a time.

use crate::model::{Dataset, TaxaCollection, Tree, TreesBlock};
use crate::newick::NewickIterator;
use crate::nexus::defs::NEXUS_HEADER;
use crate::nexus::{NexusParser, NexusReader, Step};
use crate::parser::{
    BufferedByteSource, ByteSource, InMemoryByteSource, NexusTokenizer, ParsingError, Token,
};
use std::fs::File;
use std::io;
use std::path::Path;

/// File size (in bytes) from which [ReadStrategy::Automatic] buffers
/// instead of loading the file into memory.
const AUTO_IN_MEMORY_THRESHOLD: u64 = 100 * 1024 * 1024; // 100 MB

// =#========================================================================#=
// READ STRATEGY
// =#========================================================================$=
/// Controls how a file is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadStrategy {
    /// Read the file in chunks through a buffered I/O reader.
    Buffered,

    /// Load the entire file into a contiguous byte buffer before parsing.
    InMemory,

    /// Automatically choose between [ReadStrategy::Buffered] and
    /// [ReadStrategy::InMemory] based on file size.
    /// This is the default.
    #[default]
    Automatic,
}

impl ReadStrategy {
    /// Opens `path` as a byte source according to this strategy.
    ///
    /// # Errors
    /// Returns an I/O error if the file cannot be opened or read.
    pub fn open<P: AsRef<Path>>(self, path: P) -> io::Result<FileByteSource> {
        let path = path.as_ref();
        let use_buffered = match self {
            ReadStrategy::Buffered => true,
            ReadStrategy::InMemory => false,
            ReadStrategy::Automatic => {
                let file_size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
                file_size >= AUTO_IN_MEMORY_THRESHOLD
            }
        };

        if use_buffered {
            Ok(FileByteSource::Buffered(BufferedByteSource::from_file(path)?))
        } else {
            Ok(FileByteSource::InMemory(InMemoryByteSource::from_file(path)?))
        }
    }
}

/// A file opened with a [ReadStrategy].
pub enum FileByteSource {
    InMemory(InMemoryByteSource),
    Buffered(BufferedByteSource<File>),
}

/// Delegates a [ByteSource] method to the variant's source.
macro_rules! delegate {
    ($self:ident, $source:ident => $call:expr) => {
        match $self {
            FileByteSource::InMemory($source) => $call,
            FileByteSource::Buffered($source) => $call,
        }
    };
}

impl ByteSource for FileByteSource {
    fn next_byte(&mut self) -> Option<u8> {
        delegate!(self, source => source.next_byte())
    }

    fn position(&self) -> usize {
        delegate!(self, source => source.position())
    }

    fn is_seekable(&self) -> bool {
        delegate!(self, source => source.is_seekable())
    }

    fn rewind(&mut self) -> io::Result<()> {
        delegate!(self, source => source.rewind())
    }
}

// =#========================================================================#=
// DATASET READING
// =#========================================================================$=
/// Reads a NEXUS document or a list of Newick trees from `source`.
///
/// Trees of a Newick source end up in a single [TreesBlock]. If `dataset`
/// is given, everything is read into it and its taxa are shared.
///
/// # Errors
/// * [SourceNotSeekable](crate::parser::ParsingErrorKind::SourceNotSeekable)
///   if the source is not NEXUS and cannot be rewound for Newick reading
/// * any [ParsingError] of the NEXUS or Newick parsers
pub fn read_dataset<S: ByteSource>(
    source: S,
    dataset: Option<Dataset>,
) -> Result<Dataset, ParsingError> {
    let mut tokenizer = NexusTokenizer::new(source);
    if starts_with_nexus_header(&mut tokenizer) {
        let reader = match dataset {
            Some(dataset) => NexusReader::new().with_dataset(dataset),
            None => NexusReader::new(),
        };
        return reader.read_after_header(tokenizer);
    }

    tokenizer.check_source()?;
    rewind(&mut tokenizer)?;
    let mut dataset = dataset.unwrap_or_default();
    let taxa = std::mem::take(dataset.taxa_mut());
    let mut trees = NewickIterator::new(tokenizer, taxa);
    let block: TreesBlock = trees.by_ref().collect::<Result<Vec<_>, _>>()?.into();
    tracing::debug!("Read {} Newick trees", block.len());

    *dataset.taxa_mut() = trees.into_taxa();
    dataset.add_trees_block(block);
    Ok(dataset)
}

/// Reads a NEXUS or Newick string into a new [Dataset].
///
/// # Example
/// ```
/// let dataset = phylonex::reader::read_dataset_str("(A,B);\n(B,C);")?;
/// assert_eq!(dataset.trees().count(), 2);
/// assert_eq!(dataset.taxa().len(), 3);
/// # Ok::<(), phylonex::ParsingError>(())
/// ```
pub fn read_dataset_str(input: &str) -> Result<Dataset, ParsingError> {
    read_dataset(InMemoryByteSource::from_str(input), None)
}

/// Reads a NEXUS or Newick file into a new [Dataset].
///
/// # Arguments
/// * `path` - Path to the file (accepting `&str`, `String`, `Path`, or `PathBuf`)
/// * `strategy` - How the file is read, see [ReadStrategy]
///
/// # Errors
/// Returns an error if the file cannot be opened or parsed.
pub fn read_dataset_file<P: AsRef<Path>>(
    path: P,
    strategy: ReadStrategy,
) -> Result<Dataset, ParsingError> {
    read_dataset(strategy.open(path)?, None)
}

/// Consumes the first token; true if it is the `#NEXUS` header.
fn starts_with_nexus_header<S: ByteSource>(tokenizer: &mut NexusTokenizer<S>) -> bool {
    matches!(tokenizer.next_token_uppercased(), Some(Token::Word(word)) if word == NEXUS_HEADER)
}

fn rewind<S: ByteSource>(tokenizer: &mut NexusTokenizer<S>) -> Result<(), ParsingError> {
    if !tokenizer.is_seekable() {
        return Err(ParsingError::source_not_seekable());
    }
    tokenizer
        .rewind()
        .map_err(|_| ParsingError::source_not_seekable())
}

// =#========================================================================#=
// TREE ITERATOR
// =#========================================================================$=
/// Lazily reads the trees of a NEXUS or Newick source, one at a time.
///
/// For NEXUS, TAXA blocks are read so that TRANSLATE targets resolve,
/// CHARACTERS/DATA and unknown blocks are skipped, and the trees of all
/// TREES blocks are yielded in order. The iterator stops after the first
/// error.
///
/// # Example
/// ```
/// use phylonex::parser::InMemoryByteSource;
/// use phylonex::reader::TreeIter;
///
/// let source = InMemoryByteSource::from_str(
///     "#NEXUS\nBEGIN TREES; TRANSLATE 1 Kea, 2 Kaka; TREE a = (1,2); TREE b = (2,1); END;",
/// );
/// let mut trees = TreeIter::new(source)?;
/// let first = trees.next().unwrap()?;
/// assert_eq!(first.label(), Some("a"));
/// assert_eq!(trees.count(), 1);
/// # Ok::<(), phylonex::ParsingError>(())
/// ```
pub struct TreeIter<S: ByteSource> {
    inner: TreeIterInner<S>,
    failed: bool,
}

enum TreeIterInner<S: ByteSource> {
    Nexus(NexusParser<S>),
    Newick(NewickIterator<S>),
}

impl<S: ByteSource> TreeIter<S> {
    /// Detects the format of `source` and prepares to read its trees.
    ///
    /// # Errors
    /// [SourceNotSeekable](crate::parser::ParsingErrorKind::SourceNotSeekable)
    /// if the source is not NEXUS and cannot be rewound.
    pub fn new(source: S) -> Result<Self, ParsingError> {
        Self::with_taxa(source, TaxaCollection::new())
    }

    /// Like [new](Self::new), resolving leaves against (and extending) `taxa`.
    pub fn with_taxa(source: S, taxa: TaxaCollection) -> Result<Self, ParsingError> {
        let mut tokenizer = NexusTokenizer::new(source);
        let inner = if starts_with_nexus_header(&mut tokenizer) {
            let parser = NexusParser::new(tokenizer, Dataset::with_taxa(taxa))
                .with_characters(false)
                .streaming();
            TreeIterInner::Nexus(parser)
        } else {
            tokenizer.check_source()?;
            rewind(&mut tokenizer)?;
            TreeIterInner::Newick(NewickIterator::new(tokenizer, taxa))
        };
        Ok(Self { inner, failed: false })
    }

    /// Reads `source` as Newick without format detection, so it needs no
    /// rewind (e.g. for stdin).
    pub fn newick(source: S) -> Self {
        Self {
            inner: TreeIterInner::Newick(NewickIterator::new(
                NexusTokenizer::new(source),
                TaxaCollection::new(),
            )),
            failed: false,
        }
    }

    /// Taxa collected so far.
    pub fn taxa(&self) -> &TaxaCollection {
        match &self.inner {
            TreeIterInner::Nexus(parser) => parser.taxa(),
            TreeIterInner::Newick(trees) => trees.taxa(),
        }
    }

    /// Consumes the iterator, returning the taxa collected.
    pub fn into_taxa(self) -> TaxaCollection {
        match self.inner {
            TreeIterInner::Nexus(parser) => parser.into_dataset().into_parts().0,
            TreeIterInner::Newick(trees) => trees.into_taxa(),
        }
    }
}

impl TreeIter<FileByteSource> {
    /// Opens `path` with `strategy` and detects its format.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened.
    pub fn from_file<P: AsRef<Path>>(path: P, strategy: ReadStrategy) -> Result<Self, ParsingError> {
        Self::new(strategy.open(path)?)
    }
}

impl<S: ByteSource> Iterator for TreeIter<S> {
    type Item = Result<Tree, ParsingError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let next = match &mut self.inner {
            TreeIterInner::Newick(trees) => trees.next(),
            TreeIterInner::Nexus(parser) => loop {
                match parser.step() {
                    Ok(Step::Tree(tree)) => break Some(Ok(tree)),
                    Ok(Step::Continue) => {}
                    Ok(Step::Finished) => break None,
                    Err(err) => break Some(Err(err)),
                }
            },
        };
        if matches!(next, Some(Err(_))) {
            self.failed = true;
        }
        next
    }
}
