//! Phylonex is a library to read and write phylogenetic data in NEXUS and
//! Newick format.
//!
//! This crate offers configurable reader and writer functionality for
//! NEXUS documents (taxa, character matrices, trees) and Newick strings.
//! Core functionality provided:
//! - Tokenizer: A streaming NEXUS/Newick tokenizer with nested comments,
//!   quoted labels and line/column positions for errors.
//!   See [crate::parser].
//! - Newick: Parse single trees, or all trees of a string or file lazily.
//!   See [crate::newick].
//! - Nexus: Parse TAXA, CHARACTERS/DATA and TREES blocks into a [Dataset],
//!   including TRANSLATE tables, IUPAC ambiguity groups, MATCHCHAR, and
//!   sequential or interleaved matrices. See [crate::nexus].
//! - Format detection: [reader::read_dataset] and [reader::TreeIter] accept
//!   NEXUS or bare Newick input.
//! - Writers: [NewickWriter](newick::NewickWriter) and
//!   [NexusWriter](nexus::NexusWriter), to any sink or straight to a file
//!   ([write_nexus_file], [write_newick_file]).
//! - Model:
//!   - One [TaxaCollection](model::TaxaCollection) per [Dataset]; trees and
//!     matrices reference taxa by [TaxonId](model::TaxonId).
//!   - Trees own their nodes; edge lengths are absent, numeric, or literal
//!     text. See [crate::model] for more details.
//!
//! # Usage patterns
//! Can read input in two main ways:
//! 1. Several functions provide quick access with default settings.
//! 2. Configure a [NexusReader](nexus::NexusReader) or iterate trees with a
//!    [TreeIter](reader::TreeIter) for full control.
//!
//! ## Example Default Configuration
//!
//! Parse a single Newick string:
//! ```
//! use phylonex::parse_newick_str;
//!
//! let (tree, taxa) = parse_newick_str("((A:0.1,B:0.2):0.3,C:0.4);")?;
//! assert_eq!(tree.num_leaves(), 3);
//! assert_eq!(taxa.len(), 3);
//! # Ok::<(), phylonex::ParsingError>(())
//! ```
//!
//! Read a NEXUS (or Newick) file:
//! ```no_run
//! use phylonex::{ReadStrategy, read_dataset_file};
//!
//! let dataset = read_dataset_file("ratites.nex", ReadStrategy::Automatic)?;
//! println!("Loaded {} trees with {} taxa", dataset.trees().count(), dataset.taxa().len());
//! # Ok::<(), phylonex::ParsingError>(())
//! ```
//!
//! ## Example Reader Configuration
//!
//! ```
//! use phylonex::nexus::NexusReader;
//!
//! let nexus = "#NEXUS
//! BEGIN DATA;
//!     DIMENSIONS NTAX=2 NCHAR=4;
//!     FORMAT DATATYPE=DNA MISSING=? GAP=-;
//!     MATRIX
//!         Kiwi  AC{AG}T
//!         Emu   AC?-
//!     ;
//! END;";
//!
//! let dataset = NexusReader::new().with_trees(false).read_str(nexus)?;
//! let matrix = &dataset.char_matrices()[0];
//! let kiwi = dataset.taxa().lookup_strict("Kiwi").unwrap();
//! assert_eq!(matrix.sequence_string(kiwi).unwrap(), "ACRT");
//! # Ok::<(), phylonex::ParsingError>(())
//! ```

pub mod model;
pub mod newick;
pub mod nexus;
pub mod parser;
pub mod reader;

pub use crate::model::Dataset;
pub use crate::parser::ParsingError;
pub use crate::reader::ReadStrategy;

use crate::model::{TaxaCollection, Tree};
use crate::newick::NewickWriter;
use crate::nexus::NexusWriter;
use std::io;
use std::path::Path;

// ============================================================================
// Quick Reading API
// ============================================================================
/// Parse a Newick string using default settings, returning its first
/// [Tree] and the [TaxaCollection] of its leaves.
///
/// See [`newick::parse_str`] for full documentation.
pub fn parse_newick_str<S: AsRef<str>>(newick: S) -> Result<(Tree, TaxaCollection), ParsingError> {
    newick::parse_str(newick.as_ref())
}

/// Read a NEXUS document or a list of Newick trees from a string.
///
/// See [`reader::read_dataset_str`] for full documentation.
pub fn read_dataset_str<S: AsRef<str>>(input: S) -> Result<Dataset, ParsingError> {
    reader::read_dataset_str(input.as_ref())
}

/// Read a NEXUS or Newick file with the given [ReadStrategy].
///
/// See [`reader::read_dataset_file`] for full documentation.
pub fn read_dataset_file<P: AsRef<Path>>(
    path: P,
    strategy: ReadStrategy,
) -> Result<Dataset, ParsingError> {
    reader::read_dataset_file(path, strategy)
}

// ============================================================================
// Quick Writing API
// ============================================================================
/// Write a dataset as a NEXUS document using default settings.
///
/// # Errors
/// Returns an I/O error if writing fails.
pub fn write_nexus_string(dataset: &Dataset) -> io::Result<String> {
    let mut writer = NexusWriter::new(Vec::new());
    writer.write_dataset(dataset)?;
    String::from_utf8(writer.into_inner()).map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
}

/// Write a dataset as a NEXUS document to the file at `path`, creating or
/// truncating it.
///
/// # Errors
/// Returns an I/O error if the file cannot be created or written.
pub fn write_nexus_file<P: AsRef<Path>>(path: P, dataset: &Dataset) -> io::Result<()> {
    NexusWriter::for_file(path)?.write_dataset(dataset)
}

/// Write all trees of a dataset as Newick to the file at `path`, one tree
/// per line.
///
/// # Errors
/// Returns an I/O error if the file cannot be created or written.
pub fn write_newick_file<P: AsRef<Path>>(path: P, dataset: &Dataset) -> io::Result<()> {
    NewickWriter::new().write_file(path, dataset)
}

/// Write all trees of a dataset as Newick, one `;`-terminated tree per line.
///
/// # Example
/// ```
/// let dataset = phylonex::read_dataset_str("(A:1.0,(B:2.0,C:3.0):4.0);")?;
/// assert_eq!(phylonex::write_newick_string(&dataset)?, "(A:1.0,(B:2.0,C:3.0):4.0);\n");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn write_newick_string(dataset: &Dataset) -> io::Result<String> {
    let mut out = Vec::new();
    NewickWriter::new().write_dataset(&mut out, dataset)?;
    String::from_utf8(out).map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
}
