//! NEXUS format reader and writer for taxa, character matrices and trees.
//!
//! This module provides:
//! - [NexusReader] - for reading NEXUS documents into a [Dataset]
//! - [NexusWriter] - for writing a [Dataset] as NEXUS
//! - [resolve_iupac] - the IUPAC ambiguity group resolution used for
//!   `{...}` groups in matrices
//!
//! # Quick API
//! For simple use cases with default settings:
//! - [`parse_str`] - reads a NEXUS string into a [Dataset]
//! - [`parse_file`] - reads a NEXUS file into a [Dataset]
//!
//! # Format
//! A NEXUS document starts with `#NEXUS` followed by blocks
//! `BEGIN <name>; ... END;`. Recognized blocks:
//! * `TAXA` - `DIMENSIONS NTAX=n;` and `TAXLABELS label ...;`
//! * `CHARACTERS` / `DATA` - `DIMENSIONS [NTAX=n] NCHAR=n;`, `FORMAT ...;`
//!   and `MATRIX label sequence ... ;`
//! * `TREES` - an optional `TRANSLATE key label, ...;` followed by
//!   `TREE [*] name = [&R|&U] <Newick>;` commands
//!
//! Blocks with other names, and unknown statements inside recognized
//! blocks, are skipped.
//!
//! ## Details
//! * Keywords are case-insensitive, labels are not
//! * A label with a space in it is either quoted or written with
//!   underscores: `'Homo sapiens'` and `Homo_sapiens` are the same label
//! * An apostrophe in a quoted label is doubled: `'Wilson''s storm-petrel'`
//! * `FORMAT` understands `DATATYPE` (STANDARD, DNA/NUCLEOTIDES, RNA,
//!   PROTEIN), `SYMBOLS`, `GAP`, `MISSING`, `MATCHCHAR` and `INTERLEAVE`
//! * A TRANSLATE table applies to the TREE commands of its own TREES block
//!   only

pub mod defs;
mod matrix;
mod parser;
mod writer;

pub use self::matrix::{MatrixFormat, resolve_iupac};
pub use self::parser::NexusReader;
pub use self::writer::NexusWriter;

pub(crate) use self::parser::{NexusParser, Step};

use crate::model::Dataset;
use crate::parser::ParsingError;
use crate::reader::ReadStrategy;
use std::path::Path;

// ============================================================================
// QUICK PARSING API (pub)
// ============================================================================
/// Reads a NEXUS string with default settings.
///
/// # Errors
/// Returns a [ParsingError] if the string is not valid NEXUS.
pub fn parse_str(input: &str) -> Result<Dataset, ParsingError> {
    NexusReader::new().read_str(input)
}

/// Reads a NEXUS file with default settings.
///
/// This is a convenience function to read a whole file in NEXUS format,
/// choosing in-memory or buffered reading by file size.
///
/// # Arguments
/// * `path` - Path to the file (accepting `&str`, `String`, `Path`, or `PathBuf`)
///
/// # Errors
/// Returns an error if the file cannot be opened or parsed.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Dataset, ParsingError> {
    NexusReader::new().read(ReadStrategy::Automatic.open(path)?)
}
