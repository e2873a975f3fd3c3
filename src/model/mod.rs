//! Data model for taxa, character matrices and trees.
//!
//! # Taxa
//! All taxa of a [Dataset] live in one [TaxaCollection] and are referenced
//! elsewhere by [TaxonId]:
//!
//! | Referenced from | Via |
//! |------|---------------|
//! | [Node] (leaves) | [Node::taxon] |
//! | [CharacterMatrix] rows | row key |
//!
//! # Trees
//! A [Tree] owns its seed [Node], which owns its children recursively.
//! Edge lengths are an [EdgeLength]: absent, numeric, or literal text.
//!
//! # Characters
//! A [CharacterMatrix] stores [StateId]s of its [StateAlphabet]; the
//! alphabet knows which states are fundamental, gaps, or ambiguous.

pub mod characters;
pub mod dataset;
pub mod taxon;
pub mod tree;

pub use characters::{CharacterMatrix, DataType, State, StateAlphabet, StateId, StateKind};
pub use dataset::Dataset;
pub use taxon::{TaxaCollection, Taxon, TaxonId};
pub use tree::{Edge, EdgeLength, Node, Tree, TreesBlock};
