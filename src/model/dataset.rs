//! Dataset container tying taxa, character matrices and trees together.

use crate::model::characters::CharacterMatrix;
use crate::model::taxon::TaxaCollection;
use crate::model::tree::{Tree, TreesBlock};

/// Everything read from one or more NEXUS/Newick sources.
///
/// Holds a single [TaxaCollection]; every [TaxonId](crate::model::TaxonId)
/// stored in its matrices and trees refers to it. Passing a dataset back
/// into a reader accumulates further blocks on the same taxa.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    taxa: TaxaCollection,
    char_matrices: Vec<CharacterMatrix>,
    trees_blocks: Vec<TreesBlock>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a dataset around an existing taxa collection.
    pub fn with_taxa(taxa: TaxaCollection) -> Self {
        Self {
            taxa,
            ..Self::default()
        }
    }

    pub fn taxa(&self) -> &TaxaCollection {
        &self.taxa
    }

    pub fn taxa_mut(&mut self) -> &mut TaxaCollection {
        &mut self.taxa
    }

    pub fn char_matrices(&self) -> &[CharacterMatrix] {
        &self.char_matrices
    }

    pub fn trees_blocks(&self) -> &[TreesBlock] {
        &self.trees_blocks
    }

    pub fn add_char_matrix(&mut self, matrix: CharacterMatrix) {
        self.char_matrices.push(matrix);
    }

    pub fn add_trees_block(&mut self, block: TreesBlock) {
        self.trees_blocks.push(block);
    }

    /// All trees of all blocks, in reading order.
    pub fn trees(&self) -> impl Iterator<Item = &Tree> {
        self.trees_blocks.iter().flat_map(|block| block.iter())
    }

    /// Splits the dataset into its parts.
    pub fn into_parts(self) -> (TaxaCollection, Vec<CharacterMatrix>, Vec<TreesBlock>) {
        (self.taxa, self.char_matrices, self.trees_blocks)
    }
}
