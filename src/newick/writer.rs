//! Newick format writing for [Tree]s resolved against a [TaxaCollection].

use crate::model::{Dataset, EdgeLength, Node, TaxaCollection, Taxon, TaxonId, Tree};
use crate::parser::utils::quote_label;
use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Extra buffer in Newick string length/capacity estimate
const BUFFER_CHARS: usize = 10;

/// Prefix of synthetic labels for leaves with neither taxon nor label.
const SYNTHETIC_LEAF_PREFIX: &str = "node";

// =#========================================================================#=
// NEWICK WRITER
// =#========================================================================$=
/// Serializes trees to Newick strings.
///
/// # Configuration
/// * [`with_edge_lengths(bool)`](Self::with_edge_lengths) - write `:length`
///   suffixes (default: `true`)
/// * [`with_internal_labels(bool)`](Self::with_internal_labels) - write
///   labels of internal nodes (default: `true`); leaves are always labelled
/// * [`with_edge_length_precision(Option<usize>)`](Self::with_edge_length_precision)
///   - fixed number of decimals instead of the shortest round-trip form
///
/// # Labels
/// A node is written with its taxon's label if it has one, its own label
/// otherwise. Leaves with neither get `node<N>`, `N` being their position
/// in a pre-order walk. Labels with whitespace or punctuation are quoted.
///
/// # Example
/// ```
/// use phylonex::model::{Node, TaxaCollection, Tree};
/// use phylonex::newick::NewickWriter;
///
/// let tree = Tree::new(Node::with_children(vec![
///     Node::leaf("A").with_length(1.0),
///     Node::with_children(vec![Node::leaf("B").with_length(2.0), Node::leaf("C").with_length(3.0)])
///         .with_length(4.0),
/// ]));
/// let newick = NewickWriter::new().compose_tree(&tree, &TaxaCollection::new());
/// assert_eq!(newick, "(A:1.0,(B:2.0,C:3.0):4.0)");
/// ```
#[derive(Debug, Clone)]
pub struct NewickWriter {
    edge_lengths: bool,
    internal_labels: bool,
    edge_length_precision: Option<usize>,
}

impl Default for NewickWriter {
    fn default() -> Self {
        Self {
            edge_lengths: true,
            internal_labels: true,
            edge_length_precision: None,
        }
    }
}

// ============================================================================
// Construction & Configuration (pub)
// ============================================================================
impl NewickWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_edge_lengths(mut self, edge_lengths: bool) -> Self {
        self.edge_lengths = edge_lengths;
        self
    }

    pub fn with_internal_labels(mut self, internal_labels: bool) -> Self {
        self.internal_labels = internal_labels;
        self
    }

    pub fn with_edge_length_precision(mut self, precision: Option<usize>) -> Self {
        self.edge_length_precision = precision;
        self
    }
}

// ============================================================================
// Composing & Writing (pub)
// ============================================================================
impl NewickWriter {
    /// Returns the Newick representation of a tree, without closing semicolon.
    pub fn compose_tree(&self, tree: &Tree, taxa: &TaxaCollection) -> String {
        let mut newick = String::with_capacity(estimate_newick_len(tree, taxa));
        let mut preorder_index = 0;
        self.compose_node_into(&mut newick, tree.seed_node(), taxa, &mut preorder_index);
        newick
    }

    /// Returns the Newick representation of the subtree at `node`.
    pub fn compose_node(&self, node: &Node, taxa: &TaxaCollection) -> String {
        let mut newick = String::new();
        let mut preorder_index = 0;
        self.compose_node_into(&mut newick, node, taxa, &mut preorder_index);
        newick
    }

    /// Writes trees one per line, each terminated by `;`.
    ///
    /// # Errors
    /// Returns an I/O error if writing fails.
    pub fn write_trees<'t, W: Write>(
        &self,
        out: &mut W,
        trees: impl IntoIterator<Item = &'t Tree>,
        taxa: &TaxaCollection,
    ) -> io::Result<()> {
        for tree in trees {
            out.write_all(self.compose_tree(tree, taxa).as_bytes())?;
            out.write_all(b";\n")?;
        }
        Ok(())
    }

    /// Writes all trees of all trees blocks of a dataset.
    pub fn write_dataset<W: Write>(&self, out: &mut W, dataset: &Dataset) -> io::Result<()> {
        self.write_trees(out, dataset.trees(), dataset.taxa())?;
        out.flush()
    }

    /// Writes all trees of a dataset to the file at `path`, creating or
    /// truncating it.
    ///
    /// # Errors
    /// Returns an I/O error if the file cannot be created or written.
    pub fn write_file<P: AsRef<Path>>(&self, path: P, dataset: &Dataset) -> io::Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        self.write_dataset(&mut out, dataset)
    }
}

// ============================================================================
// Helpers (private)
// ============================================================================
impl NewickWriter {
    /// Recursive helper for building the Newick string
    fn compose_node_into(
        &self,
        newick: &mut String,
        node: &Node,
        taxa: &TaxaCollection,
        preorder_index: &mut usize,
    ) {
        let index = *preorder_index;
        *preorder_index += 1;

        if node.is_leaf() {
            match display_label(node, taxa) {
                Some(label) => newick.push_str(&quote_label(label)),
                None => {
                    newick.push_str(SYNTHETIC_LEAF_PREFIX);
                    newick.push_str(&index.to_string());
                }
            }
        } else {
            newick.push('(');
            for (i, child) in node.children().iter().enumerate() {
                if i > 0 {
                    newick.push(',');
                }
                self.compose_node_into(newick, child, taxa, preorder_index);
            }
            newick.push(')');

            if self.internal_labels {
                if let Some(label) = display_label(node, taxa) {
                    newick.push_str(&quote_label(label));
                }
            }
        }

        if self.edge_lengths {
            self.push_edge_length(newick, node.edge_length());
        }
    }

    fn push_edge_length(&self, newick: &mut String, length: &EdgeLength) {
        match length {
            EdgeLength::Absent => {}
            EdgeLength::Numeric(value) => {
                newick.push(':');
                match self.edge_length_precision {
                    Some(precision) => newick.push_str(&format!("{value:.precision$}")),
                    None => newick.push_str(&format!("{value:?}")),
                }
            }
            EdgeLength::Literal(text) => {
                newick.push(':');
                newick.push_str(text);
            }
        }
    }
}

/// Taxon label if the node has a taxon, else its own label.
fn display_label<'a>(node: &'a Node, taxa: &'a TaxaCollection) -> Option<&'a str> {
    node.taxon()
        .and_then(|id| taxa.label(id))
        .or_else(|| node.label())
        .filter(|label| !label.is_empty())
}

/// Estimates the length of a Newick string for a given tree, to
/// pre-allocate string capacity.
fn estimate_newick_len(tree: &Tree, taxa: &TaxaCollection) -> usize {
    // "(,)" and ":0.123456" per node, roughly
    const NODE_CHARS: usize = 3;
    const EDGE_LENGTH_CHARS: usize = 10;

    tree.pre_order_iter()
        .map(|node| {
            let label_len = display_label(node, taxa).map_or(0, |label| label.len() + 2);
            let edge_len = if node.edge_length().is_absent() { 0 } else { EDGE_LENGTH_CHARS };
            NODE_CHARS + label_len + edge_len
        })
        .sum::<usize>()
        + BUFFER_CHARS
}

// =#========================================================================#=
// SPLITS
// =#========================================================================$=
/// Writes the bipartition of `taxa` into `split` and all remaining taxa as
/// a Newick string, `((in,...),(out,...))`, both sides in collection order.
///
/// An empty split, or one holding every taxon, has no second side and is
/// written as a single clade of all taxa.
///
/// # Example
/// ```
/// use phylonex::model::TaxaCollection;
/// use phylonex::newick::split_to_newick;
///
/// let mut taxa = TaxaCollection::new();
/// let kea = taxa.lookup_or_insert("Kea");
/// taxa.lookup_or_insert("Kiwi");
/// let kaka = taxa.lookup_or_insert("Kaka");
///
/// assert_eq!(split_to_newick(&[kaka, kea], &taxa), "((Kea,Kaka),(Kiwi))");
/// assert_eq!(split_to_newick(&[], &taxa), "(Kea,Kiwi,Kaka)");
/// ```
pub fn split_to_newick(split: &[TaxonId], taxa: &TaxaCollection) -> String {
    let split: HashSet<TaxonId> = split.iter().copied().collect();
    let (inside, outside): (Vec<&Taxon>, Vec<&Taxon>) =
        taxa.iter().partition(|taxon| split.contains(&taxon.id()));

    if inside.is_empty() || outside.is_empty() {
        return format!("({})", join_labels(taxa.iter()));
    }
    format!("(({}),({}))", join_labels(inside), join_labels(outside))
}

fn join_labels<'a>(side: impl IntoIterator<Item = &'a Taxon>) -> String {
    side.into_iter()
        .map(|taxon| quote_label(taxon.label()))
        .collect::<Vec<_>>()
        .join(",")
}
