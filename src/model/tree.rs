//! Provides the owned, recursive tree representation.
//!
//! Core data structures for representing phylogenetic trees:
//! * [Node] - owns its children, carries optional label and taxon
//! * [Edge] / [EdgeLength] - the inbound edge of a node
//! * [Tree] - wraps the seed (root) node plus name and rootedness
//! * [TreesBlock] - ordered trees sharing one [TaxaCollection](crate::model::TaxaCollection)

use crate::model::taxon::TaxonId;
use std::ops::Index;

// =#========================================================================#=
// EDGE LENGTH & EDGE
// =#========================================================================€=
/// Length of an edge: absent, numeric, or a literal kept as read.
///
/// Text that does not parse as a finite number is not an error, it is
/// kept as [EdgeLength::Literal] so that it can be written back verbatim.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum EdgeLength {
    #[default]
    Absent,
    Numeric(f64),
    Literal(String),
}

impl EdgeLength {
    /// Interprets edge length text as read from a Newick string.
    ///
    /// # Examples
    /// ```
    /// use phylonex::model::EdgeLength;
    ///
    /// assert_eq!(EdgeLength::parse("0.25"), EdgeLength::Numeric(0.25));
    /// assert_eq!(EdgeLength::parse("-1.5e+2"), EdgeLength::Numeric(-150.0));
    /// assert_eq!(EdgeLength::parse("0.5%"), EdgeLength::Literal("0.5%".into()));
    /// assert_eq!(EdgeLength::parse("NaN"), EdgeLength::Literal("NaN".into()));
    /// ```
    pub fn parse(text: &str) -> Self {
        match text.parse::<f64>() {
            Ok(value) if value.is_finite() => EdgeLength::Numeric(value),
            _ => EdgeLength::Literal(text.to_string()),
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, EdgeLength::Absent)
    }

    /// The numeric value, if any.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            EdgeLength::Numeric(value) => Some(*value),
            _ => None,
        }
    }
}

impl From<f64> for EdgeLength {
    fn from(value: f64) -> Self {
        EdgeLength::Numeric(value)
    }
}

/// Inbound edge of a [Node].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Edge {
    pub length: EdgeLength,
}

// =#========================================================================#=
// NODE
// =#========================================================================$=
/// A tree node exclusively owning its children.
///
/// Every node has exactly one inbound [Edge]; for the seed node it is the
/// (usually absent) root edge. The taxon reference is only set on leaves,
/// when their labels get resolved against a taxa collection.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Node {
    label: Option<String>,
    taxon: Option<TaxonId>,
    edge: Edge,
    children: Vec<Node>,
}

// ============================================================================
// Construction (pub)
// ============================================================================
impl Node {
    /// Creates a node without label, taxon, edge length or children.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a labelled leaf.
    pub fn leaf(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::default()
        }
    }

    /// Creates an unlabelled node with the given children.
    pub fn with_children(children: Vec<Node>) -> Self {
        Self {
            children,
            ..Self::default()
        }
    }

    /// Sets the inbound edge length.
    pub fn with_length(mut self, length: impl Into<EdgeLength>) -> Self {
        self.edge.length = length.into();
        self
    }

    /// Sets the label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Appends a child (children keep insertion order).
    pub fn add_child(&mut self, child: Node) {
        self.children.push(child);
    }
}

// ============================================================================
// Accessors (pub)
// ============================================================================
impl Node {
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn set_label(&mut self, label: Option<String>) {
        self.label = label;
    }

    pub fn taxon(&self) -> Option<TaxonId> {
        self.taxon
    }

    pub fn set_taxon(&mut self, taxon: Option<TaxonId>) {
        self.taxon = taxon;
    }

    pub fn edge(&self) -> &Edge {
        &self.edge
    }

    pub fn edge_mut(&mut self) -> &mut Edge {
        &mut self.edge
    }

    /// Shortcut for `edge().length`.
    pub fn edge_length(&self) -> &EdgeLength {
        &self.edge.length
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut Vec<Node> {
        &mut self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Iterates over this node and its descendants, parents before children
    /// and siblings left to right.
    pub fn pre_order_iter(&self) -> PreOrderIter<'_> {
        PreOrderIter { stack: vec![self] }
    }

    /// Iterates over the leaves below (or at) this node, left to right.
    pub fn leaves(&self) -> impl Iterator<Item = &Node> {
        self.pre_order_iter().filter(|node| node.is_leaf())
    }

    /// Calls `f` on every leaf that carries a label, in left-to-right order,
    /// storing the returned taxon on the leaf.
    ///
    /// Stops at the first error.
    pub fn resolve_leaf_taxa<E>(
        &mut self,
        mut f: impl FnMut(&str) -> Result<TaxonId, E>,
    ) -> Result<(), E> {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if node.children.is_empty() {
                if let Some(label) = node.label.as_deref() {
                    node.taxon = Some(f(label)?);
                }
            } else {
                // Reversed, so that the leftmost child is popped first
                stack.extend(node.children.iter_mut().rev());
            }
        }
        Ok(())
    }
}

/// Iterator for pre-order traversal (parents before children).
///
/// Stack-based, so deep trees do not recurse.
pub struct PreOrderIter<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for PreOrderIter<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

// =#========================================================================#=
// TREE
// =#========================================================================$=
/// A phylogenetic tree: one seed node, an optional name, and a rootedness flag.
///
/// Leaves refer to taxa by [TaxonId]; the collection they resolve against is
/// the one of the enclosing [Dataset](crate::model::Dataset) or reader.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Tree {
    seed_node: Node,
    label: Option<String>,
    is_rooted: bool,
}

impl Tree {
    /// Creates an unnamed, unrooted tree.
    pub fn new(seed_node: Node) -> Self {
        Self {
            seed_node,
            label: None,
            is_rooted: false,
        }
    }

    /// Attaches a name to this tree.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Sets the rootedness flag.
    pub fn with_rooted(mut self, is_rooted: bool) -> Self {
        self.is_rooted = is_rooted;
        self
    }

    pub fn seed_node(&self) -> &Node {
        &self.seed_node
    }

    pub fn seed_node_mut(&mut self) -> &mut Node {
        &mut self.seed_node
    }

    pub fn into_seed_node(self) -> Node {
        self.seed_node
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn set_label(&mut self, label: Option<String>) {
        self.label = label;
    }

    pub fn is_rooted(&self) -> bool {
        self.is_rooted
    }

    pub fn set_rooted(&mut self, is_rooted: bool) {
        self.is_rooted = is_rooted;
    }

    pub fn pre_order_iter(&self) -> PreOrderIter<'_> {
        self.seed_node.pre_order_iter()
    }

    pub fn leaves(&self) -> impl Iterator<Item = &Node> {
        self.seed_node.leaves()
    }

    pub fn num_leaves(&self) -> usize {
        self.leaves().count()
    }

    pub fn num_nodes(&self) -> usize {
        self.pre_order_iter().count()
    }

    /// Sum over all numeric edge lengths (including the root edge).
    pub fn total_edge_length(&self) -> f64 {
        self.pre_order_iter()
            .filter_map(|node| node.edge_length().as_f64())
            .sum()
    }
}

// =#========================================================================#=
// TREES BLOCK
// =#========================================================================$=
/// Ordered sequence of trees sharing one taxa collection.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TreesBlock {
    trees: Vec<Tree>,
}

impl TreesBlock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, tree: Tree) {
        self.trees.push(tree);
    }

    pub fn len(&self) -> usize {
        self.trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Tree> {
        self.trees.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Tree> {
        self.trees.iter()
    }

    pub fn into_trees(self) -> Vec<Tree> {
        self.trees
    }
}

impl From<Vec<Tree>> for TreesBlock {
    fn from(trees: Vec<Tree>) -> Self {
        Self { trees }
    }
}

impl Index<usize> for TreesBlock {
    type Output = Tree;

    fn index(&self, index: usize) -> &Tree {
        &self.trees[index]
    }
}

impl<'a> IntoIterator for &'a TreesBlock {
    type Item = &'a Tree;
    type IntoIter = std::slice::Iter<'a, Tree>;

    fn into_iter(self) -> Self::IntoIter {
        self.trees.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Tree {
        // ((A:1,B:2):3,C:4);
        let ab = Node::with_children(vec![
            Node::leaf("A").with_length(1.0),
            Node::leaf("B").with_length(2.0),
        ])
        .with_length(3.0);
        Tree::new(Node::with_children(vec![ab, Node::leaf("C").with_length(4.0)]))
    }

    #[test]
    fn test_pre_order_visits_left_to_right() {
        let tree = sample();
        let labels: Vec<_> = tree.pre_order_iter().map(|n| n.label()).collect();
        assert_eq!(labels, vec![None, None, Some("A"), Some("B"), Some("C")]);
        assert_eq!(tree.num_leaves(), 3);
        assert_eq!(tree.num_nodes(), 5);
        assert_eq!(tree.total_edge_length(), 10.0);
    }
}
