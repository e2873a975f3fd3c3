//! Taxon module for phylogenetic data representation.
//!
//! - [TaxaCollection]: Joint storage and lookup of all taxa of one dataset,
//!   shared by its character matrices and trees.

use std::collections::HashMap;
use std::fmt;
use std::ops::Index;

// =#========================================================================#=
// TAXON ID & TAXON
// =#========================================================================€=
/// Stable identity of a [Taxon] within its [TaxaCollection].
///
/// Identity is positional and survives relabelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaxonId(usize);

impl TaxonId {
    /// 0-based position of the taxon in its collection.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A named operational taxonomic unit, owned by a [TaxaCollection].
///
/// Equality is by identity, not by label.
#[derive(Debug, Clone)]
pub struct Taxon {
    id: TaxonId,
    label: String,
}

impl Taxon {
    pub fn id(&self) -> TaxonId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl PartialEq for Taxon {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Taxon {}

// =#========================================================================#=
// TAXA COLLECTION
// =#========================================================================$=
/// Ordered collection of unique taxa with label lookup.
///
/// Looking a label up either creates the taxon on a miss
/// ([lookup_or_insert](TaxaCollection::lookup_or_insert)) or must find an
/// existing one ([lookup_strict](TaxaCollection::lookup_strict)).
///
/// # Example
/// ```
/// use phylonex::model::TaxaCollection;
///
/// let mut taxa = TaxaCollection::new();
///
/// let kea = taxa.lookup_or_insert("Nestor notabilis");
/// let kaka = taxa.lookup_or_insert("Nestor meridionalis");
/// assert_eq!(taxa.lookup_or_insert("Nestor notabilis"), kea);
///
/// assert_eq!(taxa.lookup_strict("Nestor meridionalis"), Some(kaka));
/// assert_eq!(taxa.lookup_strict("Strigops habroptilus"), None);
/// assert_eq!(taxa.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TaxaCollection {
    /// Taxa in insertion order; `taxa[i].id == TaxonId(i)`
    taxa: Vec<Taxon>,
    /// Map from current label to identity
    map: HashMap<String, TaxonId>,
}

// ============================================================================
// Construction & Lookup (pub)
// ============================================================================
impl TaxaCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty collection with pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            taxa: Vec::with_capacity(capacity),
            map: HashMap::with_capacity(capacity),
        }
    }

    /// Gets the taxon with this label, appending a new one if there is none.
    ///
    /// # Arguments
    /// * `label` - The label to look up or insert
    ///
    /// # Returns
    /// The identity of the existing or newly created taxon
    pub fn lookup_or_insert(&mut self, label: &str) -> TaxonId {
        if let Some(&id) = self.map.get(label) {
            return id;
        }
        let id = TaxonId(self.taxa.len());
        self.taxa.push(Taxon {
            id,
            label: label.to_string(),
        });
        self.map.insert(label.to_string(), id);
        id
    }

    /// Gets the taxon with this label without ever creating one.
    ///
    /// # Returns
    /// `Some(id)` if a taxon currently carries `label`, `None` otherwise
    pub fn lookup_strict(&self, label: &str) -> Option<TaxonId> {
        self.map.get(label).copied()
    }

    /// Changes the label of a taxon, keeping its identity.
    ///
    /// Subsequent lookups use the new label; the old one no longer resolves.
    ///
    /// # Returns
    /// `false` (and no change) if `id` is unknown or another taxon
    /// already carries `label`
    pub fn set_label(&mut self, id: TaxonId, label: &str) -> bool {
        match self.map.get(label) {
            Some(&holder) if holder != id => return false,
            Some(_) => return true,
            None => {}
        }
        let Some(taxon) = self.taxa.get_mut(id.0) else {
            return false;
        };
        let old = std::mem::replace(&mut taxon.label, label.to_string());
        self.map.remove(&old);
        self.map.insert(label.to_string(), id);
        true
    }
}

// ============================================================================
// Accessors (pub)
// ============================================================================
impl TaxaCollection {
    pub fn get(&self, id: TaxonId) -> Option<&Taxon> {
        self.taxa.get(id.0)
    }

    /// Label of the taxon with this identity.
    pub fn label(&self, id: TaxonId) -> Option<&str> {
        self.get(id).map(Taxon::label)
    }

    pub fn contains_label(&self, label: &str) -> bool {
        self.map.contains_key(label)
    }

    pub fn len(&self) -> usize {
        self.taxa.len()
    }

    pub fn is_empty(&self) -> bool {
        self.taxa.is_empty()
    }

    /// Iterates over the taxa in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Taxon> {
        self.taxa.iter()
    }

    /// Iterates over the labels in insertion order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.taxa.iter().map(Taxon::label)
    }
}

impl Index<TaxonId> for TaxaCollection {
    type Output = Taxon;

    fn index(&self, id: TaxonId) -> &Taxon {
        &self.taxa[id.0]
    }
}

impl fmt::Display for TaxaCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TaxaCollection ({} taxa): [", self.taxa.len())?;
        for (i, taxon) in self.taxa.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", taxon.label)?;
        }
        write!(f, "]")
    }
}
