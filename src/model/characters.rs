//! Character data: state alphabets and character matrices.
//!
//! A [StateAlphabet] maps single-character symbols to [StateId]s, where a
//! state is either fundamental, a gap, or ambiguous (a set of fundamental
//! states, e.g. IUPAC `R` = A or G). A [CharacterMatrix] stores, per taxon,
//! the ordered sequence of resolved states.

use crate::model::taxon::TaxonId;
use std::collections::HashMap;

/// Fundamental DNA bases.
const DNA_SYMBOLS: &str = "ACGT";

/// Fundamental RNA bases.
const RNA_SYMBOLS: &str = "ACGU";

/// The 20 standard amino acids.
const PROTEIN_SYMBOLS: &str = "ACDEFGHIKLMNPQRSTVWY";

/// IUPAC nucleotide ambiguity codes over `ACGT`; `T` stands for `U` in RNA.
const NUCLEOTIDE_AMBIGUITIES: &[(char, &str)] = &[
    ('R', "AG"),
    ('Y', "CT"),
    ('M', "AC"),
    ('K', "GT"),
    ('S', "CG"),
    ('W', "AT"),
    ('H', "ACT"),
    ('B', "CGT"),
    ('V', "ACG"),
    ('D', "AGT"),
    ('N', "ACGT"),
];

/// Protein ambiguity codes.
const PROTEIN_AMBIGUITIES: &[(char, &str)] = &[
    ('B', "DN"),
    ('Z', "EQ"),
    ('X', PROTEIN_SYMBOLS),
];

// =#========================================================================#=
// DATA TYPE
// =#========================================================================€=
/// Kind of character data of a matrix, as given by `FORMAT DATATYPE=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataType {
    #[default]
    Standard,
    Dna,
    Rna,
    Protein,
}

impl DataType {
    /// Parses a (case-insensitive) datatype name; unknown names are
    /// [DataType::Standard].
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_uppercase().as_str() {
            "DNA" | "NUCLEOTIDES" => DataType::Dna,
            "RNA" => DataType::Rna,
            "PROTEIN" => DataType::Protein,
            _ => DataType::Standard,
        }
    }

    /// The NEXUS keyword for this datatype.
    pub fn keyword(&self) -> &'static str {
        match self {
            DataType::Standard => "STANDARD",
            DataType::Dna => "DNA",
            DataType::Rna => "RNA",
            DataType::Protein => "PROTEIN",
        }
    }

    /// Whether this datatype has a predefined alphabet.
    pub fn is_molecular(&self) -> bool {
        !matches!(self, DataType::Standard)
    }
}

// =#========================================================================#=
// STATES
// =#========================================================================€=
/// Index of a state in its [StateAlphabet].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(usize);

impl StateId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// What a state stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateKind {
    Fundamental,
    /// Union of the listed fundamental states
    Ambiguous(Vec<StateId>),
    Gap,
}

/// A symbol together with its meaning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    symbol: char,
    kind: StateKind,
}

impl State {
    pub fn symbol(&self) -> char {
        self.symbol
    }

    pub fn kind(&self) -> &StateKind {
        &self.kind
    }
}

// =#========================================================================#=
// STATE ALPHABET
// =#========================================================================$=
/// Ordered symbol-to-state mapping of one character matrix.
///
/// Fundamental states come first, in symbol order, followed by ambiguous and
/// gap states. Molecular alphabets match symbols case-insensitively.
///
/// # Example
/// ```
/// use phylonex::model::{StateAlphabet, StateKind};
///
/// let dna = StateAlphabet::dna(Some('-'), Some('?'));
/// let a = dna.state_for('a').unwrap();
/// let g = dna.state_for('G').unwrap();
/// let r = dna.state_for('R').unwrap();
/// assert_eq!(dna.member_states(r), vec![a, g]);
///
/// let missing = dna.missing_state().unwrap();
/// assert_eq!(dna.member_states(missing).len(), 4);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct StateAlphabet {
    states: Vec<State>,
    symbol_map: HashMap<char, StateId>,
    case_sensitive: bool,
    gap: Option<StateId>,
    missing: Option<StateId>,
}

// ============================================================================
// Construction (pub)
// ============================================================================
impl StateAlphabet {
    /// Alphabet of a STANDARD matrix with the given symbols.
    ///
    /// Repeated symbols are ignored; `missing` maps to the union of all
    /// fundamental states.
    pub fn standard(symbols: &str, gap: Option<char>, missing: Option<char>) -> Self {
        let mut alphabet = Self::empty(true);
        for symbol in symbols.chars() {
            alphabet.add_fundamental(symbol);
        }
        alphabet.add_gap_and_missing(gap, missing);
        alphabet
    }

    /// DNA alphabet with IUPAC ambiguity codes.
    pub fn dna(gap: Option<char>, missing: Option<char>) -> Self {
        Self::molecular(DNA_SYMBOLS, NUCLEOTIDE_AMBIGUITIES, gap, missing)
    }

    /// RNA alphabet with IUPAC ambiguity codes.
    pub fn rna(gap: Option<char>, missing: Option<char>) -> Self {
        let owned: Vec<(char, String)> = NUCLEOTIDE_AMBIGUITIES
            .iter()
            .map(|(code, bases)| (*code, bases.replace('T', "U")))
            .collect();
        let ambiguities: Vec<(char, &str)> = owned
            .iter()
            .map(|(code, bases)| (*code, bases.as_str()))
            .collect();
        Self::molecular(RNA_SYMBOLS, &ambiguities, gap, missing)
    }

    /// Protein alphabet with `B`, `Z` and `X` ambiguity codes.
    pub fn protein(gap: Option<char>, missing: Option<char>) -> Self {
        Self::molecular(PROTEIN_SYMBOLS, PROTEIN_AMBIGUITIES, gap, missing)
    }

    /// Alphabet matching the datatype; `symbols` only applies to
    /// [DataType::Standard].
    pub fn for_data_type(
        data_type: DataType,
        symbols: &str,
        gap: Option<char>,
        missing: Option<char>,
    ) -> Self {
        match data_type {
            DataType::Standard => Self::standard(symbols, gap, missing),
            DataType::Dna => Self::dna(gap, missing),
            DataType::Rna => Self::rna(gap, missing),
            DataType::Protein => Self::protein(gap, missing),
        }
    }
}

// ============================================================================
// Lookup & Accessors (pub)
// ============================================================================
impl StateAlphabet {
    /// The state a matrix symbol stands for.
    pub fn state_for(&self, symbol: char) -> Option<StateId> {
        if let Some(&id) = self.symbol_map.get(&symbol) {
            return Some(id);
        }
        if self.case_sensitive {
            None
        } else {
            self.symbol_map.get(&symbol.to_ascii_uppercase()).copied()
        }
    }

    pub fn state(&self, id: StateId) -> &State {
        &self.states[id.0]
    }

    pub fn symbol(&self, id: StateId) -> char {
        self.states[id.0].symbol
    }

    /// Fundamental states a state stands for (itself if fundamental, none for a gap).
    pub fn member_states(&self, id: StateId) -> Vec<StateId> {
        match &self.states[id.0].kind {
            StateKind::Fundamental => vec![id],
            StateKind::Ambiguous(members) => members.clone(),
            StateKind::Gap => Vec::new(),
        }
    }

    /// Symbols of the fundamental states, in order.
    pub fn fundamental_symbols(&self) -> String {
        self.states
            .iter()
            .filter(|state| state.kind == StateKind::Fundamental)
            .map(State::symbol)
            .collect()
    }

    pub fn gap_state(&self) -> Option<StateId> {
        self.gap
    }

    pub fn missing_state(&self) -> Option<StateId> {
        self.missing
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (StateId, &State)> {
        self.states
            .iter()
            .enumerate()
            .map(|(i, state)| (StateId(i), state))
    }
}

// ============================================================================
// Helpers (private)
// ============================================================================
impl StateAlphabet {
    fn empty(case_sensitive: bool) -> Self {
        Self {
            states: Vec::new(),
            symbol_map: HashMap::new(),
            case_sensitive,
            gap: None,
            missing: None,
        }
    }

    fn molecular(
        fundamentals: &str,
        ambiguities: &[(char, &str)],
        gap: Option<char>,
        missing: Option<char>,
    ) -> Self {
        let mut alphabet = Self::empty(false);
        for symbol in fundamentals.chars() {
            alphabet.add_fundamental(symbol);
        }
        for (code, members) in ambiguities {
            alphabet.add_ambiguous(*code, members);
        }
        alphabet.add_gap_and_missing(gap, missing);
        alphabet
    }

    /// Adds a state unless its symbol is taken; returns the symbol's state.
    fn push(&mut self, symbol: char, kind: StateKind) -> StateId {
        let key = self.key(symbol);
        if let Some(&id) = self.symbol_map.get(&key) {
            return id;
        }
        let id = StateId(self.states.len());
        self.states.push(State { symbol: key, kind });
        self.symbol_map.insert(key, id);
        id
    }

    fn add_fundamental(&mut self, symbol: char) {
        self.push(symbol, StateKind::Fundamental);
    }

    fn add_ambiguous(&mut self, symbol: char, members: &str) {
        let members = members
            .chars()
            .filter_map(|member| self.state_for(member))
            .collect();
        self.push(symbol, StateKind::Ambiguous(members));
    }

    fn add_gap_and_missing(&mut self, gap: Option<char>, missing: Option<char>) {
        if let Some(gap) = gap {
            self.gap = Some(self.push(gap, StateKind::Gap));
        }
        if let Some(missing) = missing {
            let all = self
                .iter()
                .filter(|(_, state)| state.kind == StateKind::Fundamental)
                .map(|(id, _)| id)
                .collect();
            self.missing = Some(self.push(missing, StateKind::Ambiguous(all)));
        }
    }

    fn key(&self, symbol: char) -> char {
        if self.case_sensitive {
            symbol
        } else {
            symbol.to_ascii_uppercase()
        }
    }
}

// =#========================================================================#=
// CHARACTER MATRIX
// =#========================================================================$=
/// Per-taxon sequences of resolved states over one [StateAlphabet].
///
/// Rows keep the order in which taxa were first added.
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterMatrix {
    data_type: DataType,
    alphabet: StateAlphabet,
    rows: Vec<(TaxonId, Vec<StateId>)>,
    row_index: HashMap<TaxonId, usize>,
}

impl CharacterMatrix {
    pub fn new(data_type: DataType, alphabet: StateAlphabet) -> Self {
        Self {
            data_type,
            alphabet,
            rows: Vec::new(),
            row_index: HashMap::new(),
        }
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn alphabet(&self) -> &StateAlphabet {
        &self.alphabet
    }

    /// The row of `taxon`, created empty if missing.
    pub fn row_mut(&mut self, taxon: TaxonId) -> &mut Vec<StateId> {
        let index = *self.row_index.entry(taxon).or_insert_with(|| {
            self.rows.push((taxon, Vec::new()));
            self.rows.len() - 1
        });
        &mut self.rows[index].1
    }

    pub fn row(&self, taxon: TaxonId) -> Option<&[StateId]> {
        let index = *self.row_index.get(&taxon)?;
        Some(&self.rows[index].1)
    }

    /// Rows in insertion order.
    pub fn rows(&self) -> impl Iterator<Item = (TaxonId, &[StateId])> {
        self.rows.iter().map(|(taxon, row)| (*taxon, row.as_slice()))
    }

    /// Taxon and states of the first row, if any.
    pub fn first_row(&self) -> Option<(TaxonId, &[StateId])> {
        self.rows.first().map(|(taxon, row)| (*taxon, row.as_slice()))
    }

    pub fn contains(&self, taxon: TaxonId) -> bool {
        self.row_index.contains_key(&taxon)
    }

    pub fn num_taxa(&self) -> usize {
        self.rows.len()
    }

    /// Length of the longest row.
    pub fn max_row_len(&self) -> usize {
        self.rows.iter().map(|(_, row)| row.len()).max().unwrap_or(0)
    }

    /// The row of `taxon` written as symbols.
    pub fn sequence_string(&self, taxon: TaxonId) -> Option<String> {
        let row = self.row(taxon)?;
        Some(row.iter().map(|&id| self.alphabet.symbol(id)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_alphabet_ignores_repeated_symbols() {
        let alphabet = StateAlphabet::standard("0110", Some('-'), Some('?'));
        assert_eq!(alphabet.fundamental_symbols(), "01");
        assert!(alphabet.is_case_sensitive());

        let missing = alphabet.missing_state().unwrap();
        assert_eq!(alphabet.member_states(missing).len(), 2);
        assert_eq!(alphabet.state(alphabet.gap_state().unwrap()).kind(), &StateKind::Gap);
    }

    #[test]
    fn test_rna_uses_uracil() {
        let rna = StateAlphabet::rna(Some('-'), Some('?'));
        let u = rna.state_for('u').unwrap();
        let y = rna.state_for('Y').unwrap();
        assert!(rna.member_states(y).contains(&u));
        assert_eq!(rna.state_for('T'), None);
    }

    #[test]
    fn test_matrix_rows_keep_insertion_order() {
        let mut taxa = crate::model::TaxaCollection::new();
        let b = taxa.lookup_or_insert("B");
        let a = taxa.lookup_or_insert("A");
        let alphabet = StateAlphabet::standard("01", None, None);
        let zero = alphabet.state_for('0').unwrap();
        let mut matrix = CharacterMatrix::new(DataType::Standard, alphabet);
        matrix.row_mut(a).push(zero);
        matrix.row_mut(b).push(zero);
        matrix.row_mut(a).push(zero);

        let order: Vec<_> = matrix.rows().map(|(taxon, _)| taxon).collect();
        assert_eq!(order, vec![a, b]);
        assert_eq!(matrix.sequence_string(a).as_deref(), Some("00"));
        assert_eq!(matrix.max_row_len(), 2);
    }
}
