//! Character matrix reading: `FORMAT` state, IUPAC ambiguity groups and
//! sequential/interleaved `MATRIX` rows.

use crate::model::{CharacterMatrix, DataType, StateAlphabet, StateId, TaxaCollection, TaxonId};
use crate::nexus::defs::{
    DEFAULT_GAP, DEFAULT_MATCHCHAR, DEFAULT_MISSING, DEFAULT_STANDARD_SYMBOLS,
    EXPLICIT_STANDARD_SYMBOLS,
};
use crate::parser::byte_source::ByteSource;
use crate::parser::parsing_error::{ParsingError, Position};
use crate::parser::scanner::{Scanner, is_whitespace};
use crate::parser::tokenizer::NexusTokenizer;

// =#========================================================================#=
// MATRIX FORMAT
// =#========================================================================$=
/// Settings of a `FORMAT` command, scoped to one CHARACTERS/DATA block.
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixFormat {
    data_type: DataType,
    explicit_data_type: bool,
    symbols: Option<String>,
    pub gap: char,
    pub missing: char,
    pub match_char: char,
    pub interleave: bool,
}

impl Default for MatrixFormat {
    fn default() -> Self {
        Self {
            data_type: DataType::Standard,
            explicit_data_type: false,
            symbols: None,
            gap: DEFAULT_GAP,
            missing: DEFAULT_MISSING,
            match_char: DEFAULT_MATCHCHAR,
            interleave: false,
        }
    }
}

impl MatrixFormat {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// Sets the datatype of a `DATATYPE=` entry.
    pub fn set_data_type(&mut self, data_type: DataType) {
        self.data_type = data_type;
        self.explicit_data_type = true;
    }

    /// Sets the symbols of a `SYMBOLS=` entry; whitespace and repeated
    /// symbols are dropped.
    pub fn set_symbols(&mut self, symbols: &str) {
        let mut unique = String::new();
        for symbol in symbols.chars().filter(|c| !c.is_whitespace()) {
            if !unique.contains(symbol) {
                unique.push(symbol);
            }
        }
        self.symbols = Some(unique);
    }

    /// Explicit symbols, if a `SYMBOLS=` entry was read.
    pub fn symbols(&self) -> Option<&str> {
        self.symbols.as_deref()
    }

    /// Symbols a STANDARD alphabet is built from.
    pub fn standard_symbols(&self) -> &str {
        match (&self.symbols, self.explicit_data_type) {
            (Some(symbols), _) => symbols,
            (None, true) => EXPLICIT_STANDARD_SYMBOLS,
            (None, false) => DEFAULT_STANDARD_SYMBOLS,
        }
    }

    /// The alphabet a matrix in this format is resolved against.
    pub fn build_alphabet(&self) -> StateAlphabet {
        StateAlphabet::for_data_type(
            self.data_type,
            self.standard_symbols(),
            Some(self.gap),
            Some(self.missing),
        )
    }
}

// =#========================================================================#=
// IUPAC AMBIGUITY GROUPS
// =#========================================================================$=
const BASE_A: u8 = 0b0001;
const BASE_C: u8 = 0b0010;
const BASE_G: u8 = 0b0100;
const BASE_T: u8 = 0b1000;

/// Ambiguity code per set of bases.
const IUPAC_CODES: &[(u8, char)] = &[
    (BASE_A | BASE_C, 'M'),
    (BASE_A | BASE_G, 'R'),
    (BASE_A | BASE_T, 'W'),
    (BASE_C | BASE_G, 'S'),
    (BASE_C | BASE_T, 'Y'),
    (BASE_G | BASE_T, 'K'),
    (BASE_A | BASE_C | BASE_G, 'V'),
    (BASE_A | BASE_C | BASE_T, 'H'),
    (BASE_A | BASE_G | BASE_T, 'D'),
    (BASE_C | BASE_G | BASE_T, 'B'),
    (BASE_A | BASE_C | BASE_G | BASE_T, 'N'),
];

fn base_bit(base: char) -> Option<u8> {
    match base.to_ascii_uppercase() {
        'A' => Some(BASE_A),
        'C' => Some(BASE_C),
        'G' => Some(BASE_G),
        'T' | 'U' => Some(BASE_T),
        _ => None,
    }
}

/// Resolves the content of a `{...}` group to its single-character IUPAC
/// code.
///
/// The result depends only on the set of bases, not on their order; `U`
/// counts as `T`. A group of a single character is returned as is.
///
/// # Errors
/// [AmbiguityResolution](crate::parser::ParsingErrorKind::AmbiguityResolution)
/// naming the group if it is empty or holds anything but nucleotides.
///
/// # Example
/// ```
/// use phylonex::nexus::resolve_iupac;
///
/// assert_eq!(resolve_iupac("AG")?, 'R');
/// assert_eq!(resolve_iupac("TCA")?, resolve_iupac("ACT")?);
/// assert!(resolve_iupac("AX").is_err());
/// # Ok::<(), phylonex::ParsingError>(())
/// ```
pub fn resolve_iupac(group: &str) -> Result<char, ParsingError> {
    let symbols: Vec<char> = group.chars().filter(|c| !c.is_whitespace()).collect();
    let Some(&first) = symbols.first() else {
        return Err(ParsingError::ambiguity(group, None));
    };
    if symbols.len() == 1 {
        return Ok(first);
    }

    let mut mask = 0u8;
    for &base in &symbols {
        mask |= base_bit(base).ok_or_else(|| ParsingError::ambiguity(group, None))?;
    }
    if mask.count_ones() == 1 {
        return Ok(first.to_ascii_uppercase());
    }

    IUPAC_CODES
        .iter()
        .find(|(bases, _)| *bases == mask)
        .map(|(_, code)| *code)
        .ok_or_else(|| ParsingError::ambiguity(group, None))
}

// =#========================================================================#=
// MATRIX READER
// =#========================================================================$=
/// Reads the rows of a `MATRIX` command into a [CharacterMatrix].
///
/// Rows are `label sequence` pairs until `;`. In sequential layout a
/// sequence runs over whitespace and line breaks until it holds `nchar`
/// states; in interleaved layout each line adds one chunk to its taxon's
/// row and taxa repeat until all rows are complete.
pub(crate) struct MatrixReader<'a> {
    format: &'a MatrixFormat,
    ntax: usize,
    nchar: usize,
}

impl<'a> MatrixReader<'a> {
    pub(crate) fn new(format: &'a MatrixFormat, ntax: usize, nchar: usize) -> Self {
        Self { format, ntax, nchar }
    }

    /// Reads all rows, including the closing `;`.
    ///
    /// # Errors
    /// A syntax error on unknown symbols, misplaced match characters and
    /// rows whose final length differs from `nchar`; an
    /// [UnexpectedEof](crate::parser::ParsingErrorKind::UnexpectedEof) if
    /// the input ends before `;`.
    pub(crate) fn read<S: ByteSource>(
        &self,
        tokenizer: &mut NexusTokenizer<S>,
        taxa: &mut TaxaCollection,
    ) -> Result<CharacterMatrix, ParsingError> {
        let mut matrix = CharacterMatrix::new(self.format.data_type, self.format.build_alphabet());

        loop {
            let token = tokenizer.require_token("MATRIX")?;
            if token.is_punct(';') {
                break;
            }
            let label = token.into_label();
            let taxon = taxa.lookup_or_insert(&label);
            matrix.row_mut(taxon);
            self.read_row(tokenizer.scanner_mut(), &mut matrix, taxon, &label)?;
        }

        self.validate(&matrix, taxa, tokenizer.position())?;
        if matrix.num_taxa() != self.ntax {
            tracing::warn!(
                "MATRIX holds {} taxa but NTAX={} was declared",
                matrix.num_taxa(),
                self.ntax
            );
        }
        tracing::debug!(
            "Read {} matrix of {} taxa x {} characters",
            matrix.data_type().keyword(),
            matrix.num_taxa(),
            self.nchar
        );
        Ok(matrix)
    }
}

// ============================================================================
// Row reading (private)
// ============================================================================
impl MatrixReader<'_> {
    /// Reads one sequence (sequential) or one line chunk (interleaved).
    fn read_row<S: ByteSource>(
        &self,
        scanner: &mut Scanner<S>,
        matrix: &mut CharacterMatrix,
        taxon: TaxonId,
        label: &str,
    ) -> Result<(), ParsingError> {
        let interleave = self.format.interleave;
        loop {
            if !interleave && row_len(matrix, taxon) >= self.nchar {
                break;
            }
            let Some(byte) = scanner.current() else {
                break;
            };
            match byte {
                b'\n' | b'\r' if interleave => break,
                b';' => break,
                b'[' => scanner.skip_comment(),
                b'{' => {
                    let position = scanner.position();
                    let symbol = read_group(scanner)?;
                    self.push_symbol(matrix, taxon, label, symbol, position)?;
                }
                b if is_whitespace(b) => {
                    scanner.advance();
                }
                b => {
                    let position = scanner.position();
                    scanner.advance();
                    self.push_symbol(matrix, taxon, label, char::from(b), position)?;
                }
            }
        }

        if !interleave {
            if let Some(byte) = scanner.current() {
                if !is_whitespace(byte) && byte != b';' && byte != b'[' {
                    return Err(ParsingError::syntax(
                        format!(
                            "Sequence of taxon \"{label}\" is longer than NCHAR={}",
                            self.nchar
                        ),
                        scanner.position(),
                    ));
                }
            }
        }
        Ok(())
    }

    fn push_symbol(
        &self,
        matrix: &mut CharacterMatrix,
        taxon: TaxonId,
        label: &str,
        symbol: char,
        position: Position,
    ) -> Result<(), ParsingError> {
        let state = if symbol == self.format.match_char {
            self.match_state(matrix, taxon, label, position)?
        } else {
            matrix.alphabet().state_for(symbol).ok_or_else(|| {
                ParsingError::syntax(
                    format!("Unrecognized symbol \"{symbol}\" in MATRIX row of taxon \"{label}\""),
                    position,
                )
            })?
        };
        matrix.row_mut(taxon).push(state);
        Ok(())
    }

    /// State of the first row at the column the match character is in.
    fn match_state(
        &self,
        matrix: &CharacterMatrix,
        taxon: TaxonId,
        label: &str,
        position: Position,
    ) -> Result<StateId, ParsingError> {
        let match_char = self.format.match_char;
        let column = row_len(matrix, taxon);
        match matrix.first_row() {
            Some((first, states)) if first != taxon => {
                states.get(column).copied().ok_or_else(|| {
                    ParsingError::syntax(
                        format!(
                            "MATCHCHAR \"{match_char}\" at character {} of taxon \"{label}\" has no counterpart in the first row",
                            column + 1
                        ),
                        position,
                    )
                })
            }
            _ => Err(ParsingError::syntax(
                format!("MATCHCHAR \"{match_char}\" used in the first row of MATRIX (taxon \"{label}\")"),
                position,
            )),
        }
    }

    /// Every row must hold exactly `nchar` states once the matrix is read.
    fn validate(
        &self,
        matrix: &CharacterMatrix,
        taxa: &TaxaCollection,
        position: Position,
    ) -> Result<(), ParsingError> {
        for (taxon, row) in matrix.rows() {
            if row.len() != self.nchar {
                return Err(ParsingError::syntax(
                    format!(
                        "Expecting {} characters for taxon \"{}\" but found {}",
                        self.nchar,
                        taxa.label(taxon).unwrap_or_default(),
                        row.len()
                    ),
                    position,
                ));
            }
        }
        Ok(())
    }
}

fn row_len(matrix: &CharacterMatrix, taxon: TaxonId) -> usize {
    matrix.row(taxon).map_or(0, <[StateId]>::len)
}

/// Reads a `{...}` group starting at the `{` and resolves it.
fn read_group<S: ByteSource>(scanner: &mut Scanner<S>) -> Result<char, ParsingError> {
    let start = scanner.position();
    let mut content = String::new();
    scanner.advance();
    loop {
        match scanner.current() {
            None => {
                if let Some(err) = scanner.take_source_error() {
                    return Err(err);
                }
                return Err(ParsingError::unexpected_eof(
                    format!("input ended inside ambiguity group \"{{{content}\""),
                    start,
                ));
            }
            Some(b'}') => {
                scanner.advance();
                break;
            }
            Some(byte) => {
                content.push(char::from(byte));
                scanner.advance();
            }
        }
    }
    resolve_iupac(&content).map_err(|err| err.or_at(start))
}
