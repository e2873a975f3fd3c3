use phylonex::model::{DataType, StateKind};
use phylonex::nexus::{MatrixFormat, resolve_iupac};
use phylonex::parser::ParsingErrorKind;
use phylonex::read_dataset_str;
use pretty_assertions::assert_eq;
use rstest::rstest;

fn single_row(format: &str, nchar: usize, row: &str) -> String {
    let input = format!(
        "#NEXUS\nBEGIN DATA; DIMENSIONS NTAX=1 NCHAR={nchar}; FORMAT {format}; MATRIX Kea {row}; END;"
    );
    let dataset = read_dataset_str(input).unwrap();
    let kea = dataset.taxa().lookup_strict("Kea").unwrap();
    dataset.char_matrices()[0].sequence_string(kea).unwrap()
}

// =#========================================================================#=
// IUPAC
// =#========================================================================$=
#[rstest]
#[case("AG", 'R')]
#[case("GA", 'R')]
#[case("CT", 'Y')]
#[case("AC", 'M')]
#[case("GT", 'K')]
#[case("CG", 'S')]
#[case("AT", 'W')]
#[case("AU", 'W')]
#[case("ACG", 'V')]
#[case("ACT", 'H')]
#[case("AGT", 'D')]
#[case("CGT", 'B')]
#[case("TGCA", 'N')]
#[case("a g", 'R')]
#[case("gg", 'G')]
fn test_iupac_codes(#[case] group: &str, #[case] expected: char) {
    assert_eq!(resolve_iupac(group).unwrap(), expected);
}

#[rstest]
#[case("A")]
#[case("?")]
#[case("1")]
fn test_single_symbol_passes_through(#[case] group: &str) {
    assert_eq!(resolve_iupac(group).unwrap(), group.chars().next().unwrap());
}

#[rstest]
#[case("")]
#[case("  ")]
#[case("AX")]
#[case("01")]
fn test_unresolvable_groups(#[case] group: &str) {
    let err = resolve_iupac(group).unwrap_err();
    assert_eq!(err.kind(), &ParsingErrorKind::AmbiguityResolution(group.to_string()));
}

// =#========================================================================#=
// FORMAT
// =#========================================================================$=
#[test]
fn test_format_defaults() {
    let format = MatrixFormat::new();
    assert_eq!(format.data_type(), DataType::Standard);
    assert_eq!(format.standard_symbols(), "012");
    assert_eq!((format.gap, format.missing, format.match_char), ('-', '?', '.'));
    assert!(!format.interleave);
}

#[test]
fn test_format_symbols_are_deduplicated() {
    let mut format = MatrixFormat::new();
    format.set_symbols("0 1 1 2 0");
    assert_eq!(format.symbols(), Some("012"));

    let mut format = MatrixFormat::new();
    format.set_data_type(DataType::Standard);
    assert_eq!(format.standard_symbols(), "12");
}

#[test]
fn test_standard_alphabet_missing_state() {
    let mut format = MatrixFormat::new();
    format.set_symbols("abc");
    let alphabet = format.build_alphabet();
    assert_eq!(alphabet.fundamental_symbols(), "abc");
    assert!(alphabet.state_for('A').is_none());

    let missing = alphabet.missing_state().unwrap();
    assert_eq!(alphabet.member_states(missing).len(), 3);
    assert_eq!(alphabet.state(alphabet.gap_state().unwrap()).kind(), &StateKind::Gap);
}

// =#========================================================================#=
// ROWS
// =#========================================================================$=
#[test]
fn test_dna_is_case_insensitive() {
    assert_eq!(single_row("DATATYPE=DNA", 5, "acg-t"), "ACG-T");
}

#[test]
fn test_rna_uses_uracil() {
    assert_eq!(single_row("DATATYPE=RNA", 4, "ACGU"), "ACGU");
    assert_eq!(single_row("DATATYPE=RNA", 2, "A{AU}"), "AW");
}

#[test]
fn test_protein_row() {
    assert_eq!(single_row("DATATYPE=PROTEIN", 5, "mkv-?"), "MKV-?");
}

#[test]
fn test_custom_gap_and_missing() {
    assert_eq!(single_row("DATATYPE=DNA GAP=* MISSING=N", 4, "A*NT"), "A*NT");
}

#[test]
fn test_standard_is_case_sensitive() {
    let err = read_dataset_str(
        "#NEXUS\nBEGIN DATA; DIMENSIONS NTAX=1 NCHAR=2; FORMAT SYMBOLS=\"ab\"; MATRIX Kea aB; END;",
    )
    .unwrap_err();
    assert!(err.to_string().contains("Unrecognized symbol \"B\""));
    assert!(err.to_string().contains("Kea"));
}

#[test]
fn test_rows_must_have_nchar_states() {
    let too_long = read_dataset_str(
        "#NEXUS\nBEGIN DATA; DIMENSIONS NTAX=2 NCHAR=3; FORMAT DATATYPE=DNA; MATRIX Kea ACGT Kaka ACG; END;",
    )
    .unwrap_err();
    assert!(too_long.to_string().contains("Kea"));

    let too_short = read_dataset_str(
        "#NEXUS\nBEGIN DATA; DIMENSIONS NTAX=2 NCHAR=3; FORMAT DATATYPE=DNA; MATRIX Kea ACG Kaka AC; END;",
    )
    .unwrap_err();
    assert!(too_short.to_string().contains("Kaka"));
}

#[test]
fn test_matchchar_copies_first_row() {
    let dataset = read_dataset_str(
        "#NEXUS
        BEGIN DATA;
            DIMENSIONS NTAX=3 NCHAR=4;
            FORMAT DATATYPE=DNA MATCHCHAR=.;
            MATRIX
                Kea   ACGT
                Kaka  ..C.
                Kakapo A..{CT}
            ;
        END;",
    )
    .unwrap();
    let matrix = &dataset.char_matrices()[0];
    let taxa = dataset.taxa();
    let row = |label: &str| matrix.sequence_string(taxa.lookup_strict(label).unwrap()).unwrap();
    assert_eq!(row("Kaka"), "ACCT");
    assert_eq!(row("Kakapo"), "ACGY");
}

#[test]
fn test_interleave_no_is_sequential() {
    let sequence = single_row("DATATYPE=DNA INTERLEAVE=NO", 6, "ACG\n      TAC");
    assert_eq!(sequence, "ACGTAC");
}
