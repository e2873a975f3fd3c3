use phylonex::nexus::NexusWriter;
use phylonex::{
    Dataset, ReadStrategy, read_dataset_file, read_dataset_str, write_newick_file,
    write_nexus_file, write_nexus_string,
};
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::fs;

const KIWI_NEXUS: &str = "#NEXUS
BEGIN TAXA;
    DIMENSIONS NTAX=3;
    TAXLABELS Kiwi 'Little spotted' Emu;
END;
BEGIN CHARACTERS;
    DIMENSIONS NCHAR=4;
    FORMAT DATATYPE=DNA;
    MATRIX
        Kiwi ACGT
        'Little spotted' AC-T
        Emu A?{AG}T
    ;
END;
BEGIN TREES;
    TREE best = [&R] (Kiwi:0.5,('Little spotted':0.25,Emu:0.25):0.25);
END;";

fn kiwi_dataset() -> Dataset {
    read_dataset_str(KIWI_NEXUS).unwrap()
}

#[test]
fn test_nexus_document_layout() {
    let expected = "\
#NEXUS

BEGIN TAXA;
    DIMENSIONS NTAX=3;
    TAXLABELS
        Kiwi
        'Little spotted'
        Emu
  ;
END;

BEGIN CHARACTERS;
    DIMENSIONS NCHAR=4;
    FORMAT DATATYPE=DNA GAP=- MISSING=? MATCHCHAR=.;
    MATRIX
Kiwi                ACGT
'Little spotted'    AC-T
Emu                 A?RT
    ;
END;

BEGIN TREES;
    tree best = [&R] (Kiwi:0.5,('Little spotted':0.25,Emu:0.25):0.25);
END;

";
    assert_eq!(write_nexus_string(&kiwi_dataset()).unwrap(), expected);
}

#[test]
fn test_simple_mode_writes_data_block() {
    let mut writer = NexusWriter::new(Vec::new()).with_simple(true);
    writer.write_dataset(&kiwi_dataset()).unwrap();
    let text = String::from_utf8(writer.into_inner()).unwrap();

    assert!(!text.contains("BEGIN TAXA;"));
    assert!(text.contains("BEGIN DATA;\n    DIMENSIONS NTAX=3 NCHAR=4;\n"));

    let reread = read_dataset_str(&text).unwrap();
    assert_eq!(reread.char_matrices(), kiwi_dataset().char_matrices());
}

#[test]
fn test_standard_matrix_lists_symbols() {
    let dataset = read_dataset_str(
        "#NEXUS\nBEGIN DATA; DIMENSIONS NTAX=2 NCHAR=3; FORMAT SYMBOLS=\"0 1\"; MATRIX A 01? B 1-0; END;",
    )
    .unwrap();
    let text = write_nexus_string(&dataset).unwrap();
    assert!(text.contains("    FORMAT DATATYPE=STANDARD SYMBOLS=\"01\" GAP=- MISSING=? MATCHCHAR=.;\n"));
}

#[test]
fn test_short_rows_are_padded_with_gaps() {
    let mut dataset = kiwi_dataset();
    let emu = dataset.taxa().lookup_strict("Emu").unwrap();
    let (taxa, mut matrices, trees) = std::mem::take(&mut dataset).into_parts();
    matrices[0].row_mut(emu).truncate(2);

    let mut dataset = Dataset::with_taxa(taxa);
    matrices.into_iter().for_each(|matrix| dataset.add_char_matrix(matrix));
    trees.into_iter().for_each(|block| dataset.add_trees_block(block));

    let text = write_nexus_string(&dataset).unwrap();
    assert!(text.contains("Emu                 A?--\n"));
}

#[test]
fn test_comments_in_header() {
    let mut writer = NexusWriter::new(Vec::new()).with_comment("first\nsecond");
    writer.write_dataset(&Dataset::new()).unwrap();
    let text = String::from_utf8(writer.into_inner()).unwrap();
    assert_eq!(text, "#NEXUS\n\n[ first ]\n[ second ]\n\n");
}

#[rstest]
#[case(ReadStrategy::Buffered)]
#[case(ReadStrategy::InMemory)]
#[case(ReadStrategy::Automatic)]
fn test_file_round_trip(#[case] strategy: ReadStrategy) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("kiwi.nex");
    let original = kiwi_dataset();

    write_nexus_file(&path, &original).unwrap();
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        write_nexus_string(&original).unwrap()
    );

    let reread = read_dataset_file(&path, strategy).unwrap();
    assert_eq!(
        reread.taxa().labels().collect::<Vec<_>>(),
        original.taxa().labels().collect::<Vec<_>>()
    );
    assert_eq!(reread.char_matrices(), original.char_matrices());
    assert_eq!(reread.trees_blocks(), original.trees_blocks());
}

#[test]
fn test_newick_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("birds.nwk");
    let dataset = read_dataset_str("(Kea:1.0,(Kaka:0.5,Kakapo:0.5):0.5);\n(Kea,Kakapo);").unwrap();

    write_newick_file(&path, &dataset).unwrap();
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "(Kea:1.0,(Kaka:0.5,Kakapo:0.5):0.5);\n(Kea,Kakapo);\n"
    );
    let reread = read_dataset_file(&path, ReadStrategy::Buffered).unwrap();
    assert_eq!(reread.trees().count(), 2);
    assert_eq!(reread.taxa().labels().collect::<Vec<_>>(), vec!["Kea", "Kaka", "Kakapo"]);
}

#[test]
fn test_file_writers_report_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("out.nex");
    let dataset = kiwi_dataset();

    let err = write_nexus_file(&path, &dataset).unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    let err = write_newick_file(&path, &dataset).unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    assert!(!path.exists());
}
