use phylonex::model::TaxaCollection;
use phylonex::{read_dataset_str, write_newick_string};

#[test]
fn test_lookup_or_insert_keeps_order() {
    let mut taxa = TaxaCollection::new();
    let kea = taxa.lookup_or_insert("Kea");
    let kaka = taxa.lookup_or_insert("Kaka");
    assert_eq!(taxa.lookup_or_insert("Kea"), kea);
    assert_ne!(kea, kaka);
    assert_eq!(kea.index(), 0);
    assert_eq!(kaka.index(), 1);
    assert_eq!(taxa[kaka].label(), "Kaka");
}

#[test]
fn test_lookup_strict_never_inserts() {
    let mut taxa = TaxaCollection::new();
    taxa.lookup_or_insert("Kea");
    assert_eq!(taxa.lookup_strict("Kakapo"), None);
    assert_eq!(taxa.len(), 1);
    assert!(!taxa.contains_label("Kakapo"));
}

#[test]
fn test_labels_are_case_sensitive() {
    let mut taxa = TaxaCollection::new();
    let upper = taxa.lookup_or_insert("Kea");
    let lower = taxa.lookup_or_insert("kea");
    assert_ne!(upper, lower);
}

#[test]
fn test_set_label_keeps_identity() {
    let mut taxa = TaxaCollection::new();
    let kea = taxa.lookup_or_insert("Kea");
    let kaka = taxa.lookup_or_insert("Kaka");

    assert!(taxa.set_label(kea, "Nestor notabilis"));
    assert_eq!(taxa.lookup_strict("Nestor notabilis"), Some(kea));
    assert_eq!(taxa.lookup_strict("Kea"), None);
    assert_eq!(taxa.label(kea), Some("Nestor notabilis"));

    // taken by another taxon
    assert!(!taxa.set_label(kea, "Kaka"));
    assert_eq!(taxa.label(kea), Some("Nestor notabilis"));
    assert_eq!(taxa.lookup_strict("Kaka"), Some(kaka));
}

#[test]
fn test_relabelled_taxon_is_written() {
    let mut dataset = read_dataset_str("(Kea,(Kaka,Kakapo));").unwrap();
    let kakapo = dataset.taxa().lookup_strict("Kakapo").unwrap();
    assert!(dataset.taxa_mut().set_label(kakapo, "Strigops"));
    assert_eq!(write_newick_string(&dataset).unwrap(), "(Kea,(Kaka,Strigops));\n");
}

#[test]
fn test_display() {
    let mut taxa = TaxaCollection::new();
    assert_eq!(taxa.to_string(), "TaxaCollection (0 taxa): []");
    taxa.lookup_or_insert("Kea");
    taxa.lookup_or_insert("Rifleman");
    assert_eq!(taxa.to_string(), "TaxaCollection (2 taxa): [Kea, Rifleman]");
}
