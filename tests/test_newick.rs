use phylonex::model::{EdgeLength, Node, TaxaCollection, Tree};
use phylonex::newick::{NewickWriter, parse_all_str, parse_str};
use phylonex::parser::ParsingErrorKind;
use phylonex::{parse_newick_str, read_dataset_str, write_newick_string};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn leaf_labels(tree: &Tree, taxa: &TaxaCollection) -> Vec<String> {
    tree.leaves()
        .map(|leaf| taxa.label(leaf.taxon().unwrap()).unwrap().to_string())
        .collect()
}

// =#========================================================================#=
// PARSING
// =#========================================================================$=
#[test]
fn test_structure_without_lengths() {
    let (tree, taxa) = parse_newick_str("(A,(B,C));").unwrap();
    let root = tree.seed_node();
    assert_eq!(root.children().len(), 2);
    assert!(root.children()[0].is_leaf());
    assert_eq!(root.children()[1].children().len(), 2);
    assert!(tree.pre_order_iter().all(|node| node.edge_length().is_absent()));
    assert_eq!(leaf_labels(&tree, &taxa), vec!["A", "B", "C"]);
    assert!(!tree.is_rooted());
}

#[test]
fn test_edge_lengths() {
    let (tree, _) = parse_newick_str("(A:0.1,B:-2.5e-1,C:1e+2):0.0;").unwrap();
    let lengths: Vec<Option<f64>> = tree
        .pre_order_iter()
        .map(|node| node.edge_length().as_f64())
        .collect();
    assert_eq!(lengths, vec![Some(0.0), Some(0.1), Some(-0.25), Some(100.0)]);
}

#[test]
fn test_literal_edge_length() {
    let (tree, _) = parse_newick_str("(A:unknown,B:1);").unwrap();
    assert_eq!(
        tree.seed_node().children()[0].edge_length(),
        &EdgeLength::Literal("unknown".into())
    );
}

#[test]
fn test_internal_labels() {
    let (tree, taxa) = parse_newick_str("((A,B)95:0.2,C)root;").unwrap();
    assert_eq!(tree.seed_node().label(), Some("root"));
    let clade = &tree.seed_node().children()[0];
    assert_eq!(clade.label(), Some("95"));
    assert_eq!(clade.taxon(), None);
    assert_eq!(clade.edge_length(), &EdgeLength::Numeric(0.2));
    assert_eq!(taxa.len(), 3);
}

#[test]
fn test_labels_and_comments() {
    let (tree, taxa) = parse_newick_str(
        "[tree from MrBayes] ('Homo sapiens':1.0, Pan_troglodytes[&support=1.0]:1.0, 'Wilson''s');",
    )
    .unwrap();
    assert_eq!(
        leaf_labels(&tree, &taxa),
        vec!["Homo sapiens", "Pan troglodytes", "Wilson's"]
    );
}

#[test]
fn test_rooting_annotation() {
    let (rooted, _) = parse_str("[&R] (A,B);").unwrap();
    assert!(rooted.is_rooted());
    let (unrooted, _) = parse_str("[&U] (A,B);").unwrap();
    assert!(!unrooted.is_rooted());
}

#[test]
fn test_multiple_trees_share_taxa() {
    let (trees, taxa) = parse_all_str("(A,B);\n(B,C);\n((A,C),D);").unwrap();
    assert_eq!(trees.len(), 3);
    assert_eq!(taxa.labels().collect::<Vec<_>>(), vec!["A", "B", "C", "D"]);
    assert_eq!(
        trees[0].leaves().nth(1).unwrap().taxon(),
        trees[1].leaves().next().unwrap().taxon()
    );
}

#[rstest]
#[case("A,B;", 2, vec!["A", "B"])]
#[case("A;", 1, vec!["A"])]
#[case("(A,B),C;", 2, vec!["A", "B", "C"])]
#[case("A:0.5,(B,C)x:0.25", 2, vec!["A", "B", "C"])]
fn test_top_level_subtrees_share_new_root(
    #[case] input: &str,
    #[case] num_children: usize,
    #[case] labels: Vec<&str>,
) {
    let (tree, taxa) = parse_newick_str(input).unwrap();
    let root = tree.seed_node();
    assert_eq!(root.label(), None);
    assert!(root.edge_length().is_absent());
    assert_eq!(root.children().len(), num_children);
    assert_eq!(leaf_labels(&tree, &taxa), labels);
}

#[test]
fn test_top_level_subtrees_keep_labels_and_lengths() {
    let (tree, _) = parse_newick_str("A:0.5,(B,C)x:0.25;").unwrap();
    let children = tree.seed_node().children();
    assert!(children[0].is_leaf());
    assert_eq!(children[0].edge_length(), &EdgeLength::Numeric(0.5));
    assert_eq!(children[1].label(), Some("x"));
    assert_eq!(children[1].children().len(), 2);
}

#[test]
fn test_top_level_subtrees_in_tree_statement() {
    let dataset = read_dataset_str("#NEXUS\nBEGIN TREES; TREE t = [&U] Kea,Kaka,Kakapo; END;").unwrap();
    let tree = dataset.trees().next().unwrap();
    assert_eq!(tree.label(), Some("t"));
    assert_eq!(tree.seed_node().children().len(), 3);
    assert_eq!(write_newick_string(&dataset).unwrap(), "(Kea,Kaka,Kakapo);\n");
}

#[test]
fn test_final_statement_without_semicolon() {
    let (trees, _) = parse_all_str("(A,B);(C,D)").unwrap();
    assert_eq!(trees.len(), 2);
}

#[rstest]
#[case("(A,B", "a clade")]
#[case("(A:", "an edge length")]
fn test_unexpected_end(#[case] input: &str, #[case] context: &str) {
    let err = parse_newick_str(input).unwrap_err();
    assert!(matches!(err.kind(), ParsingErrorKind::UnexpectedEof(_)));
    assert!(err.to_string().contains(context));
}

#[test]
fn test_empty_input() {
    let err = parse_newick_str("  [nothing here]  ").unwrap_err();
    assert!(matches!(err.kind(), ParsingErrorKind::UnexpectedEof(_)));
}

#[test]
fn test_syntax_errors() {
    let err = parse_newick_str("(A,B)C(D);").unwrap_err();
    assert!(matches!(err.kind(), ParsingErrorKind::Syntax(_)));

    let err = parse_newick_str("(A,B));").unwrap_err();
    assert!(err.to_string().contains("Expecting \";\""));
}

// =#========================================================================#=
// WRITING
// =#========================================================================$=
#[test]
fn test_round_trip_with_lengths() {
    let input = "(A:1.0,(B:2.0,C:3.0):4.0);\n";
    let dataset = read_dataset_str(input).unwrap();
    assert_eq!(write_newick_string(&dataset).unwrap(), input);
}

#[test]
fn test_round_trip_keeps_labels() {
    let input = "('Homo sapiens':0.5,('Pan troglodytes':0.25,'Wilson''s':1e-3)90:0.125);";
    let (tree, taxa) = parse_newick_str(input).unwrap();
    let written = NewickWriter::new().compose_tree(&tree, &taxa);
    let (reread, reread_taxa) = parse_newick_str(format!("{written};")).unwrap();

    assert_eq!(leaf_labels(&tree, &taxa), leaf_labels(&reread, &reread_taxa));
    assert_eq!(reread.seed_node().children()[1].label(), Some("90"));
    let lengths = |tree: &Tree| tree.pre_order_iter().map(|n| n.edge_length().clone()).collect::<Vec<_>>();
    assert_eq!(lengths(&tree), lengths(&reread));
}

#[rstest]
#[case("Pukeko", "Pukeko")]
#[case("Homo sapiens", "'Homo sapiens'")]
#[case("Pan_troglodytes", "Pan_troglodytes")]
#[case("Wilson's", "'Wilson''s'")]
#[case("a,b", "'a,b'")]
fn test_written_labels_are_quoted(#[case] label: &str, #[case] expected: &str) {
    let tree = Tree::new(Node::with_children(vec![Node::leaf(label), Node::leaf("B")]));
    let newick = NewickWriter::new().compose_tree(&tree, &TaxaCollection::new());
    assert_eq!(newick, format!("({expected},B)"));
}

#[test]
fn test_writer_options() {
    let (tree, taxa) = parse_newick_str("((A:1,B:2)x:3,C:4);").unwrap();
    let writer = NewickWriter::new().with_internal_labels(false);
    assert_eq!(writer.compose_tree(&tree, &taxa), "((A:1.0,B:2.0):3.0,C:4.0)");

    let writer = NewickWriter::new().with_edge_lengths(false);
    assert_eq!(writer.compose_tree(&tree, &taxa), "((A,B)x,C)");
}
