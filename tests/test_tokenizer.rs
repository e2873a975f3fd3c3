use phylonex::parser::{InMemoryByteSource, NexusTokenizer, StreamByteSource, Token};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn tokenizer(input: &str) -> NexusTokenizer<InMemoryByteSource> {
    NexusTokenizer::new(InMemoryByteSource::from_str(input))
}

fn all_tokens(input: &str) -> Vec<Token> {
    let mut tokenizer = tokenizer(input);
    std::iter::from_fn(|| tokenizer.next_token()).collect()
}

fn word(text: &str) -> Token {
    Token::Word(text.to_string())
}

#[test]
fn test_statement_tokens() {
    assert_eq!(
        all_tokens("DIMENSIONS NTAX=3;"),
        vec![
            word("DIMENSIONS"),
            word("NTAX"),
            Token::Punct('='),
            word("3"),
            Token::Punct(';'),
        ]
    );
}

#[test]
fn test_quoted_labels() {
    assert_eq!(
        all_tokens("'Wilson''s storm-petrel' 'a;b' ''"),
        vec![
            Token::Quoted("Wilson's storm-petrel".into()),
            Token::Quoted("a;b".into()),
            Token::Quoted(String::new()),
        ]
    );
}

#[test]
fn test_unterminated_quote_runs_to_end() {
    assert_eq!(all_tokens("'Homo sapiens"), vec![Token::Quoted("Homo sapiens".into())]);
}

#[test]
fn test_nested_comments_are_skipped() {
    assert_eq!(
        all_tokens("A [outer [inner] still outer] B [trailing"),
        vec![word("A"), word("B")]
    );
}

#[test]
fn test_comment_ends_word() {
    assert_eq!(all_tokens("GTAC[codon 3]NN"), vec![word("GTAC"), word("NN")]);
}

#[test]
fn test_annotations_are_recorded() {
    let mut tokenizer = tokenizer("[&R] [plain] (A,B);");
    assert_eq!(tokenizer.next_token(), Some(Token::Punct('(')));
    assert_eq!(tokenizer.take_annotations(), vec!["&R".to_string()]);
    assert!(tokenizer.take_annotations().is_empty());
}

#[rstest]
#[case("Homo_sapiens", "Homo sapiens")]
#[case("'Homo_sapiens'", "Homo_sapiens")]
#[case("'Homo sapiens'", "Homo sapiens")]
#[case("Pan", "Pan")]
fn test_into_label(#[case] input: &str, #[case] expected: &str) {
    let token = tokenizer(input).next_token().unwrap();
    assert_eq!(token.into_label(), expected);
}

#[test]
fn test_keywords_ignore_case() {
    let mut tokenizer = tokenizer("begin Trees;");
    assert!(tokenizer.next_token().unwrap().is_keyword("BEGIN"));
    assert_eq!(tokenizer.next_token_uppercased(), Some(word("TREES")));
    assert!(!Token::Quoted("END".into()).is_keyword("END"));
}

#[test]
fn test_ignored_punctuation() {
    let mut tokenizer = tokenizer(":1e-5,");
    assert_eq!(tokenizer.next_token(), Some(Token::Punct(':')));
    assert_eq!(tokenizer.next_token_ignoring(b"-+"), Some(word("1e-5")));
    assert_eq!(tokenizer.next_token(), Some(Token::Punct(',')));
}

#[test]
fn test_positions_count_lines() {
    let mut tokenizer = tokenizer("#NEXUS\nBEGIN TREES;\n  TREE t1 Homo;");
    for _ in 0..5 {
        tokenizer.next_token();
    }
    assert_eq!(tokenizer.current_token(), Some(&word("TREE")));
    let position = tokenizer.position();
    assert_eq!(position.line, 3);
    assert_eq!(position.column, 7);
}

#[test]
fn test_require_token_at_end() {
    let mut tokenizer = tokenizer("END");
    assert!(tokenizer.require_token("TAXA block").is_ok());
    let err = tokenizer.require_token("TAXA block").unwrap_err();
    assert!(err.to_string().contains("input ended while reading TAXA block"));
}

#[test]
fn test_skip_to_semicolon() {
    let mut tokenizer = tokenizer("TYPESET * default = unord: 1-12; END;");
    tokenizer.skip_to_semicolon();
    assert_eq!(tokenizer.next_token(), Some(word("END")));
}

#[test]
fn test_stream_source_cannot_rewind() {
    let mut stream = NexusTokenizer::new(StreamByteSource::new("(A,B);".as_bytes()));
    assert!(!stream.is_seekable());
    assert!(stream.rewind().is_err());

    let mut memory = tokenizer("(A,B);");
    assert_eq!(memory.next_token(), Some(Token::Punct('(')));
    memory.rewind().unwrap();
    assert_eq!(memory.next_token(), Some(Token::Punct('(')));
}
