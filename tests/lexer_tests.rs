use sonrs::error::parse_error::ParseError;
use sonrs::lexer::Lexer;
use sonrs::tokens::token_kind::TokenKind;
use sonrs::tokens::token_kind::TokenKind::*;

// Helper function to lex input and return TokenKinds
fn lex_kinds(input: &str) -> Vec<Result<TokenKind, ParseError>> {
    let mut lexer = Lexer::new("test.smp", input);
    let mut tokens = Vec::new();
    while let Some(token) = lexer.next_token() {
        tokens.push(token.map(|t| t.kind));
    }
    tokens
}

fn lex_ok(input: &str) -> Vec<TokenKind> {
    lex_kinds(input).into_iter().map(|t| t.unwrap()).collect()
}

#[test]
fn operators_and_punctuation() {
    let tokens = lex_ok("== != <= >= < > ! = + - * / ; ( ) { }");
    let expected = vec![
        EqualEqual,
        NotEqual,
        LessEqual,
        GreaterEqual,
        Less,
        Greater,
        Not,
        Equal,
        Plus,
        Minus,
        Star,
        Slash,
        Semicolon,
        OpenParen,
        CloseParen,
        OpenBrace,
        CloseBrace,
        Eof,
    ];
    assert_eq!(tokens, expected);
}

#[test]
fn keywords() {
    let tokens = lex_ok("if else int return true false");
    let expected = vec![
        KeywordIf,
        KeywordElse,
        KeywordInt,
        KeywordReturn,
        KeywordTrue,
        KeywordFalse,
        Eof,
    ];
    assert_eq!(tokens, expected);
}

#[test]
fn keyword_prefix_is_an_identifier() {
    // Longest match wins: these are identifiers, not keyword + suffix
    let tokens = lex_ok("ifx inta returned truex");
    let expected = vec![
        Identifier("ifx".to_owned()),
        Identifier("inta".to_owned()),
        Identifier("returned".to_owned()),
        Identifier("truex".to_owned()),
        Eof,
    ];
    assert_eq!(tokens, expected);
}

#[test]
fn identifiers_with_underscores() {
    let tokens = lex_ok("_x x_1 __");
    let expected = vec![
        Identifier("_x".to_owned()),
        Identifier("x_1".to_owned()),
        Identifier("__".to_owned()),
        Eof,
    ];
    assert_eq!(tokens, expected);
}

#[test]
fn integers() {
    let tokens = lex_ok("0 7 123456789");
    assert_eq!(tokens, vec![Integer(0), Integer(7), Integer(123_456_789), Eof]);
}

#[test]
fn leading_zero_is_rejected() {
    let tokens = lex_kinds("0123");
    assert_eq!(
        tokens[0].as_ref().unwrap_err().to_string(),
        "Syntax error: integer values cannot start with '0'"
    );
}

#[test]
fn zero_alone_is_fine() {
    assert_eq!(lex_ok("0"), vec![Integer(0), Eof]);
}

#[test]
fn control_characters_are_whitespace() {
    // Anything at or below 0x20 separates tokens
    let tokens = lex_ok("1\t+\n2\r\n+\x0b3  ");
    assert_eq!(tokens, vec![Integer(1), Plus, Integer(2), Plus, Integer(3), Eof]);
}

#[test]
fn show_graph_directive() {
    let tokens = lex_ok("#showGraph;");
    assert_eq!(tokens, vec![ShowGraph, Semicolon, Eof]);
}

#[test]
fn stray_hash_is_an_error() {
    let tokens = lex_kinds("# showGraph");
    assert!(matches!(tokens[0], Err(ParseError::Unexpected { .. })));
}

#[test]
fn eof_is_emitted_once() {
    let tokens = lex_ok("");
    assert_eq!(tokens, vec![Eof]);
}

#[test]
fn spans_track_lines_and_columns() {
    let mut lexer = Lexer::new("test.smp", "int a=1;\nreturn a;");
    let mut last = None;
    while let Some(token) = lexer.next_token() {
        last = Some(token.unwrap());
    }
    let eof = last.unwrap();
    assert_eq!(eof.kind, Eof);
    assert_eq!(eof.span.start.line, 2);
    let loc = lexer.line_tracker().location_for(9);
    assert_eq!((loc.line, loc.column), (2, 1));
}
