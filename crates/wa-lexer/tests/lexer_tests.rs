//! Lexer tests.
//!
//! Covers: all reserved keywords, operators, literals, comments,
//! whitespace and newline handling, position tracking, and lex errors.

use wa_lexer::{Lexer, TokenKind, ALL_KEYWORDS};
use wa_types::Span;

// ─────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────

/// Lex source text and return just the token kinds (excluding final Eof).
fn kinds(source: &str) -> Vec<TokenKind> {
    Lexer::new(source)
        .lex()
        .expect("lexing should succeed")
        .into_iter()
        .filter(|t| t.kind != TokenKind::Eof)
        .map(|t| t.kind)
        .collect()
}

/// Lex and return all tokens including Eof.
fn tokens(source: &str) -> Vec<wa_lexer::Token> {
    Lexer::new(source).lex().expect("lexing should succeed")
}

/// Lex and return the error message.
fn lex_error(source: &str) -> String {
    Lexer::new(source)
        .lex()
        .expect_err("lexing should fail")
        .to_string()
}

// ─────────────────────────────────────────────────────────────────────
// Keywords and identifiers
// ─────────────────────────────────────────────────────────────────────

#[test]
fn all_keywords_lex_as_keyword_tokens() {
    for kw in ALL_KEYWORDS {
        let toks = kinds(kw);
        assert_eq!(toks.len(), 1, "keyword {kw:?} should lex as one token");
        assert!(
            !matches!(toks[0], TokenKind::Identifier(_)),
            "keyword {kw:?} lexed as identifier"
        );
    }
}

#[test]
fn keywords_are_case_sensitive() {
    assert_eq!(
        kinds("State STATE state"),
        vec![
            TokenKind::Identifier("State".into()),
            TokenKind::Identifier("STATE".into()),
            TokenKind::State,
        ]
    );
}

#[test]
fn identifiers_with_underscores_and_digits() {
    assert_eq!(
        kinds("_x count2 snake_case"),
        vec![
            TokenKind::Identifier("_x".into()),
            TokenKind::Identifier("count2".into()),
            TokenKind::Identifier("snake_case".into()),
        ]
    );
}

#[test]
fn keyword_prefix_is_still_an_identifier() {
    assert_eq!(
        kinds("states mapping lens"),
        vec![
            TokenKind::Identifier("states".into()),
            TokenKind::Identifier("mapping".into()),
            TokenKind::Identifier("lens".into()),
        ]
    );
}

// ─────────────────────────────────────────────────────────────────────
// Literals
// ─────────────────────────────────────────────────────────────────────

#[test]
fn number_literals() {
    assert_eq!(
        kinds("0 42 3.14 10.0"),
        vec![
            TokenKind::Number(0.0),
            TokenKind::Number(42.0),
            TokenKind::Number(3.14),
            TokenKind::Number(10.0),
        ]
    );
}

#[test]
fn number_followed_by_dot_is_not_a_float() {
    // `items.0` style access never occurs, but `1.` must lex as the
    // number 1 followed by a dot.
    assert_eq!(
        kinds("1."),
        vec![TokenKind::Number(1.0), TokenKind::Dot]
    );
}

#[test]
fn double_quoted_string() {
    assert_eq!(
        kinds(r#""hello world""#),
        vec![TokenKind::Str("hello world".into())]
    );
}

#[test]
fn single_quoted_string() {
    assert_eq!(kinds("'abc'"), vec![TokenKind::Str("abc".into())]);
}

#[test]
fn string_quotes_do_not_nest() {
    // A single quote inside a double-quoted string is plain text.
    assert_eq!(
        kinds(r#""it's fine""#),
        vec![TokenKind::Str("it's fine".into())]
    );
}

#[test]
fn no_escape_sequences_in_strings() {
    // Backslash is an ordinary character.
    assert_eq!(
        kinds(r#""a\nb""#),
        vec![TokenKind::Str("a\\nb".into())]
    );
}

#[test]
fn empty_string() {
    assert_eq!(kinds(r#""""#), vec![TokenKind::Str(String::new())]);
}

#[test]
fn bool_and_null_literals() {
    assert_eq!(
        kinds("true false null"),
        vec![TokenKind::True, TokenKind::False, TokenKind::Null]
    );
}

// ─────────────────────────────────────────────────────────────────────
// Operators and punctuation
// ─────────────────────────────────────────────────────────────────────

#[test]
fn comparison_operators() {
    assert_eq!(
        kinds("== != < > <= >="),
        vec![
            TokenKind::EqEq,
            TokenKind::BangEq,
            TokenKind::Less,
            TokenKind::Greater,
            TokenKind::LessEq,
            TokenKind::GreaterEq,
        ]
    );
}

#[test]
fn arithmetic_operators() {
    assert_eq!(
        kinds("+ - * / %"),
        vec![
            TokenKind::Plus,
            TokenKind::Minus,
            TokenKind::Star,
            TokenKind::Slash,
            TokenKind::Percent,
        ]
    );
}

#[test]
fn two_char_operators_bind_greedily() {
    // `<==` is `<=` then `=`, not `<` then `==`.
    assert_eq!(
        kinds("<=="),
        vec![TokenKind::LessEq, TokenKind::Eq]
    );
}

#[test]
fn punctuation() {
    assert_eq!(
        kinds("{ } [ ] ( ) : , . ="),
        vec![
            TokenKind::LBrace,
            TokenKind::RBrace,
            TokenKind::LBracket,
            TokenKind::RBracket,
            TokenKind::LParen,
            TokenKind::RParen,
            TokenKind::Colon,
            TokenKind::Comma,
            TokenKind::Dot,
            TokenKind::Eq,
        ]
    );
}

// ─────────────────────────────────────────────────────────────────────
// Comments and whitespace
// ─────────────────────────────────────────────────────────────────────

#[test]
fn line_comments_are_skipped() {
    assert_eq!(
        kinds("set x = 1 // the answer\nprint x"),
        vec![
            TokenKind::Set,
            TokenKind::Identifier("x".into()),
            TokenKind::Eq,
            TokenKind::Number(1.0),
            TokenKind::Print,
            TokenKind::Identifier("x".into()),
        ]
    );
}

#[test]
fn comment_at_end_of_input() {
    assert_eq!(kinds("// nothing here"), vec![]);
}

#[test]
fn slash_inside_string_is_text() {
    assert_eq!(
        kinds(r#""http://example""#),
        vec![TokenKind::Str("http://example".into())]
    );
}

#[test]
fn newlines_are_not_tokens() {
    assert_eq!(
        kinds("1\n\n2"),
        vec![TokenKind::Number(1.0), TokenKind::Number(2.0)]
    );
}

#[test]
fn empty_source_yields_only_eof() {
    let toks = tokens("");
    assert_eq!(toks.len(), 1);
    assert_eq!(toks[0].kind, TokenKind::Eof);
}

// ─────────────────────────────────────────────────────────────────────
// Position tracking
// ─────────────────────────────────────────────────────────────────────

#[test]
fn spans_track_line_and_column() {
    let toks = tokens("set x\n  = 1");
    assert_eq!(toks[0].span, Span::new(1, 1)); // set
    assert_eq!(toks[1].span, Span::new(1, 5)); // x
    assert_eq!(toks[2].span, Span::new(2, 3)); // =
    assert_eq!(toks[3].span, Span::new(2, 5)); // 1
}

#[test]
fn string_span_is_at_opening_quote() {
    let toks = tokens(r#"  "hi""#);
    assert_eq!(toks[0].span, Span::new(1, 3));
}

// ─────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────

#[test]
fn unknown_character_is_an_error() {
    let msg = lex_error("set x = @");
    assert_eq!(msg, "1:9: unexpected character '@'");
}

#[test]
fn lone_bang_is_an_error() {
    let msg = lex_error("!x");
    assert!(msg.contains("'!'"), "got: {msg}");
}

#[test]
fn unterminated_string_is_an_error() {
    let msg = lex_error("\"abc");
    assert!(msg.contains('"'), "got: {msg}");
}

#[test]
fn newline_inside_string_is_an_error() {
    let err = Lexer::new("'ab\ncd'").lex().expect_err("should fail");
    assert_eq!((err.line, err.col), (1, 1));
}

#[test]
fn error_position_reports_offending_character() {
    let err = Lexer::new("1 + 2\n  # 3").lex().expect_err("should fail");
    assert_eq!((err.ch, err.line, err.col), ('#', 2, 3));
}
