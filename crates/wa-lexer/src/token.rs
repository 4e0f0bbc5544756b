//! Token types for the Whatalang lexer.
//!
//! Defines [`TokenKind`] covering every Whatalang lexeme and [`Token`],
//! which pairs a kind with a source [`Span`].

use std::fmt;
use wa_types::Span;

/// All reserved words in Whatalang.
///
/// These cannot be used as identifiers. The lexer recognises each one
/// and emits a specific keyword token instead of [`TokenKind::Identifier`].
/// The functional operators and `len` are reserved so that the parser
/// never needs to backtrack between a path head and a functional
/// expression.
pub const ALL_KEYWORDS: &[&str] = &[
    // Statements
    "state", "set", "print", "react", "to", "when", "default",
    // Logical operators
    "and", "or",
    // Literals
    "true", "false", "null",
    // Functional operators & built-ins
    "map", "filter", "reduce", "concat", "len",
];

/// A single token produced by the Whatalang lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Every token kind in the Whatalang language.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // ── Literals ──
    /// Numeric literal (integer or decimal): `42`, `3.14`
    Number(f64),
    /// String literal, single- or double-quoted: `"hello"`, `'hi'`
    Str(String),
    /// `true`
    True,
    /// `false`
    False,
    /// `null`
    Null,

    // ── Identifiers ──
    /// User identifier: `counter`, `user_name`
    Identifier(String),

    // ── Keywords ──
    /// `state`
    State,
    /// `set`
    Set,
    /// `print`
    Print,
    /// `react`
    React,
    /// `to`
    To,
    /// `when`
    When,
    /// `default`
    Default,
    /// `and`
    And,
    /// `or`
    Or,
    /// `map`
    Map,
    /// `filter`
    Filter,
    /// `reduce`
    Reduce,
    /// `concat`
    Concat,
    /// `len`
    Len,

    // ── Operators ──
    /// `=`
    Eq,
    /// `==`
    EqEq,
    /// `!=`
    BangEq,
    /// `<`
    Less,
    /// `>`
    Greater,
    /// `<=`
    LessEq,
    /// `>=`
    GreaterEq,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `%`
    Percent,

    // ── Punctuation ──
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `:`
    Colon,
    /// `,`
    Comma,
    /// `.`
    Dot,

    // ── Special ──
    /// End-of-input sentinel; the stream always ends with exactly one.
    Eof,
}

impl TokenKind {
    /// Look up a reserved word. Returns `None` for user identifiers.
    pub fn from_keyword(s: &str) -> Option<TokenKind> {
        Some(match s {
            "state" => TokenKind::State,
            "set" => TokenKind::Set,
            "print" => TokenKind::Print,
            "react" => TokenKind::React,
            "to" => TokenKind::To,
            "when" => TokenKind::When,
            "default" => TokenKind::Default,
            "and" => TokenKind::And,
            "or" => TokenKind::Or,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "null" => TokenKind::Null,
            "map" => TokenKind::Map,
            "filter" => TokenKind::Filter,
            "reduce" => TokenKind::Reduce,
            "concat" => TokenKind::Concat,
            "len" => TokenKind::Len,
            _ => return None,
        })
    }

    /// Returns `true` if this kind is a reserved word.
    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            TokenKind::State
                | TokenKind::Set
                | TokenKind::Print
                | TokenKind::React
                | TokenKind::To
                | TokenKind::When
                | TokenKind::Default
                | TokenKind::And
                | TokenKind::Or
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Null
                | TokenKind::Map
                | TokenKind::Filter
                | TokenKind::Reduce
                | TokenKind::Concat
                | TokenKind::Len
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Number(n) => write!(f, "{n}"),
            TokenKind::Str(s) => write!(f, "\"{s}\""),
            TokenKind::True => f.write_str("true"),
            TokenKind::False => f.write_str("false"),
            TokenKind::Null => f.write_str("null"),
            TokenKind::Identifier(s) => f.write_str(s),
            TokenKind::State => f.write_str("state"),
            TokenKind::Set => f.write_str("set"),
            TokenKind::Print => f.write_str("print"),
            TokenKind::React => f.write_str("react"),
            TokenKind::To => f.write_str("to"),
            TokenKind::When => f.write_str("when"),
            TokenKind::Default => f.write_str("default"),
            TokenKind::And => f.write_str("and"),
            TokenKind::Or => f.write_str("or"),
            TokenKind::Map => f.write_str("map"),
            TokenKind::Filter => f.write_str("filter"),
            TokenKind::Reduce => f.write_str("reduce"),
            TokenKind::Concat => f.write_str("concat"),
            TokenKind::Len => f.write_str("len"),
            TokenKind::Eq => f.write_str("="),
            TokenKind::EqEq => f.write_str("=="),
            TokenKind::BangEq => f.write_str("!="),
            TokenKind::Less => f.write_str("<"),
            TokenKind::Greater => f.write_str(">"),
            TokenKind::LessEq => f.write_str("<="),
            TokenKind::GreaterEq => f.write_str(">="),
            TokenKind::Plus => f.write_str("+"),
            TokenKind::Minus => f.write_str("-"),
            TokenKind::Star => f.write_str("*"),
            TokenKind::Slash => f.write_str("/"),
            TokenKind::Percent => f.write_str("%"),
            TokenKind::LBrace => f.write_str("{"),
            TokenKind::RBrace => f.write_str("}"),
            TokenKind::LBracket => f.write_str("["),
            TokenKind::RBracket => f.write_str("]"),
            TokenKind::LParen => f.write_str("("),
            TokenKind::RParen => f.write_str(")"),
            TokenKind::Colon => f.write_str(":"),
            TokenKind::Comma => f.write_str(","),
            TokenKind::Dot => f.write_str("."),
            TokenKind::Eof => f.write_str("end of input"),
        }
    }
}
