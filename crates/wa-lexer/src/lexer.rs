//! Core Whatalang lexer: converts source text to a token stream.
//!
//! - Keywords, identifiers, numeric and string literals, operators,
//!   punctuation
//! - Single-line comments stripped (`//`)
//! - Strings are single- or double-quoted with no escape sequences;
//!   the matching quote ends the literal
//! - Whitespace (including newlines) separates tokens and is discarded
//! - Fail-fast: the first byte that starts no valid token aborts lexing
//!   with a [`LexError`]
//!
//! The stream always ends with a single [`TokenKind::Eof`] sentinel so
//! the parser can look ahead without bounds checks.

use wa_types::{LexError, Span};

use crate::token::{Token, TokenKind};

/// The Whatalang lexer.
pub struct Lexer {
    /// Source text as a character sequence.
    source: Vec<char>,
    /// Current index into `source`.
    pos: usize,
    /// Current line number (1-based).
    line: u32,
    /// Current column number (1-based).
    col: u32,
}

impl Lexer {
    /// Create a new lexer for the given source text.
    pub fn new(source: &str) -> Self {
        Self {
            source: source.chars().collect(),
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    /// Lex the entire source into a token stream ending with `Eof`.
    pub fn lex(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.scan_token()?;
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }

    // ── Character-level helpers ──────────────────────────────────────

    fn peek(&self) -> Option<char> {
        self.source.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.source.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.source.get(self.pos).copied()?;
        self.pos += 1;
        if ch == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    fn current_span(&self) -> Span {
        Span::new(self.line, self.col)
    }

    /// Skip whitespace and `//` comments.
    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(ch) if ch.is_whitespace() => {
                    self.advance();
                }
                Some('/') if self.peek_at(1) == Some('/') => {
                    // Rest-of-line comment; the newline is ordinary trivia.
                    while let Some(ch) = self.peek() {
                        if ch == '\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                _ => break,
            }
        }
    }

    // ── Scanning ─────────────────────────────────────────────────────

    fn scan_token(&mut self) -> Result<Token, LexError> {
        self.skip_trivia();

        let span = self.current_span();
        let ch = match self.advance() {
            Some(ch) => ch,
            None => return Ok(Token::new(TokenKind::Eof, span)),
        };

        let kind = match ch {
            '0'..='9' => self.scan_number(ch),
            'a'..='z' | 'A'..='Z' | '_' => self.scan_identifier(ch),
            '"' | '\'' => self.scan_string(ch, span)?,

            '=' => {
                if self.peek() == Some('=') {
                    self.advance();
                    TokenKind::EqEq
                } else {
                    TokenKind::Eq
                }
            }
            '!' => {
                if self.peek() == Some('=') {
                    self.advance();
                    TokenKind::BangEq
                } else {
                    return Err(LexError {
                        ch: '!',
                        line: span.line,
                        col: span.col,
                    });
                }
            }
            '<' => {
                if self.peek() == Some('=') {
                    self.advance();
                    TokenKind::LessEq
                } else {
                    TokenKind::Less
                }
            }
            '>' => {
                if self.peek() == Some('=') {
                    self.advance();
                    TokenKind::GreaterEq
                } else {
                    TokenKind::Greater
                }
            }

            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            // `//` was consumed as a comment above, so a bare `/` is division.
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,

            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            ':' => TokenKind::Colon,
            ',' => TokenKind::Comma,
            '.' => TokenKind::Dot,

            other => {
                return Err(LexError {
                    ch: other,
                    line: span.line,
                    col: span.col,
                });
            }
        };

        Ok(Token::new(kind, span))
    }

    /// Scan a numeric literal. The first digit is already consumed.
    fn scan_number(&mut self, first: char) -> TokenKind {
        let mut text = String::from(first);
        while let Some(ch @ '0'..='9') = self.peek() {
            text.push(ch);
            self.advance();
        }
        if self.peek() == Some('.') && matches!(self.peek_at(1), Some('0'..='9')) {
            text.push('.');
            self.advance();
            while let Some(ch @ '0'..='9') = self.peek() {
                text.push(ch);
                self.advance();
            }
        }
        // Digits and at most one dot always parse.
        TokenKind::Number(text.parse().unwrap_or(0.0))
    }

    /// Scan an identifier or keyword. The first character is consumed.
    fn scan_identifier(&mut self, first: char) -> TokenKind {
        let mut text = String::from(first);
        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                text.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        TokenKind::from_keyword(&text).unwrap_or(TokenKind::Identifier(text))
    }

    /// Scan a string literal after its opening quote.
    ///
    /// There are no escape sequences; the literal runs to the matching
    /// quote character. A newline or end of input inside the literal is
    /// a lex error at the opening quote.
    fn scan_string(&mut self, quote: char, start: Span) -> Result<TokenKind, LexError> {
        let mut text = String::new();
        loop {
            match self.peek() {
                None | Some('\n') => {
                    return Err(LexError {
                        ch: quote,
                        line: start.line,
                        col: start.col,
                    });
                }
                Some(ch) if ch == quote => {
                    self.advance();
                    return Ok(TokenKind::Str(text));
                }
                Some(ch) => {
                    text.push(ch);
                    self.advance();
                }
            }
        }
    }
}
