//! Core parser infrastructure: token cursor, expect helpers, errors.

use wa_lexer::token::{Token, TokenKind};
use wa_types::ast::Program;
use wa_types::{ParseError, Span};

/// The Whatalang parser.
///
/// Consumes a token stream produced by the lexer and builds an AST.
/// Stops at the first mismatch; there is no error recovery.
pub struct Parser {
    /// The token stream, ending with `Eof`.
    tokens: Vec<Token>,
    /// Current index into `tokens`.
    pos: usize,
}

impl Parser {
    /// Create a new parser from a token stream.
    ///
    /// The cursor relies on a terminating [`TokenKind::Eof`] sentinel;
    /// one is appended if the stream does not already end with it, so
    /// any token vector is accepted.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if !matches!(tokens.last(), Some(t) if t.kind == TokenKind::Eof) {
            let span = tokens.last().map_or(Span::new(1, 1), |t| t.span);
            tokens.push(Token::new(TokenKind::Eof, span));
        }
        Self { tokens, pos: 0 }
    }

    /// Parse the token stream into a [`Program`] AST.
    pub fn parse(mut self) -> Result<Program, ParseError> {
        let mut statements = Vec::new();
        while !self.at_end() {
            statements.push(self.parse_statement()?);
        }
        Ok(Program { statements })
    }

    // ── Token cursor ──────────────────────────────────────────────────

    /// Returns the current token without advancing.
    pub(crate) fn peek(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or_else(|| {
            self.tokens
                .last()
                .expect("token stream should end with Eof")
        })
    }

    /// Returns the kind of the current token.
    pub(crate) fn peek_kind(&self) -> &TokenKind {
        &self.peek().kind
    }

    /// Advance the cursor by one and return the consumed token.
    pub(crate) fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    /// Returns the span of the current token.
    pub(crate) fn current_span(&self) -> Span {
        self.peek().span
    }

    /// Returns `true` if the current token is `Eof`.
    pub(crate) fn at_end(&self) -> bool {
        matches!(self.peek_kind(), TokenKind::Eof)
    }

    /// Check if the current token matches the given kind exactly.
    pub(crate) fn check_exact(&self, kind: &TokenKind) -> bool {
        self.peek_kind() == kind
    }

    /// If the current token matches, advance and return `true`.
    pub(crate) fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check_exact(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Record the current cursor position.
    pub(crate) fn checkpoint(&self) -> usize {
        self.pos
    }

    /// Rewind the cursor to an earlier checkpoint.
    pub(crate) fn rewind(&mut self, checkpoint: usize) {
        self.pos = checkpoint;
    }

    // ── Expect helpers ────────────────────────────────────────────────

    /// Expect a specific token kind; consume and return it, or fail.
    pub(crate) fn expect(&mut self, expected: &TokenKind) -> Result<Token, ParseError> {
        if self.check_exact(expected) {
            Ok(self.advance())
        } else {
            Err(self.error_at_current(format!("'{expected}'")))
        }
    }

    /// Expect an identifier token; return its name and span.
    pub(crate) fn expect_identifier(&mut self) -> Result<(String, Span), ParseError> {
        match self.peek_kind().clone() {
            TokenKind::Identifier(name) => {
                let span = self.advance().span;
                Ok((name, span))
            }
            _ => Err(self.error_at_current("identifier")),
        }
    }

    /// Expect an identifier OR any keyword used as a field name.
    ///
    /// Keywords are contextually valid as field names in object literals,
    /// `state` block entries, and path segments after `.`
    /// (`set config.default = 1`).
    pub(crate) fn expect_field_name(&mut self) -> Result<(String, Span), ParseError> {
        let kind = self.peek_kind().clone();
        match &kind {
            TokenKind::Identifier(name) => {
                let name = name.clone();
                let span = self.advance().span;
                Ok((name, span))
            }
            _ if kind.is_keyword() => {
                let name = kind.to_string();
                let span = self.advance().span;
                Ok((name, span))
            }
            _ => Err(self.error_at_current("field name")),
        }
    }

    // ── Error construction ────────────────────────────────────────────

    /// Build a `ParseError` at the current token position.
    pub(crate) fn error_at_current(&self, expected: impl Into<String>) -> ParseError {
        let span = self.current_span();
        ParseError {
            expected: expected.into(),
            found: format!("'{}'", self.peek_kind()),
            line: span.line,
            col: span.col,
        }
    }
}
