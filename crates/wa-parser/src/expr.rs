//! Expression parsing with full operator precedence.
//!
//! Precedence (lowest → highest):
//! 5. `or`
//! 4. `and`
//! 3. `==`, `!=`, `<`, `>`, `<=`, `>=` (no chaining)
//! 2. `+`, `-`
//! 1. `*`, `/`, `%`
//! 0. unary `-`, atoms (literals, paths, `state`, `(...)`, collection
//!    literals, `len(...)`, functional operators)
//!
//! Each binary level is split into a `parse_X` entry and a
//! `parse_X_rest` continuation so a `map`/`filter` operation expression
//! can start mid-chain: the implicit element is injected as the left
//! operand and the rest of the chain parses normally (`* 2`,
//! `% 2 == 0`, `.age >= 18`).

use wa_lexer::token::TokenKind;
use wa_types::ast::{
    BinOp, CompareOp, Expr, ExprKind, LogicalOp, PathExpr, PathSegment,
};
use wa_types::ParseError;

use crate::parser::Parser;

impl Parser {
    /// Parse an expression.
    pub(crate) fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.parse_or()
    }

    // ══════════════════════════════════════════════════════════════════
    // Precedence chain
    // ══════════════════════════════════════════════════════════════════

    /// `OrExpr = AndExpr { "or" AndExpr }`
    fn parse_or(&mut self) -> Result<Expr, ParseError> {
        let left = self.parse_and()?;
        self.parse_or_rest(left)
    }

    fn parse_or_rest(&mut self, mut left: Expr) -> Result<Expr, ParseError> {
        while self.eat(&TokenKind::Or) {
            let right = self.parse_and()?;
            let span = left.span;
            left = Expr::new(
                ExprKind::Logical {
                    op: LogicalOp::Or,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                span,
            );
        }
        Ok(left)
    }

    /// `AndExpr = CompExpr { "and" CompExpr }`
    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        let left = self.parse_comparison()?;
        self.parse_and_rest(left)
    }

    fn parse_and_rest(&mut self, mut left: Expr) -> Result<Expr, ParseError> {
        while self.eat(&TokenKind::And) {
            let right = self.parse_comparison()?;
            let span = left.span;
            left = Expr::new(
                ExprKind::Logical {
                    op: LogicalOp::And,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                span,
            );
        }
        Ok(left)
    }

    /// `CompExpr = AddExpr [ CompOp AddExpr ]`
    ///
    /// Comparison operators do NOT chain: `a < b < c` is a parse error.
    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        let left = self.parse_add()?;
        self.parse_comparison_rest(left)
    }

    fn parse_comparison_rest(&mut self, mut left: Expr) -> Result<Expr, ParseError> {
        if let Some(op) = self.match_comparison_op() {
            self.advance();
            let right = self.parse_add()?;
            let span = left.span;
            left = Expr::new(
                ExprKind::Binary {
                    left: Box::new(left),
                    op: BinOp::Compare(op),
                    right: Box::new(right),
                },
                span,
            );
            // Reject chaining
            if self.match_comparison_op().is_some() {
                return Err(self.error_at_current(
                    "'and'/'or' to combine comparisons (comparison operators cannot be chained)",
                ));
            }
        }
        Ok(left)
    }

    /// Check if current token is a comparison operator.
    fn match_comparison_op(&self) -> Option<CompareOp> {
        match self.peek_kind() {
            TokenKind::EqEq => Some(CompareOp::Eq),
            TokenKind::BangEq => Some(CompareOp::NotEq),
            TokenKind::Less => Some(CompareOp::Less),
            TokenKind::Greater => Some(CompareOp::Greater),
            TokenKind::LessEq => Some(CompareOp::LessEq),
            TokenKind::GreaterEq => Some(CompareOp::GreaterEq),
            _ => None,
        }
    }

    /// `AddExpr = MulExpr { ("+" | "-") MulExpr }`
    fn parse_add(&mut self) -> Result<Expr, ParseError> {
        let left = self.parse_mul()?;
        self.parse_add_rest(left)
    }

    fn parse_add_rest(&mut self, mut left: Expr) -> Result<Expr, ParseError> {
        loop {
            let op = match self.peek_kind() {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_mul()?;
            let span = left.span;
            left = Expr::new(
                ExprKind::Binary {
                    left: Box::new(left),
                    op,
                    right: Box::new(right),
                },
                span,
            );
        }
        Ok(left)
    }

    /// `MulExpr = UnaryExpr { ("*" | "/" | "%") UnaryExpr }`
    fn parse_mul(&mut self) -> Result<Expr, ParseError> {
        let left = self.parse_unary()?;
        self.parse_mul_rest(left)
    }

    fn parse_mul_rest(&mut self, mut left: Expr) -> Result<Expr, ParseError> {
        loop {
            let op = match self.peek_kind() {
                TokenKind::Star => BinOp::Mul,
                TokenKind::Slash => BinOp::Div,
                TokenKind::Percent => BinOp::Mod,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            let span = left.span;
            left = Expr::new(
                ExprKind::Binary {
                    left: Box::new(left),
                    op,
                    right: Box::new(right),
                },
                span,
            );
        }
        Ok(left)
    }

    /// `UnaryExpr = [ "-" ] PrimaryExpr`
    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        if self.check_exact(&TokenKind::Minus) {
            let span = self.advance().span;
            let operand = self.parse_unary()?;
            return Ok(Expr::new(ExprKind::Neg(Box::new(operand)), span));
        }
        self.parse_primary()
    }

    /// Run an already-parsed left operand through the remaining binary
    /// levels. Used by operation expressions where the left operand is
    /// the implicit element.
    fn continue_binary(&mut self, left: Expr) -> Result<Expr, ParseError> {
        let left = self.parse_mul_rest(left)?;
        let left = self.parse_add_rest(left)?;
        let left = self.parse_comparison_rest(left)?;
        let left = self.parse_and_rest(left)?;
        self.parse_or_rest(left)
    }

    // ══════════════════════════════════════════════════════════════════
    // Primary expressions
    // ══════════════════════════════════════════════════════════════════

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let span = self.current_span();
        match self.peek_kind().clone() {
            TokenKind::Number(n) => {
                self.advance();
                Ok(Expr::new(ExprKind::Number(n), span))
            }
            TokenKind::Str(s) => {
                self.advance();
                Ok(Expr::new(ExprKind::Str(s), span))
            }
            TokenKind::True => {
                self.advance();
                Ok(Expr::new(ExprKind::Bool(true), span))
            }
            TokenKind::False => {
                self.advance();
                Ok(Expr::new(ExprKind::Bool(false), span))
            }
            TokenKind::Null => {
                self.advance();
                Ok(Expr::new(ExprKind::Null, span))
            }
            TokenKind::State => {
                self.advance();
                Ok(Expr::new(ExprKind::StateRef, span))
            }
            TokenKind::Identifier(_) => {
                let path = self.parse_path()?;
                Ok(Expr::new(ExprKind::Path(path), span))
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expression()?;
                self.expect(&TokenKind::RParen)?;
                Ok(inner)
            }
            TokenKind::LBracket => self.parse_array_literal(),
            TokenKind::LBrace => self.parse_object_literal(),
            TokenKind::Len => {
                self.advance();
                self.expect(&TokenKind::LParen)?;
                let arg = self.parse_expression()?;
                self.expect(&TokenKind::RParen)?;
                Ok(Expr::new(ExprKind::Len(Box::new(arg)), span))
            }
            TokenKind::Map => {
                self.advance();
                let (source, body) = self.parse_functional_operands()?;
                Ok(Expr::new(
                    ExprKind::Map {
                        source: Box::new(source),
                        body: Box::new(body),
                    },
                    span,
                ))
            }
            TokenKind::Filter => {
                self.advance();
                let (source, predicate) = self.parse_functional_operands()?;
                Ok(Expr::new(
                    ExprKind::Filter {
                        source: Box::new(source),
                        predicate: Box::new(predicate),
                    },
                    span,
                ))
            }
            TokenKind::Reduce => {
                self.advance();
                let source = self.parse_unary()?;
                let op = self.parse_reduce_op()?;
                let init = self.parse_unary()?;
                Ok(Expr::new(
                    ExprKind::Reduce {
                        source: Box::new(source),
                        op,
                        init: Box::new(init),
                    },
                    span,
                ))
            }
            TokenKind::Concat => {
                self.advance();
                let mut operands = vec![
                    self.parse_concat_operand()?,
                    self.parse_concat_operand()?,
                ];
                while self.at_concat_operand_start() {
                    operands.push(self.parse_concat_operand()?);
                }
                Ok(Expr::new(ExprKind::Concat(operands), span))
            }
            _ => Err(self.error_at_current("expression")),
        }
    }

    /// `[ Expr { "," Expr } [","] ]`
    fn parse_array_literal(&mut self) -> Result<Expr, ParseError> {
        let span = self.expect(&TokenKind::LBracket)?.span;
        let mut elements = Vec::new();
        while !self.check_exact(&TokenKind::RBracket) {
            elements.push(self.parse_expression()?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RBracket)?;
        Ok(Expr::new(ExprKind::Array(elements), span))
    }

    /// `{ FieldName ":" Expr { "," FieldName ":" Expr } [","] }`
    fn parse_object_literal(&mut self) -> Result<Expr, ParseError> {
        let span = self.expect(&TokenKind::LBrace)?.span;
        let mut fields = Vec::new();
        while !self.check_exact(&TokenKind::RBrace) {
            let (key, _) = self.expect_field_name()?;
            self.expect(&TokenKind::Colon)?;
            let value = self.parse_expression()?;
            fields.push((key, value));
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RBrace)?;
        Ok(Expr::new(ExprKind::Object(fields), span))
    }

    // ══════════════════════════════════════════════════════════════════
    // Paths
    // ══════════════════════════════════════════════════════════════════

    /// `Path = Identifier { "." FieldName | "[" Expr "]" }`
    pub(crate) fn parse_path(&mut self) -> Result<PathExpr, ParseError> {
        let (first, span) = self.expect_identifier()?;
        let mut segments = vec![PathSegment::Field(first)];
        self.parse_path_segments(&mut segments)?;
        Ok(PathExpr { segments, span })
    }

    /// Parse trailing `.field` / `[expr]` segments onto `segments`.
    fn parse_path_segments(
        &mut self,
        segments: &mut Vec<PathSegment>,
    ) -> Result<(), ParseError> {
        loop {
            if self.eat(&TokenKind::Dot) {
                let (name, _) = self.expect_field_name()?;
                segments.push(PathSegment::Field(name));
            } else if self.eat(&TokenKind::LBracket) {
                let index = self.parse_expression()?;
                self.expect(&TokenKind::RBracket)?;
                segments.push(PathSegment::Index(index));
            } else {
                return Ok(());
            }
        }
    }

    // ══════════════════════════════════════════════════════════════════
    // Operation expressions (map/filter bodies)
    // ══════════════════════════════════════════════════════════════════

    /// The source atom and per-element body of a `map` or `filter`.
    ///
    /// The source parses greedily as an atom first. When nothing that
    /// can start an operation expression follows, the greedy path parse
    /// has swallowed a projection that belongs to the body
    /// (`map users .name` lexes identically to `map users.name`), so
    /// the source is re-parsed stopping at the first `.` and the
    /// segments from that `.` on become an element projection.
    fn parse_functional_operands(&mut self) -> Result<(Expr, Expr), ParseError> {
        let checkpoint = self.checkpoint();
        let source = self.parse_unary()?;
        if self.at_op_expr_start() {
            let body = self.parse_op_expr()?;
            return Ok((source, body));
        }
        self.rewind(checkpoint);
        let source = self.parse_dotless_source()?;
        let body = self.parse_op_expr()?;
        Ok((source, body))
    }

    /// A functional-operator source re-parsed without `.field`
    /// segments. Index segments still belong to the source
    /// (`map rows[0] .name`).
    fn parse_dotless_source(&mut self) -> Result<Expr, ParseError> {
        let span = self.current_span();
        if let TokenKind::Identifier(_) = self.peek_kind() {
            let (first, _) = self.expect_identifier()?;
            let mut segments = vec![PathSegment::Field(first)];
            while self.eat(&TokenKind::LBracket) {
                let index = self.parse_expression()?;
                self.expect(&TokenKind::RBracket)?;
                segments.push(PathSegment::Index(index));
            }
            return Ok(Expr::new(ExprKind::Path(PathExpr { segments, span }), span));
        }
        self.parse_unary()
    }

    /// A `concat` operand. Identifier heads take `.field` segments but
    /// stop before `[`: inside an operand list `concat a b [4]` lexes
    /// identically to `concat a b[4]`, so a bracket always opens a new
    /// array-literal operand. Indexing inside an operand needs
    /// parentheses (`concat (rows[0]) b`).
    fn parse_concat_operand(&mut self) -> Result<Expr, ParseError> {
        let span = self.current_span();
        if let TokenKind::Identifier(_) = self.peek_kind() {
            let (first, _) = self.expect_identifier()?;
            let mut segments = vec![PathSegment::Field(first)];
            while self.eat(&TokenKind::Dot) {
                let (name, _) = self.expect_field_name()?;
                segments.push(PathSegment::Field(name));
            }
            return Ok(Expr::new(ExprKind::Path(PathExpr { segments, span }), span));
        }
        self.parse_unary()
    }

    /// The per-element expression of a `map` or `filter`.
    ///
    /// The element may appear implicitly in two forms:
    /// - a leading `.field…` projection (`map users .name`)
    /// - a leading binary operator whose left operand is the element
    ///   (`map n * 2`, `filter n % 2 == 0`, `filter ages >= 18`)
    ///
    /// Otherwise this is an ordinary expression.
    fn parse_op_expr(&mut self) -> Result<Expr, ParseError> {
        let span = self.current_span();

        if self.check_exact(&TokenKind::Dot) {
            let mut segments = Vec::new();
            self.parse_path_segments(&mut segments)?;
            let element = Expr::new(ExprKind::Element(segments), span);
            return self.continue_binary(element);
        }

        if self.at_binary_op() {
            let element = Expr::new(ExprKind::Element(Vec::new()), span);
            return self.continue_binary(element);
        }

        self.parse_expression()
    }

    /// The single operator token of a `reduce`.
    fn parse_reduce_op(&mut self) -> Result<BinOp, ParseError> {
        let op = match self.peek_kind() {
            TokenKind::Plus => BinOp::Add,
            TokenKind::Minus => BinOp::Sub,
            TokenKind::Star => BinOp::Mul,
            TokenKind::Slash => BinOp::Div,
            TokenKind::Percent => BinOp::Mod,
            _ => return Err(self.error_at_current("arithmetic operator")),
        };
        self.advance();
        Ok(op)
    }

    /// True when the current token can start an operation expression.
    fn at_op_expr_start(&self) -> bool {
        self.check_exact(&TokenKind::Dot) || self.at_binary_op() || self.at_atom_start()
    }

    /// True when the current token starts a binary-operator continuation.
    fn at_binary_op(&self) -> bool {
        matches!(
            self.peek_kind(),
            TokenKind::Plus
                | TokenKind::Minus
                | TokenKind::Star
                | TokenKind::Slash
                | TokenKind::Percent
                | TokenKind::EqEq
                | TokenKind::BangEq
                | TokenKind::Less
                | TokenKind::Greater
                | TokenKind::LessEq
                | TokenKind::GreaterEq
                | TokenKind::And
                | TokenKind::Or
        )
    }

    /// True when the current token can start an atom (used to detect an
    /// operation-expression head after a functional source).
    fn at_atom_start(&self) -> bool {
        matches!(
            self.peek_kind(),
            TokenKind::Number(_)
                | TokenKind::Str(_)
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Null
                | TokenKind::Identifier(_)
                | TokenKind::State
                | TokenKind::LParen
                | TokenKind::LBracket
                | TokenKind::LBrace
                | TokenKind::Len
                | TokenKind::Minus
        )
    }

    /// True when the current token can start another `concat` operand.
    /// `state` and `{` are excluded: both open a following statement
    /// (`state { .. }` declarations), and neither evaluates to an array.
    fn at_concat_operand_start(&self) -> bool {
        matches!(
            self.peek_kind(),
            TokenKind::Number(_)
                | TokenKind::Str(_)
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Null
                | TokenKind::Identifier(_)
                | TokenKind::LParen
                | TokenKind::LBracket
                | TokenKind::Len
                | TokenKind::Minus
        )
    }
}
