//! Statement parsing: `state`, `set`, `print`, `react to`.

use wa_lexer::token::TokenKind;
use wa_types::ast::{
    CompareOp, PrintStmt, ReactStmt, SetStmt, StateDecl, Stmt, WhenCase,
};
use wa_types::ParseError;

use crate::parser::Parser;

impl Parser {
    /// `Statement = StateDecl | SetStmt | PrintStmt | ReactStmt`
    pub(crate) fn parse_statement(&mut self) -> Result<Stmt, ParseError> {
        match self.peek_kind() {
            TokenKind::State => self.parse_state_decl(),
            TokenKind::Set => self.parse_set_stmt(),
            TokenKind::Print => self.parse_print_stmt(),
            TokenKind::React => self.parse_react_stmt(),
            _ => Err(self.error_at_current("statement ('state', 'set', 'print' or 'react')")),
        }
    }

    /// `StateDecl = "state" "{" [ FieldName ":" Expr { "," FieldName ":" Expr } [","] ] "}"`
    fn parse_state_decl(&mut self) -> Result<Stmt, ParseError> {
        let span = self.expect(&TokenKind::State)?.span;
        self.expect(&TokenKind::LBrace)?;

        let mut entries = Vec::new();
        while !self.check_exact(&TokenKind::RBrace) {
            let (key, _) = self.expect_field_name()?;
            self.expect(&TokenKind::Colon)?;
            let value = self.parse_expression()?;
            entries.push((key, value));
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RBrace)?;

        Ok(Stmt::State(StateDecl { entries, span }))
    }

    /// `SetStmt = "set" Path "=" Expr`
    fn parse_set_stmt(&mut self) -> Result<Stmt, ParseError> {
        let span = self.expect(&TokenKind::Set)?.span;
        let target = self.parse_path()?;
        self.expect(&TokenKind::Eq)?;
        let value = self.parse_expression()?;
        Ok(Stmt::Set(SetStmt {
            target,
            value,
            span,
        }))
    }

    /// `PrintStmt = "print" Expr`
    fn parse_print_stmt(&mut self) -> Result<Stmt, ParseError> {
        let span = self.expect(&TokenKind::Print)?.span;
        let expr = self.parse_expression()?;
        Ok(Stmt::Print(PrintStmt { expr, span }))
    }

    /// `ReactStmt = "react" "to" Path WhenCase+ [ "default" Block ]`
    fn parse_react_stmt(&mut self) -> Result<Stmt, ParseError> {
        let span = self.expect(&TokenKind::React)?.span;
        self.expect(&TokenKind::To)?;
        let target = self.parse_path()?;

        let mut cases = Vec::new();
        while self.check_exact(&TokenKind::When) {
            cases.push(self.parse_when_case()?);
        }
        if cases.is_empty() {
            return Err(self.error_at_current("'when'"));
        }

        let default = if self.eat(&TokenKind::Default) {
            Some(self.parse_block()?)
        } else {
            None
        };

        Ok(Stmt::React(ReactStmt {
            target,
            cases,
            default,
            span,
        }))
    }

    /// `WhenCase = "when" Comparator Expr Block`
    fn parse_when_case(&mut self) -> Result<WhenCase, ParseError> {
        let span = self.expect(&TokenKind::When)?.span;
        let op = self.parse_comparator()?;
        let rhs = self.parse_expression()?;
        let actions = self.parse_block()?;
        Ok(WhenCase {
            op,
            rhs,
            actions,
            span,
        })
    }

    /// `Block = "{" Statement* "}"`
    fn parse_block(&mut self) -> Result<Vec<Stmt>, ParseError> {
        self.expect(&TokenKind::LBrace)?;
        let mut statements = Vec::new();
        while !self.check_exact(&TokenKind::RBrace) {
            if self.at_end() {
                return Err(self.error_at_current("'}'"));
            }
            statements.push(self.parse_statement()?);
        }
        self.expect(&TokenKind::RBrace)?;
        Ok(statements)
    }

    /// A comparison operator token in a `when` clause.
    fn parse_comparator(&mut self) -> Result<CompareOp, ParseError> {
        let op = match self.peek_kind() {
            TokenKind::EqEq => CompareOp::Eq,
            TokenKind::BangEq => CompareOp::NotEq,
            TokenKind::Less => CompareOp::Less,
            TokenKind::Greater => CompareOp::Greater,
            TokenKind::LessEq => CompareOp::LessEq,
            TokenKind::GreaterEq => CompareOp::GreaterEq,
            _ => return Err(self.error_at_current("comparison operator")),
        };
        self.advance();
        Ok(op)
    }
}
