//! Syntax error types shared by the lexer and parser.
//!
//! Both stages are fail-fast: the first malformed character or token
//! aborts the stage and surfaces a structured error to the caller. The
//! CLI renders these as one-line messages; the types only carry the
//! structured information.

use serde::Serialize;
use thiserror::Error;

/// A byte that starts no valid token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{line}:{col}: unexpected character '{ch}'")]
pub struct LexError {
    /// The offending character.
    pub ch: char,
    pub line: u32,
    pub col: u32,
}

/// The first unrecoverable grammar mismatch.
///
/// There is no error recovery: parsing stops here and nothing after the
/// mismatch is inspected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{line}:{col}: expected {expected}, found {found}")]
pub struct ParseError {
    /// What the grammar required at this point.
    pub expected: String,
    /// The token actually present.
    pub found: String,
    pub line: u32,
    pub col: u32,
}

/// Either failure mode of turning source text into a [`crate::ast::Program`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
pub enum SyntaxError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}
