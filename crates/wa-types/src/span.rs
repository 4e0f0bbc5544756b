use serde::{Deserialize, Serialize};
use std::fmt;

/// Source location.
///
/// Line and column are 1-based for human-readable error messages.
/// Whatalang diagnostics only ever report where something starts, so a
/// point location is all tokens and AST nodes carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub line: u32,
    pub col: u32,
}

impl Span {
    /// Create a new span at the given position.
    pub fn new(line: u32, col: u32) -> Self {
        Self { line, col }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}
