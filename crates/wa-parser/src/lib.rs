//! Whatalang parser: recursive descent over the lexer's token stream.
//!
//! Parsing is fail-fast: the first token that does not fit the grammar
//! aborts with a [`ParseError`](wa_types::ParseError) carrying the
//! expected-vs-found pair and the source position.

pub mod expr;
pub mod parser;
pub mod stmt;

pub use parser::Parser;

use wa_lexer::Lexer;
use wa_types::ast::Program;
use wa_types::SyntaxError;

/// Lex and parse source text into a [`Program`].
pub fn parse(source: &str) -> Result<Program, SyntaxError> {
    let tokens = Lexer::new(source).lex()?;
    let program = Parser::new(tokens).parse()?;
    Ok(program)
}
