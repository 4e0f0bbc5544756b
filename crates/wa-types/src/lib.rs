//! Shared types for the Whatalang interpreter.
//!
//! This crate defines the runtime [`Value`] tree, the AST node types,
//! source spans, and the syntax error types used across the pipeline.

pub mod ast;
mod error;
mod span;
mod value;

pub use error::{LexError, ParseError, SyntaxError};
pub use span::Span;
pub use value::{render, Value};
