//! Whatalang runtime: state store, expression evaluator and reactive
//! trigger engine.
//!
//! Execution is single-threaded and synchronous end to end. Reactive
//! cascades happen inline via ordinary recursive calls, before control
//! returns to the statement that caused the mutation.

pub mod error;
pub mod eval;
pub mod exec;
pub mod store;

pub use error::{RuntimeError, RuntimeResult};
pub use eval::Evaluator;
pub use exec::{ExecutionReport, Executor, DEFAULT_DEPTH_LIMIT};
pub use store::{PathStep, ResolvedPath, SetOutcome, StateStore};

use wa_types::ast::Program;

/// Execute a program with the default settings.
pub fn execute(program: &Program) -> RuntimeResult<ExecutionReport> {
    Executor::new().run(program)
}
