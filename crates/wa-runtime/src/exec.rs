//! Program execution and the reactive trigger engine.
//!
//! The executor owns the state store, the list of reactive
//! registrations, and the ordered output buffer. Every mutation goes
//! through [`Executor::assign`], which invokes the engine after a
//! successful write; cascades run inline and depth-first, guarded by a
//! configurable depth limit.

use tracing::{debug, trace};
use wa_types::ast::{PathExpr, PathSegment, Program, SetStmt, StateDecl, Stmt, WhenCase};
use wa_types::{render, Value};

use crate::error::{RuntimeError, RuntimeResult};
use crate::eval::{compare, Evaluator};
use crate::store::{render_path, PathStep, ResolvedPath, StateStore};

/// Default bound on reactive cascade depth.
pub const DEFAULT_DEPTH_LIMIT: usize = 10_000;

/// A reactive registration, recorded when a `react` statement executes.
#[derive(Debug, Clone)]
struct Registration {
    target: PathExpr,
    cases: Vec<WhenCase>,
    default: Option<Vec<Stmt>>,
}

/// The result of a completed program run.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionReport {
    /// Printed lines in true execution order, cascades included.
    pub output: Vec<String>,
    /// Final state tree snapshot.
    pub state: Value,
}

/// The program executor.
pub struct Executor {
    store: StateStore,
    registrations: Vec<Registration>,
    output: Vec<String>,
    depth_limit: usize,
}

impl Default for Executor {
    fn default() -> Self {
        Self::new()
    }
}

impl Executor {
    /// An executor with the default cascade depth limit.
    pub fn new() -> Self {
        Self::with_depth_limit(DEFAULT_DEPTH_LIMIT)
    }

    /// An executor with a custom cascade depth limit.
    pub fn with_depth_limit(depth_limit: usize) -> Self {
        Self {
            store: StateStore::new(),
            registrations: Vec::new(),
            output: Vec::new(),
            depth_limit,
        }
    }

    /// Execute a program to completion.
    pub fn run(mut self, program: &Program) -> RuntimeResult<ExecutionReport> {
        debug!(statements = program.statements.len(), "executing program");
        self.exec_statements(&program.statements, 0)?;
        Ok(ExecutionReport {
            output: self.output,
            state: self.store.root().clone(),
        })
    }

    fn exec_statements(&mut self, statements: &[Stmt], depth: usize) -> RuntimeResult<()> {
        for statement in statements {
            self.exec_statement(statement, depth)?;
        }
        Ok(())
    }

    fn exec_statement(&mut self, statement: &Stmt, depth: usize) -> RuntimeResult<()> {
        match statement {
            Stmt::State(decl) => self.exec_state_decl(decl, depth),
            Stmt::Set(set) => self.exec_set(set, depth),
            Stmt::Print(print) => {
                let value = Evaluator::new(&self.store).eval(&print.expr)?;
                self.output.push(render(&value));
                Ok(())
            }
            Stmt::React(react) => {
                // Registration is an action: it happens when the
                // statement executes, in program order.
                trace!(target = %path_text(&react.target), "registering reaction");
                self.registrations.push(Registration {
                    target: react.target.clone(),
                    cases: react.cases.clone(),
                    default: react.default.clone(),
                });
                Ok(())
            }
        }
    }

    /// Merge a `state` block entry by entry. Each entry is an ordinary
    /// `set` on the root, so reactions registered earlier can fire.
    fn exec_state_decl(&mut self, decl: &StateDecl, depth: usize) -> RuntimeResult<()> {
        for (key, expr) in &decl.entries {
            let value = Evaluator::new(&self.store).eval(expr)?;
            self.assign(vec![PathStep::Key(key.clone())], value, depth)?;
        }
        Ok(())
    }

    fn exec_set(&mut self, set: &SetStmt, depth: usize) -> RuntimeResult<()> {
        let evaluator = Evaluator::new(&self.store);
        let path = evaluator.resolve_path(&set.target)?;
        let value = evaluator.eval(&set.value)?;
        self.assign(path, value, depth)
    }

    /// The single mutation entry point: write, then trigger.
    fn assign(&mut self, path: ResolvedPath, value: Value, depth: usize) -> RuntimeResult<()> {
        let outcome = self.store.set(&path, value.clone())?;
        if outcome.previous.as_ref() == Some(&value) {
            // No-op mutation: never triggers.
            return Ok(());
        }
        self.on_mutation(&outcome.path, depth)
    }

    /// Run all registrations matching the mutated path.
    ///
    /// Registrations are walked in registration order; each target is
    /// resolved freshly against the current state (dynamic indices,
    /// negative normalization), and a target that fails to resolve
    /// simply does not match. Matching is exact-path only.
    fn on_mutation(&mut self, mutated: &ResolvedPath, depth: usize) -> RuntimeResult<()> {
        if depth >= self.depth_limit {
            return Err(RuntimeError::ReactiveOverflow {
                limit: self.depth_limit,
            });
        }

        // Registrations added by the actions below join later
        // mutations, not this one.
        let count = self.registrations.len();
        for i in 0..count {
            let registration = self.registrations[i].clone();
            let evaluator = Evaluator::new(&self.store);
            let target = match evaluator
                .resolve_path(&registration.target)
                .and_then(|steps| self.store.resolve(&steps))
            {
                Ok(target) => target,
                Err(_) => continue,
            };
            if target != *mutated {
                continue;
            }

            trace!(path = %render_path(mutated), depth, "reaction triggered");
            self.fire(&registration, &target, depth)?;
        }
        Ok(())
    }

    /// Evaluate one registration's cases against the fresh value at its
    /// target; execute the first matching case, or the default.
    fn fire(
        &mut self,
        registration: &Registration,
        target: &ResolvedPath,
        depth: usize,
    ) -> RuntimeResult<()> {
        let current = self.store.get(target)?;
        for case in &registration.cases {
            let rhs = Evaluator::new(&self.store).eval(&case.rhs)?;
            if compare(case.op, &current, &rhs)? {
                return self.exec_statements(&case.actions, depth + 1);
            }
        }
        if let Some(default) = &registration.default {
            return self.exec_statements(default, depth + 1);
        }
        Ok(())
    }
}

/// Source-like rendering of an AST path for trace output.
fn path_text(path: &PathExpr) -> String {
    let mut out = String::new();
    for (i, segment) in path.segments.iter().enumerate() {
        match segment {
            PathSegment::Field(name) => {
                if i > 0 {
                    out.push('.');
                }
                out.push_str(name);
            }
            PathSegment::Index(_) => out.push_str("[..]"),
        }
    }
    out
}
