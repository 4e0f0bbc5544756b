//! Path-addressed state store.
//!
//! Owns the single root `Value::Object` for a program run. All reads
//! and writes go through resolved paths; `set` is the only mutation
//! entry point, and it reports enough about the write (previous value,
//! normalized path) for the reactive engine to decide what fired.

use std::fmt;

use indexmap::IndexMap;
use wa_types::Value;

use crate::error::{RuntimeError, RuntimeResult};

/// One concrete step of a resolved path. Index steps may still be
/// negative until normalized against the live array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathStep {
    Key(String),
    Index(i64),
}

/// A fully resolved path: every dynamic index expression has already
/// been evaluated to an integer.
pub type ResolvedPath = Vec<PathStep>;

/// Render a resolved path for error messages (`user.scores[2]`).
pub fn render_path(path: &[PathStep]) -> String {
    let mut out = String::new();
    for (i, step) in path.iter().enumerate() {
        match step {
            PathStep::Key(k) => {
                if i > 0 {
                    out.push('.');
                }
                out.push_str(k);
            }
            PathStep::Index(n) => {
                let _ = fmt::Write::write_fmt(&mut out, format_args!("[{n}]"));
            }
        }
    }
    out
}

/// The result of a successful `set`.
#[derive(Debug, Clone, PartialEq)]
pub struct SetOutcome {
    /// The value previously stored at the path, if any.
    pub previous: Option<Value>,
    /// The written path with negative indices normalized, so it names
    /// the same concrete slot on every comparison.
    pub path: ResolvedPath,
}

/// The state store: exclusive owner of the root value tree.
#[derive(Debug)]
pub struct StateStore {
    root: Value,
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StateStore {
    /// Create an empty store (root is an empty object).
    pub fn new() -> Self {
        Self {
            root: Value::Object(IndexMap::new()),
        }
    }

    /// Snapshot accessor for the root value tree.
    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Read the value at `path`. Negative indices count from the end.
    pub fn get(&self, path: &[PathStep]) -> RuntimeResult<Value> {
        let mut current = &self.root;
        for (i, step) in path.iter().enumerate() {
            current = descend(current, step, path, i)?;
        }
        Ok(current.clone())
    }

    /// Resolve `path` against the current tree, normalizing negative
    /// indices. Fails exactly when `get` would fail.
    pub fn resolve(&self, path: &[PathStep]) -> RuntimeResult<ResolvedPath> {
        let mut current = &self.root;
        let mut resolved = Vec::with_capacity(path.len());
        for (i, step) in path.iter().enumerate() {
            resolved.push(normalize_step(current, step, path, i)?);
            current = descend(current, step, path, i)?;
        }
        Ok(resolved)
    }

    /// Write `value` at `path`, returning the previous value and the
    /// normalized path.
    ///
    /// Intermediate objects are auto-created when a missing segment and
    /// the following segment are both field names. Arrays are never
    /// auto-created or grown: writing an out-of-bounds index fails.
    pub fn set(&mut self, path: &[PathStep], value: Value) -> RuntimeResult<SetOutcome> {
        let (last, parents) = match path.split_last() {
            Some(split) => split,
            None => {
                return Err(RuntimeError::Path {
                    path: String::new(),
                    segment: 0,
                })
            }
        };

        let mut resolved = Vec::with_capacity(path.len());
        let mut current = &mut self.root;
        for (i, step) in parents.iter().enumerate() {
            // Auto-create an intermediate object for a missing field
            // whose successor is also a field.
            if let (Value::Object(map), PathStep::Key(key)) = (&mut *current, step) {
                let next_is_key = matches!(path[i + 1], PathStep::Key(_));
                if !map.contains_key(key) && next_is_key {
                    map.insert(key.clone(), Value::Object(IndexMap::new()));
                }
            }
            resolved.push(normalize_step(current, step, path, i)?);
            current = descend_mut(current, step, path, i)?;
        }

        let last_index = path.len() - 1;
        match (current, last) {
            (Value::Object(map), PathStep::Key(key)) => {
                resolved.push(last.clone());
                let previous = map.insert(key.clone(), value);
                Ok(SetOutcome {
                    previous,
                    path: resolved,
                })
            }
            (Value::Array(items), PathStep::Index(idx)) => {
                let slot = normalize_index(*idx, items.len())?;
                resolved.push(PathStep::Index(slot as i64));
                let previous = std::mem::replace(&mut items[slot], value);
                Ok(SetOutcome {
                    previous: Some(previous),
                    path: resolved,
                })
            }
            _ => Err(RuntimeError::Path {
                path: render_path(path),
                segment: last_index + 1,
            }),
        }
    }
}

/// Normalize a (possibly negative) index against an array length.
fn normalize_index(index: i64, len: usize) -> RuntimeResult<usize> {
    let slot = if index < 0 {
        index + len as i64
    } else {
        index
    };
    if slot < 0 || slot as usize >= len {
        return Err(RuntimeError::Index { index, len });
    }
    Ok(slot as usize)
}

/// The normalized form of `step` against the value it applies to.
fn normalize_step(
    current: &Value,
    step: &PathStep,
    path: &[PathStep],
    segment: usize,
) -> RuntimeResult<PathStep> {
    match (current, step) {
        (Value::Array(items), PathStep::Index(idx)) => {
            Ok(PathStep::Index(normalize_index(*idx, items.len())? as i64))
        }
        (Value::Object(_), PathStep::Key(_)) => Ok(step.clone()),
        _ => Err(RuntimeError::Path {
            path: render_path(path),
            segment: segment + 1,
        }),
    }
}

/// Step into `current` by one path step.
fn descend<'v>(
    current: &'v Value,
    step: &PathStep,
    path: &[PathStep],
    segment: usize,
) -> RuntimeResult<&'v Value> {
    match (current, step) {
        (Value::Object(map), PathStep::Key(key)) => {
            map.get(key).ok_or_else(|| RuntimeError::Path {
                path: render_path(path),
                segment: segment + 1,
            })
        }
        (Value::Array(items), PathStep::Index(idx)) => {
            let slot = normalize_index(*idx, items.len())?;
            Ok(&items[slot])
        }
        _ => Err(RuntimeError::Path {
            path: render_path(path),
            segment: segment + 1,
        }),
    }
}

/// Mutable variant of [`descend`].
fn descend_mut<'v>(
    current: &'v mut Value,
    step: &PathStep,
    path: &[PathStep],
    segment: usize,
) -> RuntimeResult<&'v mut Value> {
    match (current, step) {
        (Value::Object(map), PathStep::Key(key)) => {
            map.get_mut(key).ok_or_else(|| RuntimeError::Path {
                path: render_path(path),
                segment: segment + 1,
            })
        }
        (Value::Array(items), PathStep::Index(idx)) => {
            let slot = normalize_index(*idx, items.len())?;
            Ok(&mut items[slot])
        }
        _ => Err(RuntimeError::Path {
            path: render_path(path),
            segment: segment + 1,
        }),
    }
}
