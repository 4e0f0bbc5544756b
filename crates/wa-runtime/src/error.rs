//! Runtime error types for the Whatalang runtime.

use thiserror::Error;

/// Runtime error: path resolution, indexing, typing, arithmetic and
/// reactive-cascade failures. All fail-fast: the first error aborts the
/// remaining program.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    /// A path segment could not be resolved (missing key, or a segment
    /// applied to a value of the wrong shape).
    #[error("path error: '{path}' unresolved at segment {segment}")]
    Path { path: String, segment: usize },

    /// An array index outside the array's bounds.
    #[error("index error: index {index} out of range for array of length {len}")]
    Index { index: i64, len: usize },

    /// An operator or builtin applied to an incompatible value.
    #[error("type error: {0}")]
    Type(String),

    /// Division or modulo by zero.
    #[error("arithmetic error: {0}")]
    Arithmetic(String),

    /// The reactive cascade exceeded the configured depth limit.
    #[error("reactive overflow: cascade depth exceeded limit {limit}")]
    ReactiveOverflow { limit: usize },
}

/// Result alias for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;
