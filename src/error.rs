//! Error types for the execution runtime
//!
//! One closed enum, one variant per failure mode. Operators never catch
//! their own errors; they propagate to the host at the pipeline boundary.

use thiserror::Error;

/// Result type alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Execution runtime error types
#[derive(Error, Debug)]
pub enum Error {
    /// A name passed to `column`/projection/join key is absent
    #[error("column not found: {0}")]
    ColumnNotFound(String),

    /// A projected name matches multiple qualified columns
    #[error("ambiguous column: {0}")]
    AmbiguousColumn(String),

    /// Vector-vector op or align_tables with mismatched lengths
    #[error("length mismatch: left has {left} rows, right has {right} rows")]
    LengthMismatch {
        /// Length of the left-hand operand
        left: usize,
        /// Length of the right-hand operand
        right: usize,
    },

    /// `rename` called with the wrong number of names
    #[error("arity error: expected {expected} names, got {actual}")]
    ArityError {
        /// Number of columns that needed renaming
        expected: usize,
        /// Number of names actually supplied
        actual: usize,
    },

    /// Binary op on incompatible types without implicit widening
    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    /// The generic fallback evaluator reached an op/type combination it does not implement
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// `min`/`max` called on a length-0 vector
    #[error("empty vector")]
    EmptyVector,

    /// A strict builder's `finish` was under/over-filled, or an append ran past capacity
    #[error("capacity exceeded: {0}")]
    CapacityExceeded(String),

    /// A builder was used after `finish`, or an operator received a leg it does not support
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Arrow interop failure at the zero-copy boundary
    #[error("arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
}
