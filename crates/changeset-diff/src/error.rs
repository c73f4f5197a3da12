//! Error types for the diff crate.

use changeset_schema::{EdgeId, SchemaError};

/// Errors that can occur while configuring a differ or diffing a graph.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    /// A type's self-description or an ownership registration was invalid.
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    /// An edge accessor returned an entity of a different type than the
    /// edge declares.
    #[error("edge {edge} declares {expected} but yielded {actual}")]
    EdgeTypeMismatch {
        edge: EdgeId,
        expected: &'static str,
        actual: &'static str,
    },

    /// The differ configuration could not be parsed.
    #[error("config error: {0}")]
    Config(String),
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
