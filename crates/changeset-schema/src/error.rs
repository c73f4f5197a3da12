//! Error types for the schema crate.

/// Contract violations detected while describing types or registering edges.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SchemaError {
    /// A type described a field with an empty name.
    #[error("type {type_name} describes a field with an empty name")]
    EmptyFieldName { type_name: &'static str },

    /// A type described the same field twice.
    #[error("type {type_name} describes field `{field}` more than once")]
    DuplicateField {
        type_name: &'static str,
        field: &'static str,
    },

    /// Ownership was registered for a field the type does not describe.
    #[error("type {type_name} has no edge named `{edge}`")]
    UnknownEdge { type_name: &'static str, edge: String },

    /// Ownership was registered for a scalar field.
    #[error("field `{field}` of {type_name} is a scalar, not an edge")]
    NotAnEdge {
        type_name: &'static str,
        field: &'static str,
    },
}

/// Convenience alias for schema results.
pub type SchemaResult<T> = Result<T, SchemaError>;
