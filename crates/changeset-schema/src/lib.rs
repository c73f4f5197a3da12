//! Type schema cache and ownership registry for changeset.
//!
//! The schema cache turns each type's self-description into the sets the
//! differ needs (scalars to compare, single and list edges to walk), applying
//! the configured ignore rules. The ownership registry holds the explicit
//! permission overrides for individual edges.
//!
//! # Key Types
//!
//! - [`SchemaCache`] / [`TypeSchema`] / [`FieldClass`] -- Lazily built, per-type field classification
//! - [`IgnoreRules`] -- Ignore-by-marker and ignore-by-name configuration
//! - [`OwnershipRegistry`] / [`EdgeId`] -- (parent type, edge) permission overrides
//! - [`SchemaError`] -- Fail-fast contract violations

pub mod cache;
pub mod error;
pub mod ownership;
pub mod rules;

pub use cache::{Edge, FieldClass, SchemaCache, TypeSchema};
pub use error::{SchemaError, SchemaResult};
pub use ownership::{EdgeId, OwnershipRegistry};
pub use rules::IgnoreRules;
