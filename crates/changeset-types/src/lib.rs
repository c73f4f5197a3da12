//! Foundation types for changeset.
//!
//! This crate provides the vocabulary shared by the schema cache and the graph
//! differ: what a diffable entity must expose, how a type describes its own
//! fields, and the classification and permission values the differ produces.
//!
//! # Key Types
//!
//! - [`Trackable`] / [`EntityRef`] -- Contract every diffable entity implements
//! - [`EntityId`] -- Reference identity of an entity instance (not its key)
//! - [`ChangeType`] -- None / Added / Updated / Deleted classification
//! - [`Ownership`] -- Add / update / delete permission triple of an edge
//! - [`TypeInfo`] / [`FieldDescriptor`] / [`FieldKind`] -- Per-type self-description
//! - [`MarkerId`] / [`TrackableContract`] -- Marker types used to group fields

pub mod change;
pub mod descriptor;
pub mod entity;

pub use change::{ChangeType, Ownership};
pub use descriptor::{FieldDescriptor, FieldKind, MarkerId, TrackableContract, TypeInfo};
pub use entity::{EntityId, EntityKey, EntityRef, Trackable, TrackableType};
