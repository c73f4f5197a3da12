//! Cycle-safe object-graph diff engine.
//!
//! Given a source and a destination version of a (possibly cyclic) graph of
//! keyed entities, classifies every visited entity as None, Added, Updated or
//! Deleted. Per-edge ownership decides whether a parent may classify a child
//! or only report that the relationship changed.
//!
//! # Key Types
//!
//! - [`GraphDiffer`] -- Configuration plus the `diff` / `diff_list` entry points
//! - [`ChangeAssessor`] -- Object-safe diffing interface
//! - [`ChangePackage`] / [`OwnedChange`] / [`RelationshipChange`] -- Diff result
//! - [`DifferConfig`] -- Declarative configuration (TOML loadable)
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use changeset_diff::GraphDiffer;
//! use changeset_types::{ChangeType, EntityRef, FieldDescriptor, Trackable};
//! use serde_json::{json, Value};
//!
//! #[derive(Debug)]
//! struct Track {
//!     id: u32,
//!     title: String,
//! }
//!
//! #[derive(Debug)]
//! struct Album {
//!     id: u32,
//!     tracks: Vec<Arc<Track>>,
//! }
//!
//! impl Trackable<u32> for Track {
//!     fn key(&self) -> u32 {
//!         self.id
//!     }
//!
//!     fn describe() -> Vec<FieldDescriptor<u32>> {
//!         vec![FieldDescriptor::key("id"), FieldDescriptor::scalar("title")]
//!     }
//!
//!     fn scalar(&self, field: &str) -> Value {
//!         match field {
//!             "title" => json!(self.title),
//!             _ => Value::Null,
//!         }
//!     }
//! }
//!
//! impl Trackable<u32> for Album {
//!     fn key(&self) -> u32 {
//!         self.id
//!     }
//!
//!     fn describe() -> Vec<FieldDescriptor<u32>> {
//!         vec![FieldDescriptor::key("id"), FieldDescriptor::list::<Track>("tracks")]
//!     }
//!
//!     fn scalar(&self, _field: &str) -> Value {
//!         Value::Null
//!     }
//!
//!     fn list(&self, edge: &str) -> Option<Vec<EntityRef<u32>>> {
//!         match edge {
//!             "tracks" => Some(self.tracks.iter().map(|t| t.clone() as EntityRef<u32>).collect()),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! let intro = Arc::new(Track { id: 1, title: "Intro".into() });
//! let bonus = Arc::new(Track { id: 9, title: "Bonus".into() });
//! let edited = Arc::new(Album { id: 1, tracks: vec![intro.clone(), bonus.clone()] });
//! let stored = Arc::new(Album {
//!     id: 1,
//!     tracks: vec![Arc::new(Track { id: 1, title: "Intro".into() })],
//! });
//!
//! let mut differ = GraphDiffer::<u32>::new();
//! differ.register_ownership::<Album>("tracks", true, true, true).unwrap();
//!
//! let package = differ.diff(Some(&edited), Some(&stored)).unwrap();
//! assert_eq!(package.change_of(&bonus), ChangeType::Added);
//! assert_eq!(package.change_of(&intro), ChangeType::None);
//! assert_eq!(package.len(), 1);
//! ```

pub mod compare;
pub mod config;
pub mod differ;
pub mod error;
pub mod package;
mod reconcile;
pub mod traits;

#[cfg(test)]
mod fixtures;

pub use compare::{differing_fields, entities_equal, scalars_equal};
pub use config::DifferConfig;
pub use differ::GraphDiffer;
pub use error::{DiffError, DiffResult};
pub use package::{ChangePackage, OwnedChange, PackageSummary, RelationshipChange};
pub use traits::ChangeAssessor;
