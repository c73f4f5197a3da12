//! Explicit (parent type, edge) permission overrides.

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;

use tracing::debug;

use changeset_types::{EntityKey, FieldKind, Ownership, TypeInfo};

use crate::error::{SchemaError, SchemaResult};

/// Identifies an edge: a field of a particular parent type.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeId {
    owner: TypeId,
    owner_name: &'static str,
    field: &'static str,
}

impl EdgeId {
    pub fn new<K>(owner: TypeInfo<K>, field: &'static str) -> Self {
        Self {
            owner: owner.type_id(),
            owner_name: owner.name(),
            field,
        }
    }

    pub fn owner(&self) -> TypeId {
        self.owner
    }

    pub fn owner_name(&self) -> &'static str {
        self.owner_name
    }

    pub fn field(&self) -> &'static str {
        self.field
    }
}

impl fmt::Debug for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EdgeId({self})")
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let short = self.owner_name.rsplit("::").next().unwrap_or(self.owner_name);
        write!(f, "{short}.{}", self.field)
    }
}

/// Permission overrides per edge. Unregistered edges carry
/// [`Ownership::full`].
#[derive(Clone, Debug, Default)]
pub struct OwnershipRegistry {
    entries: HashMap<EdgeId, Ownership>,
}

impl OwnershipRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the permissions `owner` holds over the entities behind
    /// `edge`.
    ///
    /// Fails if `owner` does not describe an edge called `edge`. The first
    /// registration for an edge wins; later ones are ignored.
    pub fn register<K: EntityKey>(
        &mut self,
        owner: TypeInfo<K>,
        edge: &str,
        ownership: Ownership,
    ) -> SchemaResult<EdgeId> {
        let field = owner
            .describe()
            .into_iter()
            .find(|field| field.name() == edge)
            .ok_or_else(|| SchemaError::UnknownEdge {
                type_name: owner.name(),
                edge: edge.to_string(),
            })?;

        if let FieldKind::Scalar = field.kind() {
            return Err(SchemaError::NotAnEdge {
                type_name: owner.name(),
                field: field.name(),
            });
        }

        let id = EdgeId::new(owner, field.name());
        match self.entries.get(&id) {
            Some(existing) => {
                debug!(edge = %id, ?existing, "ownership already registered, keeping first");
            }
            None => {
                debug!(edge = %id, ?ownership, "registered ownership");
                self.entries.insert(id, ownership);
            }
        }
        Ok(id)
    }

    /// Permissions for `edge`, full when nothing was registered.
    pub fn lookup(&self, edge: &EdgeId) -> Ownership {
        self.entries.get(edge).copied().unwrap_or_else(Ownership::full)
    }

    /// Returns `true` if `edge` has an explicit registration.
    pub fn is_registered(&self, edge: &EdgeId) -> bool {
        self.entries.contains_key(edge)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
