//! The diff result: owned-entity classifications plus relationship changes.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::trace;

use changeset_schema::EdgeId;
use changeset_types::{ChangeType, EntityId, EntityKey, EntityRef, Ownership};

/// An entity whose own classification was set during the diff.
#[derive(Clone, Debug)]
pub struct OwnedChange<K> {
    pub entity: EntityRef<K>,
    pub change: ChangeType,
}

/// An edge-scoped change event.
///
/// Emitted whenever a child is added to or removed from an edge, whether or
/// not the parent was allowed to classify the child itself.
#[derive(Clone, Debug)]
pub struct RelationshipChange<K> {
    /// The entity owning the edge, `None` for the root relationship.
    pub parent: Option<EntityRef<K>>,
    /// The edge the change happened on, `None` for the root relationship.
    pub edge: Option<EdgeId>,
    /// The child that was added or removed.
    pub value: EntityRef<K>,
    pub change: ChangeType,
    /// Permissions in effect on the edge.
    pub ownership: Ownership,
}

/// Counts over a [`ChangePackage`], for logs and reports.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageSummary {
    pub added: usize,
    pub updated: usize,
    pub deleted: usize,
    pub relationships: usize,
}

/// Result of one top-level diff call.
///
/// Classifications are held here rather than on the entities, so the input
/// graphs are never mutated. Every entity the diff did not classify reports
/// [`ChangeType::None`].
#[derive(Clone, Debug)]
pub struct ChangePackage<K> {
    /// Entities whose own classification was set, in classification order.
    pub owned_entities: Vec<OwnedChange<K>>,
    /// Relationship changes, in traversal order.
    pub relationships: Vec<RelationshipChange<K>>,
    classifications: HashMap<EntityId, ChangeType>,
}

impl<K: EntityKey> ChangePackage<K> {
    /// Create an empty package.
    pub fn new() -> Self {
        Self {
            owned_entities: Vec::new(),
            relationships: Vec::new(),
            classifications: HashMap::new(),
        }
    }

    /// Classification of `entity` in this package.
    pub fn change_of<T: ?Sized>(&self, entity: &Arc<T>) -> ChangeType {
        self.classifications
            .get(&EntityId::of(entity))
            .copied()
            .unwrap_or_default()
    }

    /// Returns `true` if `entity` appears in the owned-entities list.
    pub fn is_owned<T: ?Sized>(&self, entity: &Arc<T>) -> bool {
        self.classifications.contains_key(&EntityId::of(entity))
    }

    /// Relationship changes whose value is `entity`.
    pub fn relationships_for<T: ?Sized>(&self, entity: &Arc<T>) -> Vec<&RelationshipChange<K>> {
        let id = EntityId::of(entity);
        self.relationships
            .iter()
            .filter(|r| EntityId::of(&r.value) == id)
            .collect()
    }

    /// Returns `true` if nothing was classified and no relationship changed.
    pub fn is_empty(&self) -> bool {
        self.owned_entities.is_empty() && self.relationships.is_empty()
    }

    /// Number of owned-entity classifications.
    pub fn len(&self) -> usize {
        self.owned_entities.len()
    }

    pub fn additions(&self) -> usize {
        self.count(ChangeType::Added)
    }

    pub fn updates(&self) -> usize {
        self.count(ChangeType::Updated)
    }

    pub fn deletions(&self) -> usize {
        self.count(ChangeType::Deleted)
    }

    pub fn summary(&self) -> PackageSummary {
        PackageSummary {
            added: self.additions(),
            updated: self.updates(),
            deleted: self.deletions(),
            relationships: self.relationships.len(),
        }
    }

    /// Classify `entity`. A classification is final: returns `false` and
    /// leaves the package unchanged if the entity was already classified.
    pub(crate) fn classify(&mut self, entity: &EntityRef<K>, change: ChangeType) -> bool {
        let id = EntityId::of(entity);
        if let Some(existing) = self.classifications.get(&id) {
            trace!(key = ?entity.key(), %existing, rejected = %change, "classification already final");
            return false;
        }
        trace!(key = ?entity.key(), %change, "classified entity");
        self.classifications.insert(id, change);
        self.owned_entities.push(OwnedChange {
            entity: Arc::clone(entity),
            change,
        });
        true
    }

    pub(crate) fn relate(&mut self, relationship: RelationshipChange<K>) {
        self.relationships.push(relationship);
    }

    fn count(&self, change: ChangeType) -> usize {
        self.owned_entities
            .iter()
            .filter(|owned| owned.change == change)
            .count()
    }
}

impl<K: EntityKey> Default for ChangePackage<K> {
    fn default() -> Self {
        Self::new()
    }
}
