//! The recursive graph visitor.
//!
//! [`GraphDiffer`] walks a source ("main") graph and a destination ("other")
//! graph side by side. Entities are matched by key within their concrete
//! type. Each edge is walked under the permissions its parent holds over it:
//! without `add`/`delete` the child's classification is left alone and only
//! a relationship change is reported, without `update` the child and its
//! subtree are not looked at.
//!
//! Every entity of the main graph is visited at most once per call, keyed by
//! reference identity, which is what makes cyclic graphs terminate.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, trace};

use changeset_schema::{Edge, EdgeId, OwnershipRegistry, SchemaCache};
use changeset_types::{
    ChangeType, EntityId, EntityKey, EntityRef, MarkerId, Ownership, Trackable, TypeInfo,
};

use crate::compare::{differing_fields, scalars_equal};
use crate::config::DifferConfig;
use crate::error::{DiffError, DiffResult};
use crate::package::{ChangePackage, RelationshipChange};

/// The edge being walked: who owns it and what the owner may do.
pub(crate) struct EdgeContext<K> {
    parent: Option<EntityRef<K>>,
    edge: Option<EdgeId>,
    ownership: Ownership,
}

impl<K: EntityKey> EdgeContext<K> {
    /// The implicit relationship of the top-level call, always fully owned.
    fn root() -> Self {
        Self {
            parent: None,
            edge: None,
            ownership: Ownership::full(),
        }
    }

    pub(crate) fn ownership(&self) -> Ownership {
        self.ownership
    }

    fn relationship(&self, value: &EntityRef<K>, change: ChangeType) -> RelationshipChange<K> {
        RelationshipChange {
            parent: self.parent.clone(),
            edge: self.edge,
            value: Arc::clone(value),
            change,
            ownership: self.ownership,
        }
    }
}

/// State threaded through one top-level call.
///
/// Visited entities are held, not just their addresses: accessors may hand
/// out fresh handles, and a dropped handle's address can be reused by the
/// next one within the same call.
pub(crate) struct Walk<K> {
    visited: HashMap<EntityId, EntityRef<K>>,
    pub(crate) package: ChangePackage<K>,
}

impl<K: EntityKey> Walk<K> {
    fn new() -> Self {
        Self {
            visited: HashMap::new(),
            package: ChangePackage::new(),
        }
    }
}

/// Same concrete type and equal keys.
pub(crate) fn same_identity<K: EntityKey>(a: &EntityRef<K>, b: &EntityRef<K>) -> bool {
    a.type_info() == b.type_info() && a.key() == b.key()
}

/// Object-graph differ.
///
/// Configure ignore rules and ownership first, then call [`diff`] or
/// [`diff_list`] any number of times. Configuration needs `&mut self`;
/// diffing only needs `&self`, so a configured differ can be shared between
/// threads.
///
/// ```rust
/// use std::sync::Arc;
/// use changeset_diff::GraphDiffer;
/// use changeset_types::{ChangeType, FieldDescriptor, Trackable};
/// use serde_json::{json, Value};
///
/// #[derive(Debug)]
/// struct Genre {
///     id: u32,
///     name: String,
/// }
///
/// impl Trackable<u32> for Genre {
///     fn key(&self) -> u32 {
///         self.id
///     }
///
///     fn describe() -> Vec<FieldDescriptor<u32>> {
///         vec![FieldDescriptor::key("id"), FieldDescriptor::scalar("name")]
///     }
///
///     fn scalar(&self, field: &str) -> Value {
///         match field {
///             "id" => json!(self.id),
///             "name" => json!(self.name),
///             _ => Value::Null,
///         }
///     }
/// }
///
/// let differ = GraphDiffer::<u32>::new();
/// let edited = Arc::new(Genre { id: 1, name: "Film noir".into() });
/// let stored = Arc::new(Genre { id: 1, name: "Noir".into() });
///
/// let package = differ.diff(Some(&edited), Some(&stored)).unwrap();
/// assert_eq!(package.change_of(&edited), ChangeType::Updated);
/// ```
///
/// [`diff`]: GraphDiffer::diff
/// [`diff_list`]: GraphDiffer::diff_list
pub struct GraphDiffer<K> {
    schemas: SchemaCache<K>,
    ownership: OwnershipRegistry,
    config: DifferConfig,
}

impl<K: EntityKey> GraphDiffer<K> {
    /// Create a differ with default configuration.
    pub fn new() -> Self {
        Self::with_config(DifferConfig::default())
    }

    /// Create a differ from a declarative configuration.
    pub fn with_config(config: DifferConfig) -> Self {
        let mut schemas = SchemaCache::new();
        for name in &config.ignored_fields {
            schemas.ignore_name(name.clone());
        }
        Self {
            schemas,
            ownership: OwnershipRegistry::new(),
            config,
        }
    }

    pub fn config(&self) -> &DifferConfig {
        &self.config
    }

    pub fn schemas(&self) -> &SchemaCache<K> {
        &self.schemas
    }

    pub fn ownership(&self) -> &OwnershipRegistry {
        &self.ownership
    }

    // ---------------------------------------------------------------
    // Configuration
    // ---------------------------------------------------------------

    /// Ignore every field declared by marker `M`. `M` may be a trait object
    /// type (`dyn Audited`) or a concrete type, in which case all of that
    /// type's own fields are ignored too.
    pub fn ignore_fields_of_type<M: ?Sized + 'static>(&mut self) -> &mut Self {
        self.schemas.ignore_marker(MarkerId::of::<M>());
        self
    }

    /// Ignore every field with one of these names, on any type.
    pub fn ignore_fields_by_name<I, S>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            self.schemas.ignore_name(name);
        }
        self
    }

    /// Narrow the permissions a `P` holds over the entities behind `edge`.
    ///
    /// Fails if `P` does not describe an edge with that name.
    pub fn register_ownership<P: Trackable<K>>(
        &mut self,
        edge: &str,
        add: bool,
        update: bool,
        delete: bool,
    ) -> DiffResult<&mut Self> {
        let owner = TypeInfo::of::<P>();
        if self.config.prewarm_on_register {
            self.schemas.describe(owner)?;
        }
        self.ownership
            .register(owner, edge, Ownership::new(add, update, delete))?;
        Ok(self)
    }

    /// Build the schema of `T` and everything reachable from it now rather
    /// than on first diff.
    pub fn prewarm<T: Trackable<K>>(&self) -> DiffResult<()> {
        self.schemas.describe(TypeInfo::of::<T>())?;
        Ok(())
    }

    // ---------------------------------------------------------------
    // Entry points
    // ---------------------------------------------------------------

    /// Diff a source entity against its destination counterpart. Either side
    /// may be absent.
    pub fn diff<T: Trackable<K>>(
        &self,
        source: Option<&Arc<T>>,
        destination: Option<&Arc<T>>,
    ) -> DiffResult<ChangePackage<K>> {
        self.prewarm::<T>()?;
        let source = source.map(|s| Arc::clone(s) as EntityRef<K>);
        let destination = destination.map(|d| Arc::clone(d) as EntityRef<K>);
        self.diff_refs(source.as_ref(), destination.as_ref())
    }

    /// Diff two top-level collections. Absent collections are empty.
    pub fn diff_list<T: Trackable<K>>(
        &self,
        list: Option<&[Arc<T>]>,
        compare_with: Option<&[Arc<T>]>,
    ) -> DiffResult<ChangePackage<K>> {
        self.prewarm::<T>()?;
        let erase = |items: &[Arc<T>]| -> Vec<EntityRef<K>> {
            items
                .iter()
                .map(|item| Arc::clone(item) as EntityRef<K>)
                .collect()
        };
        let list = list.map(erase);
        let compare_with = compare_with.map(erase);
        self.diff_list_refs(list.as_deref(), compare_with.as_deref())
    }

    /// [`diff`](Self::diff) over type-erased handles.
    pub fn diff_refs(
        &self,
        source: Option<&EntityRef<K>>,
        destination: Option<&EntityRef<K>>,
    ) -> DiffResult<ChangePackage<K>> {
        let mut walk = Walk::new();
        self.diff_entity(&EdgeContext::root(), source, destination, &mut walk)?;
        Ok(Self::finish(walk))
    }

    /// [`diff_list`](Self::diff_list) over type-erased handles.
    pub fn diff_list_refs(
        &self,
        list: Option<&[EntityRef<K>]>,
        compare_with: Option<&[EntityRef<K>]>,
    ) -> DiffResult<ChangePackage<K>> {
        let mut walk = Walk::new();
        self.reconcile_list(
            &EdgeContext::root(),
            list.unwrap_or_default(),
            compare_with.unwrap_or_default(),
            &mut walk,
        )?;
        Ok(Self::finish(walk))
    }

    fn finish(walk: Walk<K>) -> ChangePackage<K> {
        let package = walk.package;
        debug!(
            visited = walk.visited.len(),
            owned = package.len(),
            relationships = package.relationships.len(),
            "diff complete"
        );
        package
    }

    // ---------------------------------------------------------------
    // Traversal
    // ---------------------------------------------------------------

    pub(crate) fn diff_entity(
        &self,
        ctx: &EdgeContext<K>,
        main: Option<&EntityRef<K>>,
        other: Option<&EntityRef<K>>,
        walk: &mut Walk<K>,
    ) -> DiffResult<()> {
        if let Some(main) = main {
            if walk
                .visited
                .insert(EntityId::of(main), Arc::clone(main))
                .is_some()
            {
                trace!(key = ?main.key(), "already visited");
                return Ok(());
            }
        }

        match (main, other) {
            (None, None) => {}
            (None, Some(other)) => self.mark_deleted(ctx, other, walk),
            (Some(main), None) => self.mark_added(ctx, main, walk),
            (Some(main), Some(other)) if !same_identity(main, other) => {
                // A different entity now sits on the edge: the old one leaves
                // and the new one arrives, neither is descended into.
                self.mark_deleted(ctx, other, walk);
                self.mark_added(ctx, main, walk);
            }
            (Some(main), Some(other)) => self.diff_matched(ctx, main, other, walk)?,
        }
        Ok(())
    }

    /// Key-equal pair: compare scalars, then walk every edge.
    fn diff_matched(
        &self,
        ctx: &EdgeContext<K>,
        main: &EntityRef<K>,
        other: &EntityRef<K>,
        walk: &mut Walk<K>,
    ) -> DiffResult<()> {
        if !ctx.ownership.update {
            trace!(key = ?main.key(), "no update permission, subtree skipped");
            return Ok(());
        }

        let schema = self.schemas.describe(main.type_info())?;
        if !scalars_equal(&schema, &**main, &**other) {
            trace!(
                key = ?main.key(),
                fields = ?differing_fields(&schema, &**main, &**other),
                "scalar fields differ"
            );
            walk.package.classify(main, ChangeType::Updated);
        }

        for edge in schema.single_edges() {
            let id = EdgeId::new(schema.info(), edge.name);
            let main_child = checked_single(id, edge, main.single(edge.name))?;
            let other_child = checked_single(id, edge, other.single(edge.name))?;
            self.diff_entity(
                &self.edge_context(main, id),
                main_child.as_ref(),
                other_child.as_ref(),
                walk,
            )?;
        }

        for edge in schema.list_edges() {
            let id = EdgeId::new(schema.info(), edge.name);
            let main_items = checked_list(id, edge, main.list(edge.name))?;
            let other_items = checked_list(id, edge, other.list(edge.name))?;
            let child_ctx = self.edge_context(main, id);
            self.reconcile_list(&child_ctx, &main_items, &other_items, walk)?;
        }

        Ok(())
    }

    pub(crate) fn mark_added(
        &self,
        ctx: &EdgeContext<K>,
        entity: &EntityRef<K>,
        walk: &mut Walk<K>,
    ) {
        walk.package.relate(ctx.relationship(entity, ChangeType::Added));
        if ctx.ownership.add {
            walk.package.classify(entity, ChangeType::Added);
        }
    }

    pub(crate) fn mark_deleted(
        &self,
        ctx: &EdgeContext<K>,
        entity: &EntityRef<K>,
        walk: &mut Walk<K>,
    ) {
        walk.package.relate(ctx.relationship(entity, ChangeType::Deleted));
        if ctx.ownership.delete {
            walk.package.classify(entity, ChangeType::Deleted);
        }
    }

    fn edge_context(&self, parent: &EntityRef<K>, edge: EdgeId) -> EdgeContext<K> {
        EdgeContext {
            parent: Some(Arc::clone(parent)),
            edge: Some(edge),
            ownership: self.ownership.lookup(&edge),
        }
    }
}

impl<K: EntityKey> Default for GraphDiffer<K> {
    fn default() -> Self {
        Self::new()
    }
}

fn checked_single<K: EntityKey>(
    id: EdgeId,
    edge: &Edge<K>,
    value: Option<EntityRef<K>>,
) -> DiffResult<Option<EntityRef<K>>> {
    if let Some(entity) = &value {
        check_target(id, edge, entity)?;
    }
    Ok(value)
}

fn checked_list<K: EntityKey>(
    id: EdgeId,
    edge: &Edge<K>,
    values: Option<Vec<EntityRef<K>>>,
) -> DiffResult<Vec<EntityRef<K>>> {
    let values = values.unwrap_or_default();
    for entity in &values {
        check_target(id, edge, entity)?;
    }
    Ok(values)
}

/// Edge accessors must yield the type the edge declares.
fn check_target<K: EntityKey>(
    id: EdgeId,
    edge: &Edge<K>,
    entity: &EntityRef<K>,
) -> DiffResult<()> {
    let actual = entity.type_info();
    if actual != edge.target {
        return Err(DiffError::EdgeTypeMismatch {
            edge: id,
            expected: edge.target.name(),
            actual: actual.name(),
        });
    }
    Ok(())
}
