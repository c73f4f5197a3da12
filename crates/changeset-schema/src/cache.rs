//! Lazily built, per-type field classification.
//!
//! [`SchemaCache::describe`] classifies each field of a type exactly once,
//! then does the same for every type reachable through its edges. Types that
//! reference each other are handled with a work-list: a type is staged before
//! its edge targets are visited, so a back-reference finds it already staged.

use std::any::TypeId;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use tracing::{debug, trace};

use changeset_types::{EntityKey, FieldKind, MarkerId, TypeInfo};

use crate::error::{SchemaError, SchemaResult};
use crate::rules::IgnoreRules;

/// The classification a field resolves to. Every field resolves to exactly
/// one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldClass {
    /// Excluded by an ignore rule.
    Ignored,
    /// Compared by the equality comparator.
    Scalar,
    /// A single nested entity, walked by the differ.
    SingleEdge,
    /// A list of nested entities, reconciled by key.
    ListEdge,
}

/// An edge field and the type it leads to.
pub struct Edge<K> {
    pub name: &'static str,
    pub target: TypeInfo<K>,
}

impl<K> Clone for Edge<K> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            target: self.target,
        }
    }
}

impl<K> std::fmt::Debug for Edge<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Edge({} -> {})", self.name, self.target.name())
    }
}

/// Classified fields of one concrete type.
#[derive(Debug)]
pub struct TypeSchema<K> {
    info: TypeInfo<K>,
    fields: Vec<(&'static str, FieldClass)>,
    scalars: Vec<&'static str>,
    single_edges: Vec<Edge<K>>,
    list_edges: Vec<Edge<K>>,
}

impl<K: EntityKey> TypeSchema<K> {
    /// Classify every field of `info` under `rules`.
    pub fn build(info: TypeInfo<K>, rules: &IgnoreRules) -> SchemaResult<Self> {
        let mut schema = Self {
            info,
            fields: Vec::new(),
            scalars: Vec::new(),
            single_edges: Vec::new(),
            list_edges: Vec::new(),
        };
        let mut seen = HashSet::new();

        for field in info.describe() {
            let name = field.name();
            if name.is_empty() {
                return Err(SchemaError::EmptyFieldName {
                    type_name: info.name(),
                });
            }
            if !seen.insert(name) {
                return Err(SchemaError::DuplicateField {
                    type_name: info.name(),
                    field: name,
                });
            }

            let class = if rules.ignores(&info, &field) {
                FieldClass::Ignored
            } else {
                match field.kind() {
                    FieldKind::Scalar => {
                        schema.scalars.push(name);
                        FieldClass::Scalar
                    }
                    FieldKind::Single(target) => {
                        schema.single_edges.push(Edge { name, target: *target });
                        FieldClass::SingleEdge
                    }
                    FieldKind::List(target) => {
                        schema.list_edges.push(Edge { name, target: *target });
                        FieldClass::ListEdge
                    }
                }
            };
            schema.fields.push((name, class));
        }

        Ok(schema)
    }
}

impl<K> TypeSchema<K> {
    pub fn info(&self) -> TypeInfo<K> {
        self.info
    }

    /// Classification of a field, `None` if the type does not describe it.
    pub fn classify(&self, field: &str) -> Option<FieldClass> {
        self.fields
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, class)| *class)
    }

    /// Scalar fields the equality comparator looks at, in declaration order.
    pub fn scalars(&self) -> &[&'static str] {
        &self.scalars
    }

    pub fn single_edges(&self) -> &[Edge<K>] {
        &self.single_edges
    }

    pub fn list_edges(&self) -> &[Edge<K>] {
        &self.list_edges
    }

    /// Fields excluded from equality: ignored fields and all edges.
    pub fn ignored(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields
            .iter()
            .filter(|(_, class)| *class != FieldClass::Scalar)
            .map(|(name, _)| *name)
    }

    fn edge_targets(&self) -> impl Iterator<Item = TypeInfo<K>> + '_ {
        self.single_edges
            .iter()
            .chain(self.list_edges.iter())
            .map(|edge| edge.target)
    }
}

/// Cache of [`TypeSchema`]s keyed by concrete type.
///
/// Reads take a shared lock. A miss takes the write lock and builds the whole
/// reachable type graph under it, so concurrent first use of a type builds it
/// once. Changing the ignore rules drops every cached schema.
pub struct SchemaCache<K> {
    rules: IgnoreRules,
    schemas: RwLock<HashMap<TypeId, Arc<TypeSchema<K>>>>,
}

impl<K: EntityKey> SchemaCache<K> {
    /// Create an empty cache with default ignore rules.
    pub fn new() -> Self {
        Self::with_rules(IgnoreRules::new())
    }

    /// Create an empty cache with the given ignore rules.
    pub fn with_rules(rules: IgnoreRules) -> Self {
        Self {
            rules,
            schemas: RwLock::new(HashMap::new()),
        }
    }

    pub fn rules(&self) -> &IgnoreRules {
        &self.rules
    }

    /// Ignore every field declared by `marker`.
    pub fn ignore_marker(&mut self, marker: MarkerId) {
        if self.rules.ignore_marker(marker) {
            debug!(marker = marker.name(), "ignoring fields by marker");
            self.invalidate();
        }
    }

    /// Ignore every field called `name`.
    pub fn ignore_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        if self.rules.ignore_name(name.clone()) {
            debug!(field = %name, "ignoring fields by name");
            self.invalidate();
        }
    }

    /// The cached schema of a type, without building it.
    pub fn get(&self, type_id: TypeId) -> Option<Arc<TypeSchema<K>>> {
        self.schemas
            .read()
            .expect("lock poisoned")
            .get(&type_id)
            .cloned()
    }

    /// The schema of `info`, building it and every type reachable from it on
    /// first use.
    pub fn describe(&self, info: TypeInfo<K>) -> SchemaResult<Arc<TypeSchema<K>>> {
        if let Some(schema) = self.get(info.type_id()) {
            return Ok(schema);
        }

        let mut schemas = self.schemas.write().expect("lock poisoned");
        if let Some(schema) = schemas.get(&info.type_id()) {
            return Ok(Arc::clone(schema));
        }

        // Stage everything first so a failing nested type leaves the cache
        // untouched.
        let root = Arc::new(TypeSchema::build(info, &self.rules)?);
        let mut pending: Vec<TypeInfo<K>> = root.edge_targets().collect();
        let mut staged = HashMap::new();
        staged.insert(info.type_id(), Arc::clone(&root));

        while let Some(next) = pending.pop() {
            let id = next.type_id();
            if schemas.contains_key(&id) || staged.contains_key(&id) {
                continue;
            }
            let schema = TypeSchema::build(next, &self.rules)?;
            trace!(
                type_name = next.name(),
                scalars = schema.scalars.len(),
                single_edges = schema.single_edges.len(),
                list_edges = schema.list_edges.len(),
                "classified type"
            );
            pending.extend(schema.edge_targets());
            staged.insert(id, Arc::new(schema));
        }

        debug!(root = info.name(), types = staged.len(), "built type schemas");
        schemas.extend(staged);
        Ok(root)
    }

    /// Number of cached type schemas.
    pub fn len(&self) -> usize {
        self.schemas.read().expect("lock poisoned").len()
    }

    /// Returns `true` if nothing has been built yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn invalidate(&mut self) {
        self.schemas.get_mut().expect("lock poisoned").clear();
    }
}

impl<K: EntityKey> Default for SchemaCache<K> {
    fn default() -> Self {
        Self::new()
    }
}
