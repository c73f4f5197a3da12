//! Per-type self-description.
//!
//! Instead of discovering fields at runtime, each [`Trackable`] type lists its
//! fields as [`FieldDescriptor`]s. Edge fields carry the [`TypeInfo`] of the
//! nested type so the schema cache can recurse without an instance.

use std::any::{type_name, TypeId};
use std::fmt;
use std::marker::PhantomData;

use crate::entity::{EntityKey, Trackable};

/// Marker always ignored for equality: fields that belong to the identity
/// contract itself (the key, bookkeeping columns tied to it) rather than to
/// the entity's content.
#[derive(Clone, Copy, Debug, Default)]
pub struct TrackableContract;

/// Identifies a marker type that groups fields, typically a trait object type
/// such as `dyn Audited` or a plain struct standing in for a shared base.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerId {
    id: TypeId,
    name: &'static str,
}

impl MarkerId {
    /// Marker id of `M`. `M` may be unsized, e.g. `dyn Trait`.
    pub fn of<M: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<M>(),
            name: type_name::<M>(),
        }
    }

    /// The underlying type id.
    pub fn type_id(&self) -> TypeId {
        self.id
    }

    /// Human-readable type name, for logs and errors.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Debug for MarkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MarkerId({})", self.name)
    }
}

/// Runtime description of a concrete [`Trackable`] type.
pub struct TypeInfo<K> {
    id: TypeId,
    name: &'static str,
    describe: fn() -> Vec<FieldDescriptor<K>>,
    _key: PhantomData<fn() -> K>,
}

impl<K: EntityKey> TypeInfo<K> {
    /// Type info of `T`.
    pub fn of<T: Trackable<K>>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
            describe: T::describe,
            _key: PhantomData,
        }
    }
}

impl<K> TypeInfo<K> {
    /// The concrete type id.
    pub fn type_id(&self) -> TypeId {
        self.id
    }

    /// Fully qualified type name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The type as a marker, so a whole type can be ignored.
    pub fn as_marker(&self) -> MarkerId {
        MarkerId {
            id: self.id,
            name: self.name,
        }
    }

    /// Run the type's field description.
    pub fn describe(&self) -> Vec<FieldDescriptor<K>> {
        (self.describe)()
    }
}

impl<K> Clone for TypeInfo<K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K> Copy for TypeInfo<K> {}

impl<K> PartialEq for TypeInfo<K> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<K> Eq for TypeInfo<K> {}

impl<K> fmt::Debug for TypeInfo<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeInfo({})", self.name)
    }
}

/// How a field takes part in a diff, as declared by its type.
pub enum FieldKind<K> {
    /// A plain value compared by the equality comparator.
    Scalar,
    /// A single nested entity of the given type.
    Single(TypeInfo<K>),
    /// An ordered collection of nested entities of the given type.
    List(TypeInfo<K>),
}

impl<K> FieldKind<K> {
    /// Nested type for edge kinds.
    pub fn target(&self) -> Option<TypeInfo<K>> {
        match self {
            FieldKind::Scalar => None,
            FieldKind::Single(info) | FieldKind::List(info) => Some(*info),
        }
    }

    /// Returns `true` for single and list edges.
    pub fn is_edge(&self) -> bool {
        !matches!(self, FieldKind::Scalar)
    }
}

impl<K> Clone for FieldKind<K> {
    fn clone(&self) -> Self {
        match self {
            FieldKind::Scalar => FieldKind::Scalar,
            FieldKind::Single(info) => FieldKind::Single(*info),
            FieldKind::List(info) => FieldKind::List(*info),
        }
    }
}

impl<K> fmt::Debug for FieldKind<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Scalar => f.write_str("Scalar"),
            FieldKind::Single(info) => write!(f, "Single({})", info.name()),
            FieldKind::List(info) => write!(f, "List({})", info.name()),
        }
    }
}

/// One field of a [`Trackable`] type.
pub struct FieldDescriptor<K> {
    name: &'static str,
    kind: FieldKind<K>,
    declared_by: Vec<MarkerId>,
}

impl<K: EntityKey> FieldDescriptor<K> {
    /// A plain value field.
    pub fn scalar(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Scalar,
            declared_by: Vec::new(),
        }
    }

    /// The identity key field. Declared by [`TrackableContract`] and
    /// therefore never compared.
    pub fn key(name: &'static str) -> Self {
        Self::scalar(name).declared_by::<TrackableContract>()
    }

    /// A single-entity edge to `T`.
    pub fn single<T: Trackable<K>>(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Single(TypeInfo::of::<T>()),
            declared_by: Vec::new(),
        }
    }

    /// A list edge whose elements are `T`.
    pub fn list<T: Trackable<K>>(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::List(TypeInfo::of::<T>()),
            declared_by: Vec::new(),
        }
    }

    /// Record that the field comes from marker `M` (a shared trait or base).
    pub fn declared_by<M: ?Sized + 'static>(mut self) -> Self {
        self.declared_by.push(MarkerId::of::<M>());
        self
    }
}

impl<K> FieldDescriptor<K> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> &FieldKind<K> {
        &self.kind
    }

    pub fn declared_by_markers(&self) -> &[MarkerId] {
        &self.declared_by
    }
}

impl<K> Clone for FieldDescriptor<K> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            kind: self.kind.clone(),
            declared_by: self.declared_by.clone(),
        }
    }
}

impl<K> fmt::Debug for FieldDescriptor<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("declared_by", &self.declared_by)
            .finish()
    }
}
