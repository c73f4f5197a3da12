//! The [`Trackable`] contract and entity identity.

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use serde_json::Value;

use crate::descriptor::{FieldDescriptor, TypeInfo};

/// Bound for identity keys.
///
/// Keys are only ever compared between entities of the same concrete type, so
/// they need not be globally unique.
pub trait EntityKey: Clone + Eq + Hash + fmt::Debug + Send + Sync + 'static {}

impl<T> EntityKey for T where T: Clone + Eq + Hash + fmt::Debug + Send + Sync + 'static {}

/// Shared, type-erased handle to a diffable entity.
pub type EntityRef<K> = Arc<dyn Trackable<K>>;

/// Contract every diffable entity implements.
///
/// A type describes its fields once through [`Trackable::describe`]; the
/// schema cache turns that description into ignored, scalar, single-edge and
/// list-edge sets. The accessors are then called by field name during a diff.
///
/// ```rust
/// use std::sync::Arc;
/// use changeset_types::{EntityRef, FieldDescriptor, Trackable};
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
/// let genre: EntityRef<u32> = Arc::new(Genre { id: 7, name: "noir".into() });
/// assert_eq!(genre.key(), 7);
/// ```
pub trait Trackable<K: EntityKey>: TrackableType<K> + fmt::Debug + Send + Sync + 'static {
    /// The identity key used to match this entity against its counterpart.
    fn key(&self) -> K;

    /// Describe every field of this type. Called at most once per type and
    /// differ, the result is cached.
    fn describe() -> Vec<FieldDescriptor<K>>
    where
        Self: Sized;

    /// Value of a scalar field. Unknown or null fields return [`Value::Null`].
    fn scalar(&self, field: &str) -> Value;

    /// The entity behind a single edge, `None` when the edge is null.
    fn single(&self, edge: &str) -> Option<EntityRef<K>> {
        let _ = edge;
        None
    }

    /// The entities behind a list edge, `None` when the list is null.
    fn list(&self, edge: &str) -> Option<Vec<EntityRef<K>>> {
        let _ = edge;
        None
    }
}

/// Object-safe access to the [`TypeInfo`] of a concrete [`Trackable`] type.
///
/// Implemented for every sized `Trackable`; never implement it by hand.
pub trait TrackableType<K: EntityKey> {
    /// Runtime description of the concrete type behind a handle.
    fn type_info(&self) -> TypeInfo<K>;
}

impl<K: EntityKey, T: Trackable<K>> TrackableType<K> for T {
    fn type_info(&self) -> TypeInfo<K> {
        TypeInfo::of::<T>()
    }
}

/// Reference identity of an entity instance.
///
/// Two handles share an `EntityId` iff they point at the same allocation. The
/// id is only meaningful while that allocation is alive: once every handle
/// is dropped the address may be reused. Anything that compares ids across
/// time must also hold a handle.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(usize);

impl EntityId {
    /// Identity of the value behind `entity`. Works for typed and type-erased
    /// handles alike.
    pub fn of<T: ?Sized>(entity: &Arc<T>) -> Self {
        Self(Arc::as_ptr(entity) as *const () as usize)
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({:#x})", self.0)
    }
}
