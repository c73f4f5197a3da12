//! Structural equality over the scalar fields of one entity pair.
//!
//! Only fields the schema classifies as scalar are looked at; ignored fields
//! and edges never influence the result. Values are compared as JSON values,
//! so arrays (byte buffers included) compare element-wise.

use changeset_schema::TypeSchema;
use changeset_types::{EntityKey, Trackable};

/// Equality of two optional entities: both absent is equal, one absent is
/// not.
pub fn entities_equal<K: EntityKey>(
    schema: &TypeSchema<K>,
    main: Option<&dyn Trackable<K>>,
    other: Option<&dyn Trackable<K>>,
) -> bool {
    match (main, other) {
        (None, None) => true,
        (Some(main), Some(other)) => scalars_equal(schema, main, other),
        _ => false,
    }
}

/// Returns `true` if every scalar field of `schema` holds the same value on
/// both entities.
pub fn scalars_equal<K: EntityKey>(
    schema: &TypeSchema<K>,
    main: &dyn Trackable<K>,
    other: &dyn Trackable<K>,
) -> bool {
    schema
        .scalars()
        .iter()
        .all(|field| main.scalar(field) == other.scalar(field))
}

/// Names of the scalar fields whose values differ.
pub fn differing_fields<K: EntityKey>(
    schema: &TypeSchema<K>,
    main: &dyn Trackable<K>,
    other: &dyn Trackable<K>,
) -> Vec<&'static str> {
    schema
        .scalars()
        .iter()
        .copied()
        .filter(|field| main.scalar(field) != other.scalar(field))
        .collect()
}
