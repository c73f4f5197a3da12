use std::fmt;

use serde::{Deserialize, Serialize};

/// Classification the differ assigns to an entity.
///
/// Classifications are mutually exclusive. Once an entity has been classified
/// during a diff call the classification is final for that call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeType {
    /// Present on both sides with no scalar difference (or never classified).
    #[default]
    None,
    /// Present in the source graph only.
    Added,
    /// Present on both sides with at least one differing scalar field.
    Updated,
    /// Present in the destination graph only.
    Deleted,
}

impl ChangeType {
    /// Returns `true` for every classification except [`ChangeType::None`].
    pub fn is_change(&self) -> bool {
        !matches!(self, ChangeType::None)
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ChangeType::None => "none",
            ChangeType::Added => "added",
            ChangeType::Updated => "updated",
            ChangeType::Deleted => "deleted",
        };
        f.write_str(label)
    }
}

/// Permissions a parent holds over the children reachable through one edge.
///
/// When a permission is missing the differ still reports the relationship
/// change, but leaves the child's own classification untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ownership {
    /// The parent may classify children as [`ChangeType::Added`].
    pub add: bool,
    /// The parent may compare children and descend into their edges.
    pub update: bool,
    /// The parent may classify children as [`ChangeType::Deleted`].
    pub delete: bool,
}

impl Ownership {
    /// Create a permission triple with explicit values.
    pub const fn new(add: bool, update: bool, delete: bool) -> Self {
        Self {
            add,
            update,
            delete,
        }
    }

    /// All permissions granted. This is what unregistered edges and the
    /// implicit root relationship carry.
    pub const fn full() -> Self {
        Self::new(true, true, true)
    }

    /// No permissions: changes are reported as relationships only.
    pub const fn reference_only() -> Self {
        Self::new(false, false, false)
    }

    /// Returns `true` if every permission is granted.
    pub fn is_full(&self) -> bool {
        self.add && self.update && self.delete
    }
}

impl Default for Ownership {
    fn default() -> Self {
        Self::full()
    }
}
