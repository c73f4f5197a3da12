use std::collections::{BTreeSet, HashSet};

use changeset_types::{FieldDescriptor, MarkerId, TrackableContract, TypeInfo};

/// Which fields are excluded from equality comparison and traversal.
///
/// A field is ignored when it is declared by an ignored marker, when its
/// owning type is itself an ignored marker, or when its name is ignored.
/// [`TrackableContract`] is always an ignored marker.
#[derive(Clone, Debug)]
pub struct IgnoreRules {
    markers: HashSet<MarkerId>,
    names: BTreeSet<String>,
}

impl IgnoreRules {
    /// Rules that ignore only the identity contract.
    pub fn new() -> Self {
        let mut markers = HashSet::new();
        markers.insert(MarkerId::of::<TrackableContract>());
        Self {
            markers,
            names: BTreeSet::new(),
        }
    }

    /// Ignore every field declared by `marker`. Returns `false` if it was
    /// already ignored.
    pub fn ignore_marker(&mut self, marker: MarkerId) -> bool {
        self.markers.insert(marker)
    }

    /// Ignore every field called `name`, on any type.
    pub fn ignore_name(&mut self, name: impl Into<String>) -> bool {
        self.names.insert(name.into())
    }

    pub fn is_marker_ignored(&self, marker: &MarkerId) -> bool {
        self.markers.contains(marker)
    }

    pub fn is_name_ignored(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Ignored field names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Whether `field` of `owner` is ignored.
    pub fn ignores<K>(&self, owner: &TypeInfo<K>, field: &FieldDescriptor<K>) -> bool {
        let by_marker = self.is_marker_ignored(&owner.as_marker())
            || field
                .declared_by_markers()
                .iter()
                .any(|marker| self.is_marker_ignored(marker));
        by_marker || self.is_name_ignored(field.name())
    }
}

impl Default for IgnoreRules {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use changeset_types::Trackable;
    use serde_json::Value;

    trait Stamped {}

    #[derive(Debug)]
    struct Invoice;

    impl Trackable<u32> for Invoice {
        fn key(&self) -> u32 {
            0
        }

        fn describe() -> Vec<FieldDescriptor<u32>> {
            vec![
                FieldDescriptor::key("id"),
                FieldDescriptor::scalar("stamped_at").declared_by::<dyn Stamped>(),
                FieldDescriptor::scalar("total"),
            ]
        }

        fn scalar(&self, _field: &str) -> Value {
            Value::Null
        }
    }

    fn field(name: &str) -> FieldDescriptor<u32> {
        Invoice::describe()
            .into_iter()
            .find(|f| f.name() == name)
            .unwrap()
    }

    #[test]
    fn contract_fields_always_ignored() {
        let rules = IgnoreRules::new();
        let owner = TypeInfo::of::<Invoice>();
        assert!(rules.ignores(&owner, &field("id")));
        assert!(!rules.ignores(&owner, &field("total")));
    }

    #[test]
    fn ignore_by_marker() {
        let mut rules = IgnoreRules::new();
        let owner = TypeInfo::of::<Invoice>();
        assert!(!rules.ignores(&owner, &field("stamped_at")));
        assert!(rules.ignore_marker(MarkerId::of::<dyn Stamped>()));
        assert!(!rules.ignore_marker(MarkerId::of::<dyn Stamped>()));
        assert!(rules.ignores(&owner, &field("stamped_at")));
        assert!(!rules.ignores(&owner, &field("total")));
    }

    #[test]
    fn ignoring_owner_type_ignores_all_fields() {
        let mut rules = IgnoreRules::new();
        let owner = TypeInfo::of::<Invoice>();
        rules.ignore_marker(owner.as_marker());
        assert!(Invoice::describe().iter().all(|f| rules.ignores(&owner, f)));
    }

    #[test]
    fn ignore_by_name() {
        let mut rules = IgnoreRules::new();
        rules.ignore_name("total");
        let owner = TypeInfo::of::<Invoice>();
        assert!(rules.ignores(&owner, &field("total")));
        assert_eq!(rules.names().collect::<Vec<_>>(), vec!["total"]);
    }
}
