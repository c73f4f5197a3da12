//! The [`ChangeAssessor`] trait, the object-safe diffing interface.

use changeset_types::{EntityKey, EntityRef};

use crate::differ::GraphDiffer;
use crate::error::DiffResult;
use crate::package::ChangePackage;

/// Anything that can classify the changes between two entity graphs.
///
/// [`GraphDiffer`] is the provided implementation. The trait works on
/// type-erased handles so it can be used as `dyn ChangeAssessor<K>`.
pub trait ChangeAssessor<K: EntityKey>: Send + Sync {
    /// Diff one entity pair; either side may be absent.
    fn assess(
        &self,
        source: Option<&EntityRef<K>>,
        destination: Option<&EntityRef<K>>,
    ) -> DiffResult<ChangePackage<K>>;

    /// Diff two top-level collections; absent collections are empty.
    fn assess_list(
        &self,
        list: Option<&[EntityRef<K>]>,
        compare_with: Option<&[EntityRef<K>]>,
    ) -> DiffResult<ChangePackage<K>>;
}

impl<K: EntityKey> ChangeAssessor<K> for GraphDiffer<K> {
    fn assess(
        &self,
        source: Option<&EntityRef<K>>,
        destination: Option<&EntityRef<K>>,
    ) -> DiffResult<ChangePackage<K>> {
        self.diff_refs(source, destination)
    }

    fn assess_list(
        &self,
        list: Option<&[EntityRef<K>]>,
        compare_with: Option<&[EntityRef<K>]>,
    ) -> DiffResult<ChangePackage<K>> {
        self.diff_list_refs(list, compare_with)
    }
}
