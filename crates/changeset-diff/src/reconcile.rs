//! Key-based reconciliation of one list edge.
//!
//! Items are matched by key with a linear scan, first match wins when keys
//! repeat. This is O(n·m) per list, fine for the small collections entity
//! graphs tend to hold. Order never matters: a reordered list with the same
//! keys and contents produces no changes.

use changeset_types::{EntityKey, EntityRef};

use crate::differ::{same_identity, EdgeContext, GraphDiffer, Walk};
use crate::error::DiffResult;

impl<K: EntityKey> GraphDiffer<K> {
    pub(crate) fn reconcile_list(
        &self,
        ctx: &EdgeContext<K>,
        main: &[EntityRef<K>],
        other: &[EntityRef<K>],
        walk: &mut Walk<K>,
    ) -> DiffResult<()> {
        for removed in other
            .iter()
            .filter(|o| !main.iter().any(|m| same_identity(m, o)))
        {
            self.mark_deleted(ctx, removed, walk);
        }

        for item in main {
            match other.iter().find(|o| same_identity(item, o)) {
                // The edge is the same for every element, so is the context.
                Some(counterpart) if ctx.ownership().update => {
                    self.diff_entity(ctx, Some(item), Some(counterpart), walk)?;
                }
                Some(_) => {}
                None => self.mark_added(ctx, item, walk),
            }
        }

        Ok(())
    }
}
