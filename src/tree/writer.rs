//! Write-side persistence hooks
//!
//! `TreeWriter` is the integration point the host persistence layer calls
//! at its transaction boundaries: on first persist, on updates (with a flag
//! for parent changes), and for the explicit bulk repair of descendant
//! paths after a reparent. The engine computes; the store writes; one batch
//! of path writes per enclosing transaction is assumed.

use crate::error::TreeError;
use crate::store::NodeStore;
use crate::tree::codec::PathCodec;
use crate::tree::node::TreeNode;
use crate::tree::path::NodePath;
use crate::tree::repository::PathFilter;
use crate::tree::strategy::{MaterializedPathStrategy, WriteContext};
use tracing::{debug, info};

pub struct TreeWriter<S> {
    store: S,
    strategy: MaterializedPathStrategy,
}

impl<S: NodeStore> TreeWriter<S> {
    pub fn new(store: S, codec: PathCodec) -> Self {
        Self {
            store,
            strategy: MaterializedPathStrategy::new(codec),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Give the store back, e.g. to hand it to a `TreeRepository`.
    pub fn into_store(self) -> S {
        self.store
    }

    pub fn strategy(&self) -> &MaterializedPathStrategy {
        &self.strategy
    }

    /// First persist: the node's id is now known, so its path can be
    /// computed and the row written. Parents must be persisted before
    /// their children.
    pub fn insert(&self, node: &mut S::Node, parent: Option<&S::Node>) -> Result<(), TreeError> {
        self.strategy.apply(node, parent, &WriteContext::insert())?;
        self.store.put(node)?;
        debug!(path = %node.path(), "inserted node");
        Ok(())
    }

    /// Subsequent persist: recomputes the path only when the parent
    /// reference changed or the path was reset. Returns whether the row's
    /// path was rewritten. A rewrite re-keys the row (rows are keyed by
    /// path), so the old key is removed first.
    ///
    /// Reparenting rewrites only this node's path. Descendant rows keep
    /// their old prefixes until `repair_subtree` is invoked; callers own
    /// that follow-up.
    pub fn update(
        &self,
        node: &mut S::Node,
        parent: Option<&S::Node>,
        parent_changed: bool,
    ) -> Result<bool, TreeError> {
        let old = node.path().clone();
        let rewritten = self
            .strategy
            .apply(node, parent, &WriteContext::update(parent_changed))?;
        if !rewritten {
            return Ok(false);
        }
        if !old.is_unset() && old != *node.path() {
            self.store.remove(&old)?;
        }
        self.store.put(node)?;
        debug!(old = %old, new = %node.path(), "updated node path");
        Ok(true)
    }

    /// Bulk path repair after a reparent: every row still prefixed by the
    /// node's old path is re-keyed under the new prefix, keeping its own
    /// trailing segments. Returns the number of repaired rows.
    ///
    /// Explicit by design — the per-node update above never cascades, so a
    /// caller moving a subtree runs `update` on the node and then this once.
    pub fn repair_subtree(
        &self,
        old_prefix: &NodePath,
        new_prefix: &NodePath,
    ) -> Result<usize, TreeError> {
        let filter = PathFilter::default()
            .with_prefix(old_prefix.clone())
            .with_min_len(old_prefix.len() + 1);
        let descendants = self.store.select(&filter)?;

        let mut repaired = 0;
        for mut node in descendants {
            let old = node.path().clone();
            let suffix = &old.as_str()[old_prefix.len()..];
            node.set_path(new_prefix.join(suffix));
            self.store.remove(&old)?;
            self.store.put(&node)?;
            repaired += 1;
        }

        info!(
            old_prefix = %old_prefix,
            new_prefix = %new_prefix,
            repaired,
            "repaired descendant paths"
        );
        Ok(repaired)
    }
}
