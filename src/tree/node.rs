//! Tree node capability
//!
//! An entity participates in the tree by implementing `TreeNode`: it exposes
//! its store-assigned id, a weak parent reference, its materialized path, and
//! an in-memory children cache. The capability is declared explicitly at the
//! type level; there is no runtime reflection over entity shapes.
//!
//! The children cache is keyed by the stable integer id, not by the mutable
//! path string, so a path recomputation can never strand a stale cache key.

use crate::error::TreeError;
use crate::tree::codec::PathCodec;
use crate::tree::path::NodePath;
use std::collections::BTreeSet;

/// Capability trait for entities stored as materialized-path tree nodes.
///
/// Required methods cover raw state access; the structural predicates are
/// provided and derive everything from the path string. In the wider
/// system's vocabulary the full path *is* the "node id" — the integer id
/// only identifies the row, the path identifies the position.
pub trait TreeNode {
    /// Store-assigned integer identity; `None` until first persist.
    fn node_id(&self) -> Option<u64>;

    /// Weak back-reference to the parent's integer id; `None` for roots.
    fn parent_id(&self) -> Option<u64>;

    /// The materialized path (the unset sentinel before computation).
    fn path(&self) -> &NodePath;

    fn set_path(&mut self, path: NodePath);

    /// In-memory children cache. A view, never authoritative: the store's
    /// parent column is the source of truth.
    fn child_ids(&self) -> &BTreeSet<u64>;

    fn attach_child(&mut self, id: u64);

    fn detach_child(&mut self, id: u64);

    fn clear_children(&mut self);

    /// Replace the children cache wholesale.
    fn set_children(&mut self, ids: impl IntoIterator<Item = u64>)
    where
        Self: Sized,
    {
        self.clear_children();
        for id in ids {
            self.attach_child(id);
        }
    }

    /// True iff the path is exactly one segment long.
    fn is_root_node(&self, codec: &PathCodec) -> bool {
        self.path().is_root(codec)
    }

    /// Depth in the tree; roots are level 1, an unset path reports 0.
    fn node_level(&self, codec: &PathCodec) -> usize {
        self.path().level(codec)
    }

    /// The top ancestor's segment.
    fn root_node_segment(&self, codec: &PathCodec) -> Option<String> {
        self.path().root_segment(codec).map(str::to_string)
    }

    /// The parent's full path (self minus the last segment); `None` for
    /// roots and unset paths.
    fn parent_node_path(&self, codec: &PathCodec) -> Option<NodePath> {
        self.path().parent(codec)
    }

    /// True iff this node lies strictly below `other` on the same branch.
    ///
    /// Deliberately broad: any deeper node in the branch matches, not only
    /// direct children. Callers needing exact adjacency compare levels.
    fn is_descendant_of(&self, other: &Self) -> bool
    where
        Self: Sized,
    {
        self.path().is_descendant_of(other.path())
    }

    /// Reset the path to the unset sentinel, forcing recomputation on the
    /// next write. Resets this node only; use `Forest::reset_subtree` to
    /// cascade over loaded descendants.
    fn reset_path(&mut self) {
        self.set_path(NodePath::unset());
    }

    /// `/id1/id2/...` rendering of the path. Debugging only.
    fn readable_path(&self, codec: &PathCodec) -> Result<String, TreeError> {
        self.path().readable(codec)
    }
}
