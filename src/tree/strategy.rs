//! Tree maintenance strategy
//!
//! The write-path state machine: decides when a node's path must be
//! (re)computed and derives the new path from the parent's prefix plus the
//! node's own encoded segment. Driven by the enclosing persistence
//! transaction through `WriteContext`.
//!
//! Reparenting recomputes only the reparented node's own path. Descendants
//! keep their old prefixes until the explicit bulk repair in
//! `tree::writer` runs; that separation is deliberate and load-bearing for
//! callers that batch their own repairs.

use crate::error::TreeError;
use crate::tree::codec::PathCodec;
use crate::tree::node::TreeNode;
use crate::tree::path::NodePath;
use tracing::{debug, trace};

/// What the enclosing persistence event knows about the node.
#[derive(Debug, Clone, Copy, Default)]
pub struct WriteContext {
    /// The node is being persisted for the first time.
    pub is_insert: bool,
    /// The parent reference changed since the last persisted state.
    pub parent_changed: bool,
}

impl WriteContext {
    pub fn insert() -> Self {
        Self {
            is_insert: true,
            parent_changed: false,
        }
    }

    pub fn update(parent_changed: bool) -> Self {
        Self {
            is_insert: false,
            parent_changed,
        }
    }
}

/// Path computation strategy for one deployment codec.
#[derive(Debug, Clone, Copy)]
pub struct MaterializedPathStrategy {
    codec: PathCodec,
}

impl MaterializedPathStrategy {
    pub fn new(codec: PathCodec) -> Self {
        Self { codec }
    }

    pub fn codec(&self) -> &PathCodec {
        &self.codec
    }

    /// The Computed -> Computed short-circuit: a plain update with an
    /// unchanged parent and a valid path needs no recomputation. This is
    /// the common case on every save.
    pub fn needs_recompute<N: TreeNode>(&self, node: &N, ctx: &WriteContext) -> bool {
        ctx.is_insert || ctx.parent_changed || node.path().is_unset()
    }

    /// Derive the node's path: the parent's current path concatenated with
    /// this node's encoded segment, or just the segment for roots.
    ///
    /// Fails with `MissingNodeId` before the store has assigned an id, with
    /// `MissingParentPath` when the parent has not been computed yet (a
    /// top-down ordering violation), and propagates `EncodingOverflow` from
    /// the codec. Idempotent: same parent and id always yield the same
    /// string. Cycles are not detected here; tree-construction discipline
    /// is the caller's guard.
    pub fn compute_path<N: TreeNode>(
        &self,
        node: &N,
        parent: Option<&N>,
    ) -> Result<NodePath, TreeError> {
        let id = node.node_id().ok_or(TreeError::MissingNodeId)?;
        let segment = self.codec.encode(id)?;

        match parent {
            None => Ok(NodePath::root(segment)),
            Some(parent) if parent.path().is_unset() => {
                Err(TreeError::MissingParentPath { child: id })
            }
            Some(parent) => Ok(parent.path().join(&segment)),
        }
    }

    /// Run the state machine for one persistence event. Returns whether the
    /// node's path was rewritten.
    pub fn apply<N: TreeNode>(
        &self,
        node: &mut N,
        parent: Option<&N>,
        ctx: &WriteContext,
    ) -> Result<bool, TreeError> {
        if !self.needs_recompute(node, ctx) {
            trace!(path = %node.path(), "path unchanged, skipping recompute");
            return Ok(false);
        }

        let old = node.path().clone();
        let new = self.compute_path(node, parent)?;
        debug!(old = %old, new = %new, "recomputed node path");
        node.set_path(new);
        Ok(true)
    }
}
