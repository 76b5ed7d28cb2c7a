//! Forest assembly
//!
//! Reassembles a flat, path-bearing row set into a navigable in-memory
//! forest. Nodes live in an arena keyed by their stable integer id; parent
//! and child linkage is resolved through the path index, so iteration order
//! of the input never affects the resulting structure.

use crate::tree::codec::PathCodec;
use crate::tree::node::TreeNode;
use crate::tree::path::NodePath;
use std::collections::HashMap;
use tracing::{debug, instrument, warn};

/// An assembled forest of tree nodes.
///
/// "Forest" rather than "tree": when the flat input came from a
/// bounded-depth query, nodes whose parent row was not part of the result
/// stay unattached and act as roots of their own fragment. That is expected,
/// not an error.
#[derive(Debug)]
pub struct Forest<N> {
    codec: PathCodec,
    nodes: HashMap<u64, N>,
    by_path: HashMap<NodePath, u64>,
    roots: Vec<u64>,
}

impl<N: TreeNode> Forest<N> {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: u64) -> Option<&N> {
        self.nodes.get(&id)
    }

    pub fn get_by_path(&self, path: &NodePath) -> Option<&N> {
        self.by_path.get(path).and_then(|id| self.nodes.get(id))
    }

    /// Roots of the assembled forest, in path order.
    pub fn roots(&self) -> impl Iterator<Item = &N> {
        self.roots.iter().filter_map(|id| self.nodes.get(id))
    }

    /// Children of a node, in ascending id order.
    pub fn children_of(&self, id: u64) -> Vec<&N> {
        match self.nodes.get(&id) {
            Some(node) => node
                .child_ids()
                .iter()
                .filter_map(|child| self.nodes.get(child))
                .collect(),
            None => Vec::new(),
        }
    }

    /// The parent of a node, when its row is part of this forest.
    pub fn parent_of(&self, id: u64) -> Option<&N> {
        let path = self.nodes.get(&id)?.path().parent(&self.codec)?;
        self.get_by_path(&path)
    }

    /// Ordered ancestor chain, root first. Walks parent references
    /// iteratively and stops at the first node missing from the arena, so
    /// it is bounded by the loaded depth. Empty for roots.
    pub fn ancestors(&self, id: u64) -> Vec<&N> {
        let mut chain = Vec::new();
        let mut current = self.nodes.get(&id).and_then(|n| n.parent_id());
        while let Some(parent_id) = current {
            match self.nodes.get(&parent_id) {
                Some(parent) => {
                    chain.push(parent);
                    current = parent.parent_id();
                }
                None => break,
            }
        }
        chain.reverse();
        chain
    }

    /// Reset the paths of a node and every loaded descendant to the unset
    /// sentinel, forcing full regeneration on the next write pass. Returns
    /// the number of nodes reset. The path index refers to the pre-reset
    /// paths afterwards; rebuild the forest once paths are recomputed.
    pub fn reset_subtree(&mut self, id: u64) -> usize {
        let mut stack = vec![id];
        let mut reset = 0;
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.get_mut(&current) {
                stack.extend(node.child_ids().iter().copied());
                node.reset_path();
                reset += 1;
            }
        }
        reset
    }

    pub fn iter(&self) -> impl Iterator<Item = &N> {
        self.nodes.values()
    }

    /// Consume the forest, returning the nodes in path order. Feeding the
    /// result back through `build_forest` reproduces the same structure.
    pub fn into_nodes(self) -> Vec<N> {
        let mut nodes: Vec<N> = self.nodes.into_values().collect();
        nodes.sort_by(|a, b| a.path().cmp(b.path()));
        nodes
    }
}

/// Assemble a flat node list into a forest.
///
/// Every node's children cache is cleared first so stale linkage from a
/// prior load cannot leak through. Each node is then attached to the entry
/// whose path equals its own path minus the last segment, when that entry
/// is present in the input. O(n) over a hash index; idempotent.
///
/// Rows without an id or with an unset path cannot be placed and are
/// dropped with a warning.
#[instrument(skip(nodes, codec), fields(node_count = nodes.len()))]
pub fn build_forest<N: TreeNode>(nodes: Vec<N>, codec: PathCodec) -> Forest<N> {
    let mut arena: HashMap<u64, N> = HashMap::with_capacity(nodes.len());
    let mut by_path: HashMap<NodePath, u64> = HashMap::with_capacity(nodes.len());

    for mut node in nodes {
        node.clear_children();
        let Some(id) = node.node_id() else {
            warn!("dropping node without an assigned id");
            continue;
        };
        if node.path().is_unset() {
            warn!(id, "dropping node with an unset path");
            continue;
        }
        by_path.insert(node.path().clone(), id);
        arena.insert(id, node);
    }

    let ids: Vec<u64> = arena.keys().copied().collect();
    let mut roots: Vec<(NodePath, u64)> = Vec::new();

    for id in ids {
        let (path, parent_path) = match arena.get(&id) {
            Some(node) => (node.path().clone(), node.path().parent(&codec)),
            None => continue,
        };
        let attached = parent_path
            .and_then(|p| by_path.get(&p).copied())
            .filter(|parent_id| *parent_id != id);
        match attached {
            Some(parent_id) => {
                if let Some(parent) = arena.get_mut(&parent_id) {
                    parent.attach_child(id);
                }
            }
            None => roots.push((path, id)),
        }
    }

    roots.sort();
    let roots: Vec<u64> = roots.into_iter().map(|(_, id)| id).collect();

    debug!(
        node_count = arena.len(),
        root_count = roots.len(),
        "assembled forest"
    );

    Forest {
        codec,
        nodes: arena,
        by_path,
        roots,
    }
}
