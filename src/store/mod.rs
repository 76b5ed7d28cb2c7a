//! Node store
//!
//! The engine's only view of persistence: rows carrying an id, a parent
//! reference, and a materialized path, selectable by the abstract
//! prefix/length predicates in `tree::repository::PathFilter`. Everything
//! else about the backing store (dialect, transactions, cascade policy) is
//! the host system's concern.

pub mod persistence;

pub use persistence::SledNodeStore;

use crate::error::StoreError;
use crate::tree::node::TreeNode;
use crate::tree::path::NodePath;
use crate::tree::repository::PathFilter;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Minimal persistence contract the engine consumes.
///
/// `put` writes a row under its current path, `remove` deletes by path
/// (paths are the row keys — rewriting a path means re-keying), `select`
/// executes a `PathFilter` and returns matching rows in path order.
pub trait NodeStore {
    type Node: TreeNode;

    fn put(&self, node: &Self::Node) -> Result<(), StoreError>;

    fn remove(&self, path: &NodePath) -> Result<bool, StoreError>;

    fn select(&self, filter: &PathFilter) -> Result<Vec<Self::Node>, StoreError>;
}

impl<S: NodeStore> NodeStore for &S {
    type Node = S::Node;

    fn put(&self, node: &Self::Node) -> Result<(), StoreError> {
        (**self).put(node)
    }

    fn remove(&self, path: &NodePath) -> Result<bool, StoreError> {
        (**self).remove(path)
    }

    fn select(&self, filter: &PathFilter) -> Result<Vec<Self::Node>, StoreError> {
        (**self).select(filter)
    }
}

/// Reference tree entity: the row shape the bundled store persists.
///
/// The children cache is in-memory only; the `parent` column is the
/// authoritative relationship in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    /// Store-assigned identity; `None` for a node that was never persisted.
    pub id: Option<u64>,
    /// Weak back-reference to the parent row's id.
    pub parent: Option<u64>,
    /// Materialized path; the unset sentinel until first persist.
    pub path: NodePath,
    /// Free-form row payload.
    #[serde(default)]
    pub metadata: HashMap<String, String>,
    #[serde(skip)]
    children: BTreeSet<u64>,
}

impl NodeRecord {
    /// A root-candidate record with a store-assigned id and no path yet.
    pub fn new(id: u64) -> Self {
        Self {
            id: Some(id),
            parent: None,
            path: NodePath::unset(),
            metadata: HashMap::new(),
            children: BTreeSet::new(),
        }
    }

    /// A record referencing a parent row.
    pub fn with_parent(id: u64, parent: u64) -> Self {
        Self {
            parent: Some(parent),
            ..Self::new(id)
        }
    }

    /// A freshly constructed, unsaved record: no id, no path.
    pub fn detached() -> Self {
        Self {
            id: None,
            parent: None,
            path: NodePath::unset(),
            metadata: HashMap::new(),
            children: BTreeSet::new(),
        }
    }
}

impl TreeNode for NodeRecord {
    fn node_id(&self) -> Option<u64> {
        self.id
    }

    fn parent_id(&self) -> Option<u64> {
        self.parent
    }

    fn path(&self) -> &NodePath {
        &self.path
    }

    fn set_path(&mut self, path: NodePath) {
        self.path = path;
    }

    fn child_ids(&self) -> &BTreeSet<u64> {
        &self.children
    }

    fn attach_child(&mut self, id: u64) {
        self.children.insert(id);
    }

    fn detach_child(&mut self, id: u64) {
        self.children.remove(&id);
    }

    fn clear_children(&mut self) {
        self.children.clear();
    }
}
