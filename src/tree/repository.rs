//! Read-side tree queries
//!
//! Translates structural questions (roots, children of X, subtree from X)
//! into the flat prefix/length predicates a backing store can execute, and
//! assembles multi-level results into forests.

use crate::error::TreeError;
use crate::store::NodeStore;
use crate::tree::assembler::{build_forest, Forest};
use crate::tree::codec::PathCodec;
use crate::tree::node::TreeNode;
use crate::tree::path::NodePath;
use tracing::debug;

/// Abstract predicate over materialized paths.
///
/// The engine only ever asks a store for rows matching a combination of
/// these constraints; how they execute (LIKE scans, ordered key ranges,
/// full iteration) is the store's concern.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathFilter {
    /// OR-combined prefix constraints; empty means unrestricted.
    pub prefixes: Vec<NodePath>,
    /// Exact-path match; expect at most one row.
    pub exact: Option<NodePath>,
    /// Inclusive lower bound on path length.
    pub min_len: Option<usize>,
    /// Inclusive upper bound on path length.
    pub max_len: Option<usize>,
    /// Exact path length.
    pub exact_len: Option<usize>,
    /// Cap on the number of rows returned (applied after filtering, in
    /// path order).
    pub limit: Option<usize>,
}

impl PathFilter {
    pub fn with_prefix(mut self, prefix: NodePath) -> Self {
        self.prefixes.push(prefix);
        self
    }

    pub fn with_exact(mut self, path: NodePath) -> Self {
        self.exact = Some(path);
        self
    }

    pub fn with_min_len(mut self, len: usize) -> Self {
        self.min_len = Some(len);
        self
    }

    pub fn with_max_len(mut self, len: usize) -> Self {
        self.max_len = Some(len);
        self
    }

    pub fn with_exact_len(mut self, len: usize) -> Self {
        self.exact_len = Some(len);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Evaluate the predicate against one path. Store implementations use
    /// this so filtering semantics stay identical across backends; the
    /// `limit` field is not part of the per-row predicate.
    pub fn matches(&self, path: &NodePath) -> bool {
        if let Some(exact) = &self.exact {
            if path != exact {
                return false;
            }
        }
        if !self.prefixes.is_empty()
            && !self
                .prefixes
                .iter()
                .any(|prefix| path.as_str().starts_with(prefix.as_str()))
        {
            return false;
        }
        if let Some(min) = self.min_len {
            if path.len() < min {
                return false;
            }
        }
        if let Some(max) = self.max_len {
            if path.len() > max {
                return false;
            }
        }
        if let Some(exact_len) = self.exact_len {
            if path.len() != exact_len {
                return false;
            }
        }
        true
    }
}

/// Result of a children query.
///
/// Depth-1 results stay flat: no grandchild rows can be present, so there
/// is nothing to assemble. Deeper results come back as a forest.
#[derive(Debug)]
pub enum NodeChildren<N> {
    Flat(Vec<N>),
    Assembled(Forest<N>),
}

impl<N: TreeNode> NodeChildren<N> {
    pub fn len(&self) -> usize {
        match self {
            NodeChildren::Flat(nodes) => nodes.len(),
            NodeChildren::Assembled(forest) => forest.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Structural queries against a backing node store.
pub struct TreeRepository<S> {
    store: S,
    codec: PathCodec,
}

impl<S: NodeStore> TreeRepository<S> {
    pub fn new(store: S, codec: PathCodec) -> Self {
        Self { store, codec }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn codec(&self) -> &PathCodec {
        &self.codec
    }

    /// All root nodes: rows whose path is exactly one segment long.
    pub fn find_root_nodes(&self) -> Result<Vec<S::Node>, TreeError> {
        let filter = PathFilter::default().with_exact_len(self.codec.width());
        Ok(self.store.select(&filter)?)
    }

    /// The single node with the given full path, if present.
    pub fn find_node_by_path(&self, path: &NodePath) -> Result<Option<S::Node>, TreeError> {
        let filter = PathFilter::default().with_exact(path.clone()).with_limit(1);
        Ok(self.store.select(&filter)?.into_iter().next())
    }

    /// Flat list of descendants of `path`, strictly below it, optionally
    /// bounded to `depth` levels.
    pub fn find_descendants(
        &self,
        path: &NodePath,
        depth: Option<usize>,
    ) -> Result<Vec<S::Node>, TreeError> {
        let mut filter = PathFilter::default()
            .with_prefix(path.clone())
            .with_min_len(path.len() + 1);
        if let Some(depth) = depth {
            filter = filter.with_max_len(path.len() + depth * self.codec.width());
        }
        Ok(self.store.select(&filter)?)
    }

    /// Children query with the documented dispatch: `depth == Some(1)`
    /// returns the flat row list, `depth > 1` assembles the rows into a
    /// forest, `depth == None` returns all descendants flat.
    pub fn find_node_children(
        &self,
        path: &NodePath,
        depth: Option<usize>,
    ) -> Result<NodeChildren<S::Node>, TreeError> {
        let rows = self.find_descendants(path, depth)?;
        debug!(path = %path, ?depth, row_count = rows.len(), "children query");
        match depth {
            Some(depth) if depth > 1 => {
                Ok(NodeChildren::Assembled(build_forest(rows, self.codec)))
            }
            _ => Ok(NodeChildren::Flat(rows)),
        }
    }

    /// Assembled forest covering the subtrees rooted at each given path,
    /// the subtree roots themselves included. With no paths given, loads
    /// the entire tree.
    pub fn find_tree_from(&self, paths: &[NodePath]) -> Result<Forest<S::Node>, TreeError> {
        let mut filter = PathFilter::default();
        for path in paths {
            filter = filter.with_prefix(path.clone());
        }
        let rows = self.store.select(&filter)?;
        Ok(build_forest(rows, self.codec))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(raw: &str) -> NodePath {
        NodePath::from(raw.to_string())
    }

    #[test]
    fn test_filter_exact() {
        let filter = PathFilter::default().with_exact(path("000001"));
        assert!(filter.matches(&path("000001")));
        assert!(!filter.matches(&path("000002")));
    }

    #[test]
    fn test_filter_prefixes_or_combined() {
        let filter = PathFilter::default()
            .with_prefix(path("000001"))
            .with_prefix(path("000005"));
        assert!(filter.matches(&path("000001000002")));
        assert!(filter.matches(&path("000005")));
        assert!(!filter.matches(&path("000002")));
    }

    #[test]
    fn test_filter_length_bounds() {
        let filter = PathFilter::default().with_min_len(7).with_max_len(12);
        assert!(!filter.matches(&path("000001")));
        assert!(filter.matches(&path("000001000002")));
        assert!(!filter.matches(&path("000001000002000003")));
    }

    #[test]
    fn test_filter_exact_len() {
        let filter = PathFilter::default().with_exact_len(6);
        assert!(filter.matches(&path("000001")));
        assert!(!filter.matches(&path("000001000002")));
    }

    #[test]
    fn test_children_predicate_shape() {
        // children of "000001" down to depth 2
        let parent = path("000001");
        let filter = PathFilter::default()
            .with_prefix(parent.clone())
            .with_min_len(parent.len() + 1)
            .with_max_len(parent.len() + 2 * 6);

        assert!(!filter.matches(&parent)); // self excluded
        assert!(filter.matches(&path("000001000002")));
        assert!(filter.matches(&path("000001000002000003")));
        assert!(!filter.matches(&path("000001000002000003000004")));
        assert!(!filter.matches(&path("000002000001")));
    }
}
