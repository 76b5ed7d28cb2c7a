//! Materialized path value type
//!
//! A `NodePath` is the flat, sortable encoding of a node's position: one
//! fixed-width segment per ancestor level, self included. Ancestor and
//! descendant relationships reduce to string-prefix checks, which is what
//! makes subtree queries cheap on the store side.

use crate::error::TreeError;
use crate::tree::codec::PathCodec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A materialized path string.
///
/// The empty string is the "unset" sentinel: the node has been constructed
/// but its path has not been computed yet (no id assigned, or a pending
/// regeneration). Every valid path is at least one segment wide, so the
/// sentinel can never collide with real data.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct NodePath(String);

impl NodePath {
    /// The unset sentinel, meaning "needs (re)computation".
    pub fn unset() -> Self {
        NodePath(String::new())
    }

    /// Build a path from a single root segment.
    pub fn root(segment: String) -> Self {
        NodePath(segment)
    }

    /// Parse an externally supplied path string, validating length and
    /// alphabet against the deployment codec.
    pub fn parse(raw: &str, codec: &PathCodec) -> Result<Self, TreeError> {
        if raw.is_empty() {
            return Ok(Self::unset());
        }
        if raw.len() % codec.width() != 0 {
            return Err(TreeError::InvalidPath(format!(
                "length {} is not a multiple of the segment width {}",
                raw.len(),
                codec.width()
            )));
        }
        let path = NodePath(raw.to_string());
        for segment in path.segments(codec) {
            codec.decode(segment)?;
        }
        Ok(path)
    }

    pub fn is_unset(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Append a suffix (one segment, or a whole relative subpath).
    pub fn join(&self, suffix: &str) -> NodePath {
        let mut joined = String::with_capacity(self.0.len() + suffix.len());
        joined.push_str(&self.0);
        joined.push_str(suffix);
        NodePath(joined)
    }

    /// Depth of the node this path belongs to; roots are level 1.
    /// An unset path reports level 0.
    pub fn level(&self, codec: &PathCodec) -> usize {
        self.0.len() / codec.width()
    }

    /// A path one segment long belongs to a root.
    pub fn is_root(&self, codec: &PathCodec) -> bool {
        self.0.len() == codec.width()
    }

    /// The path of the parent: self minus the last segment.
    /// None for roots and for the unset sentinel.
    pub fn parent(&self, codec: &PathCodec) -> Option<NodePath> {
        if self.level(codec) < 2 {
            return None;
        }
        Some(NodePath(self.0[..self.0.len() - codec.width()].to_string()))
    }

    /// The top ancestor's segment: the first `width` characters.
    pub fn root_segment(&self, codec: &PathCodec) -> Option<&str> {
        if self.0.len() < codec.width() {
            return None;
        }
        Some(&self.0[..codec.width()])
    }

    /// Split into per-level segments, root first.
    pub fn segments(&self, codec: &PathCodec) -> Vec<&str> {
        let width = codec.width();
        (0..self.0.len() / width)
            .map(|i| &self.0[i * width..(i + 1) * width])
            .collect()
    }

    /// True iff this path lies strictly below `other` in the same branch.
    ///
    /// Equal paths are excluded; the unset sentinel never matches either
    /// way. Any node deeper in the branch satisfies this, not only direct
    /// children.
    pub fn is_descendant_of(&self, other: &NodePath) -> bool {
        !self.is_unset()
            && !other.is_unset()
            && self.0.len() > other.0.len()
            && self.0.starts_with(&other.0)
    }

    /// Render as `/id1/id2/.../idN` with each segment decoded back to its
    /// base-10 id. Debugging aid, never used for querying.
    pub fn readable(&self, codec: &PathCodec) -> Result<String, TreeError> {
        let mut out = String::new();
        for segment in self.segments(codec) {
            out.push('/');
            out.push_str(&codec.decode(segment)?.to_string());
        }
        if out.is_empty() {
            out.push('/');
        }
        Ok(out)
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for NodePath {
    fn from(raw: String) -> Self {
        NodePath(raw)
    }
}
