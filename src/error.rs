//! Error types for the materialized-path tree engine.

use thiserror::Error;

/// Engine-level errors.
///
/// Every variant signals a programmer-ordering or capacity error that is
/// surfaced immediately; none of them are transient conditions to retry.
#[derive(Debug, Error)]
pub enum TreeError {
    #[error("id {id} does not fit in a {width}-character segment")]
    EncodingOverflow { id: u64, width: usize },

    #[error("invalid path segment: {0:?}")]
    InvalidSegment(String),

    #[error("segment width {0} is out of range (1..=10)")]
    InvalidSegmentWidth(usize),

    #[error("invalid materialized path: {0}")]
    InvalidPath(String),

    #[error("node has no assigned id; a path cannot be computed before first persist")]
    MissingNodeId,

    #[error("parent of node {child} has an unset path; persist parents before children")]
    MissingParentPath { child: u64 },

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised by a backing node store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cannot persist a node with an unset path")]
    UnsetPath,

    #[error("storage backend error: {0}")]
    Backend(#[from] sled::Error),

    #[error("record codec error: {0}")]
    Codec(#[from] bincode::Error),

    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for TreeError {
    fn from(err: config::ConfigError) -> Self {
        TreeError::Config(err.to_string())
    }
}
