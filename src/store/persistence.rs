//! Sled-backed reference store
//!
//! Rows are bincode-serialized `NodeRecord`s keyed by their path bytes.
//! Sled keeps keys in byte order, so prefix constraints run as ordered
//! prefix scans and results come back already sorted by path.

use crate::error::StoreError;
use crate::store::{NodeRecord, NodeStore};
use crate::tree::node::TreeNode;
use crate::tree::path::NodePath;
use crate::tree::repository::PathFilter;
use std::collections::BTreeMap;
use std::path::Path;

pub struct SledNodeStore {
    db: sled::Db,
}

impl SledNodeStore {
    /// Open (or create) a store at the given filesystem path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        Ok(Self {
            db: sled::open(path)?,
        })
    }

    /// An ephemeral store, dropped with the process. Used in tests.
    pub fn temporary() -> Result<Self, StoreError> {
        Ok(Self {
            db: sled::Config::new().temporary(true).open()?,
        })
    }

    pub fn len(&self) -> usize {
        self.db.len()
    }

    pub fn is_empty(&self) -> bool {
        self.db.is_empty()
    }

    fn decode_row(bytes: &[u8]) -> Result<NodeRecord, StoreError> {
        Ok(bincode::deserialize(bytes)?)
    }
}

impl NodeStore for SledNodeStore {
    type Node = NodeRecord;

    fn put(&self, node: &NodeRecord) -> Result<(), StoreError> {
        let path = node.path();
        if path.is_unset() {
            return Err(StoreError::UnsetPath);
        }
        let bytes = bincode::serialize(node)?;
        self.db.insert(path.as_str().as_bytes(), bytes)?;
        Ok(())
    }

    fn remove(&self, path: &NodePath) -> Result<bool, StoreError> {
        Ok(self.db.remove(path.as_str().as_bytes())?.is_some())
    }

    fn select(&self, filter: &PathFilter) -> Result<Vec<NodeRecord>, StoreError> {
        // BTreeMap keyed by path: path order and deduplication across
        // overlapping prefix constraints in one pass
        let mut rows: BTreeMap<NodePath, NodeRecord> = BTreeMap::new();

        let mut consider = |bytes: &[u8]| -> Result<(), StoreError> {
            let record = Self::decode_row(bytes)?;
            if filter.matches(record.path()) {
                rows.insert(record.path().clone(), record);
            }
            Ok(())
        };

        if let Some(exact) = &filter.exact {
            if let Some(value) = self.db.get(exact.as_str().as_bytes())? {
                consider(&value)?;
            }
        } else if filter.prefixes.is_empty() {
            for item in self.db.iter() {
                let (_, value) = item?;
                consider(&value)?;
            }
        } else {
            for prefix in &filter.prefixes {
                for item in self.db.scan_prefix(prefix.as_str().as_bytes()) {
                    let (_, value) = item?;
                    consider(&value)?;
                }
            }
        }

        let mut out: Vec<NodeRecord> = rows.into_values().collect();
        if let Some(limit) = filter.limit {
            out.truncate(limit);
        }
        Ok(out)
    }
}
