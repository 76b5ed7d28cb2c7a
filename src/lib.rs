//! Matpath: materialized-path tree engine
//!
//! Encodes unbounded-depth trees into fixed-width path segments stored on
//! each row, keeps those paths consistent under insert and reparent, and
//! reassembles flat row sets back into navigable in-memory trees. The
//! persistence layer stays behind a small store trait; a sled-backed
//! reference store is bundled.

pub mod config;
pub mod error;
pub mod logging;
pub mod store;
pub mod tree;
