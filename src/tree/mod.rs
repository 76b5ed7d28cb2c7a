//! Materialized-path tree
//!
//! Represents hierarchical data as flat, sortable path strings: one
//! fixed-width base-62 segment per ancestor level, self included. Subtree
//! and ancestry queries reduce to string prefix and length predicates.

pub mod assembler;
pub mod codec;
pub mod node;
pub mod path;
pub mod repository;
pub mod strategy;
pub mod writer;
