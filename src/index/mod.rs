// =====================================================================
// File: index/mod.rs
//
//! The `index` module holds the B-tree that orders a record's fields.
//!
//! Structure:
//! - `node.rs`  : [`BTreeNode`] layout and in-order traversal helpers.
//! - `tree.rs`  : [`BTreeIndex`] insert, search, remove, ordered scans.
//! - `tests.rs` : Unit tests (compiled only in test mode).
// =====================================================================

pub mod node;
pub mod tree;

pub use self::node::BTreeNode;
pub use self::tree::{BTreeIndex, DEFAULT_DEGREE};

#[cfg(test)]
pub mod tests;
