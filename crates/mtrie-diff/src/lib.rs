//! Structural comparison for mtrie.
//!
//! Compares two node trees and reports leaf-level insertions, deletions,
//! and modifications. Works over any [`Noder`](mtrie_noder::Noder)
//! implementation, so stored trees, working directories, and test doubles
//! can be compared with one another.
//!
//! # Key Types
//!
//! - [`diff_tree`] -- compare two root nodes
//! - [`diff_object_trees`] -- compare two stored trees
//! - [`diff_worktree`] -- compare a stored tree against a directory on disk
//! - [`DiffTreeOptions`] -- cache set injection

pub mod error;
pub mod tree_diff;

pub use error::{DiffError, DiffResult};
pub use tree_diff::{diff_object_trees, diff_tree, diff_worktree, DiffTreeOptions};
