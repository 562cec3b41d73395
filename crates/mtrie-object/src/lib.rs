//! Versioned-tree adapter for mtrie.
//!
//! Wraps trees resolved from an [`ObjectStore`](mtrie_store::ObjectStore)
//! into [`Noder`](mtrie_noder::Noder)s, materializing children lazily with a
//! one-level [`TreeWalker`] pass and memoizing everything it builds in a
//! session-scoped [`CacheSet`].
//!
//! # Key Types
//!
//! - [`ObjectTree`] -- a decoded tree bound to the store it came from
//! - [`TreeWalker`] -- resettable depth-first iterator over tree entries
//! - [`WalkerPool`] / [`PooledWalker`] -- reuse pool with scoped release
//! - [`CacheSet`] -- trees, nodes, comparison results, and interned names
//! - [`TreeNoder`] -- the node adapter itself
//! - [`TreeOptions`] -- cache injection and walk configuration
//!
//! # Cache ownership
//!
//! There is no process-wide cache. A comparison session creates its own
//! [`CacheSet`], or receives one through [`TreeOptions`] when several
//! related comparisons should share work. Nodes hold only a weak reference
//! to the set, so dropping the session frees everything it memoized.

pub mod cache;
pub mod error;
pub mod options;
pub mod pool;
pub mod tree;
pub mod treenoder;
pub mod walker;

pub use cache::{CacheSet, CacheStats};
pub use error::{ObjectError, ObjectResult};
pub use options::TreeOptions;
pub use pool::{PooledWalker, WalkerPool};
pub use tree::ObjectTree;
pub use treenoder::{new_tree_root_node, TreeNoder};
pub use walker::{TreeWalker, MAX_TREE_DEPTH};
