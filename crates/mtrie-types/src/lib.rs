//! Foundation types for mtrie.
//!
//! Every other mtrie crate depends on `mtrie-types`. The types here are the
//! vocabulary of structural comparison: what an object is called, what kind
//! of entry references it, and the fixed-size key two nodes are compared by.
//!
//! # Key Types
//!
//! - [`ObjectHash`]: 20-byte content-addressed object identifier
//! - [`FileMode`]: Kind/mode of a tree entry with its canonical 4-byte encoding
//! - [`NodeHash`]: 24-byte comparison key (content hash + encoded mode)

pub mod error;
pub mod hash;
pub mod key;
pub mod mode;

pub use error::TypeError;
pub use hash::{ObjectHash, HASH_LEN};
pub use key::{pair_key, NodeHash, NODE_HASH_LEN, PAIR_KEY_LEN};
pub use mode::FileMode;
