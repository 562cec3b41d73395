//! Filesystem adapter for mtrie.
//!
//! Presents a working directory as a tree of [`Noder`](mtrie_noder::Noder)s
//! whose comparison keys agree with those of stored trees: a file's key is
//! its content hashed exactly as the object store would hash it, encoded
//! with the file's mode. Directories carry the all-zero key, so they are
//! always descended.
//!
//! # Key Types
//!
//! - [`FsNode`] -- a file, directory, symlink, or pinned submodule on disk
//! - [`FsOptions`] -- submodule pins, ignored names, vanish tolerance
//!
//! [`write_tree`] imports a directory into an object store using the same
//! listing rules.

pub mod error;
pub mod import;
pub mod mode;
pub mod node;
pub mod options;

pub use error::{FsError, FsResult};
pub use import::write_tree;
pub use node::{new_root_node, FsNode};
pub use options::FsOptions;
