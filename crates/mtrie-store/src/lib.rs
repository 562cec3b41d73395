//! Content-addressed object storage for mtrie.
//!
//! This crate is the object resolution boundary of the comparison core:
//! given a content hash, it hands back either the entries of a tree or the
//! bytes of a blob. Every object is immutable and identified by the
//! header-prefixed hash of its kind and bytes.
//!
//! # Object Types
//!
//! - [`Blob`] -- raw content (file contents, symlink targets)
//! - [`Tree`] -- directory listing mapping names to modes and object hashes
//!
//! # Storage Backends
//!
//! All backends implement the [`ObjectStore`] trait:
//!
//! - [`InMemoryObjectStore`] -- `HashMap`-based store for tests and embedding
//!
//! # Design Rules
//!
//! 1. Objects are immutable once written (content-addressing guarantees this).
//! 2. Concurrent reads are always safe (objects are immutable).
//! 3. The store never interprets object contents on write.
//! 4. All I/O errors are propagated, never silently ignored.
//! 5. No retries: a failed read is reported to the caller as-is.

pub mod error;
pub mod memory;
pub mod object;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use error::{StoreError, StoreResult};
pub use memory::InMemoryObjectStore;
pub use object::{Blob, ObjectKind, StoredObject, Tree, TreeEntry};
pub use traits::ObjectStore;
