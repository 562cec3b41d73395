//! Content hashing for mtrie.
//!
//! Object ids are BLAKE3 hashes over a `"<kind> <size>\0"` header followed by
//! the object bytes, truncated to 20 bytes. The object store and the
//! filesystem adapter share this hasher, so a file on disk and the blob it
//! was stored as always carry the same id.
//!
//! All crypto operations wrap established libraries; no custom cryptography.

pub mod hasher;

pub use hasher::{ContentHasher, ObjectHasher};
