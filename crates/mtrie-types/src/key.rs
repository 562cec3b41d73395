//! Comparison keys.
//!
//! A [`NodeHash`] is the unit of structural identity: 20 bytes of content
//! hash followed by the 4-byte mode encoding. Two nodes with equal keys are
//! treated as identical and never recursed into.

use std::fmt;

use crate::hash::{ObjectHash, HASH_LEN};
use crate::mode::FileMode;

/// Length in bytes of a [`NodeHash`].
pub const NODE_HASH_LEN: usize = HASH_LEN + 4;

/// Length in bytes of a pairwise comparison cache key.
pub const PAIR_KEY_LEN: usize = 2 * NODE_HASH_LEN;

/// 24-byte comparison key of a node.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct NodeHash([u8; NODE_HASH_LEN]);

impl NodeHash {
    /// The all-zero key carried by filesystem directories.
    pub const ZERO: Self = Self([0u8; NODE_HASH_LEN]);

    /// Build a key from a content hash and an entry mode.
    ///
    /// [`FileMode::Deprecated`] is encoded as [`FileMode::Regular`] so that
    /// historical mode drift does not show up as a modification.
    pub fn encode(hash: &ObjectHash, mode: FileMode) -> Self {
        let mode = match mode {
            FileMode::Deprecated => FileMode::Regular,
            other => other,
        };

        let mut key = [0u8; NODE_HASH_LEN];
        key[..HASH_LEN].copy_from_slice(hash.as_bytes());
        key[HASH_LEN..].copy_from_slice(&mode.to_bytes());
        Self(key)
    }

    /// Wrap raw key bytes. Used by nodes whose keys are not content hashes.
    pub const fn from_raw(bytes: [u8; NODE_HASH_LEN]) -> Self {
        Self(bytes)
    }

    /// The content hash part of the key.
    pub fn content_hash(&self) -> ObjectHash {
        let mut hash = [0u8; HASH_LEN];
        hash.copy_from_slice(&self.0[..HASH_LEN]);
        ObjectHash::from_hash(hash)
    }

    /// The encoded mode part of the key.
    pub fn mode_bytes(&self) -> [u8; 4] {
        let mut mode = [0u8; 4];
        mode.copy_from_slice(&self.0[HASH_LEN..]);
        mode
    }

    /// Returns `true` for the all-zero placeholder key.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; NODE_HASH_LEN]
    }

    /// The raw 24-byte key.
    pub fn as_bytes(&self) -> &[u8; NODE_HASH_LEN] {
        &self.0
    }
}

impl fmt::Debug for NodeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeHash({})", hex::encode(self.0))
    }
}

/// Concatenate two keys into an ordered `(from, to)` cache key.
///
/// The result is not symmetric: `pair_key(a, b) != pair_key(b, a)` unless
/// `a == b`.
pub fn pair_key(from: &NodeHash, to: &NodeHash) -> [u8; PAIR_KEY_LEN] {
    let mut key = [0u8; PAIR_KEY_LEN];
    key[..NODE_HASH_LEN].copy_from_slice(from.as_bytes());
    key[NODE_HASH_LEN..].copy_from_slice(to.as_bytes());
    key
}
