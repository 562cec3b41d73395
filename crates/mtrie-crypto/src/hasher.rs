use std::io;

use mtrie_types::{ObjectHash, HASH_LEN};

/// Header-prefixed BLAKE3 content hasher.
///
/// Each hasher carries the object kind tag (e.g. `"blob"`, `"tree"`) that is
/// written into the header of every hash computation together with the
/// declared content size. A blob and a tree with identical bytes therefore
/// produce different hashes.
pub struct ContentHasher {
    kind: &'static str,
}

impl ContentHasher {
    /// Hasher for blob objects.
    pub const BLOB: Self = Self { kind: "blob" };
    /// Hasher for tree objects.
    pub const TREE: Self = Self { kind: "tree" };

    /// Start a streaming hash of an object of `size` bytes.
    pub fn begin(&self, size: u64) -> ObjectHasher {
        let mut inner = blake3::Hasher::new();
        inner.update(self.kind.as_bytes());
        inner.update(b" ");
        inner.update(size.to_string().as_bytes());
        inner.update(b"\0");
        ObjectHasher { inner }
    }

    /// Hash a complete object held in memory.
    pub fn hash(&self, data: &[u8]) -> ObjectHash {
        let mut hasher = self.begin(data.len() as u64);
        hasher.update(data);
        hasher.finalize()
    }

}

/// An in-progress object hash, fed incrementally.
///
/// Implements [`io::Write`] so content can be streamed in with `io::copy`.
pub struct ObjectHasher {
    inner: blake3::Hasher,
}

impl ObjectHasher {
    /// Feed more content bytes.
    pub fn update(&mut self, data: &[u8]) -> &mut Self {
        self.inner.update(data);
        self
    }

    /// Finish and return the 20-byte object hash.
    pub fn finalize(&self) -> ObjectHash {
        let mut out = [0u8; HASH_LEN];
        self.inner.finalize_xof().fill(&mut out);
        ObjectHash::from_hash(out)
    }
}

impl io::Write for ObjectHasher {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
