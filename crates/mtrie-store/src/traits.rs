use mtrie_types::ObjectHash;

use crate::error::{StoreError, StoreResult};
use crate::object::{Blob, StoredObject, Tree};

/// Content-addressed object store.
///
/// All implementations must satisfy these invariants:
/// - Objects are immutable once written. Content-addressing guarantees this:
///   the same data always produces the same hash.
/// - Concurrent reads are always safe (objects are immutable).
/// - All I/O errors are propagated, never silently ignored.
pub trait ObjectStore: Send + Sync {
    /// Read an object by its content-addressed hash.
    ///
    /// Returns `Ok(None)` if the object does not exist.
    /// Returns `Err` on I/O failure or data corruption.
    fn read(&self, id: &ObjectHash) -> StoreResult<Option<StoredObject>>;

    /// Write an object and return its content-addressed hash.
    ///
    /// If the object already exists, this is a no-op (idempotent).
    fn write(&self, object: &StoredObject) -> StoreResult<ObjectHash>;

    /// Check whether an object exists in the store.
    fn exists(&self, id: &ObjectHash) -> StoreResult<bool>;

    /// Resolve the entries of a tree.
    ///
    /// Fails with [`StoreError::NotFound`] if the hash is absent and with
    /// [`StoreError::CorruptObject`] if the object is not a decodable tree.
    fn read_tree(&self, id: &ObjectHash) -> StoreResult<Tree> {
        let stored = self.read(id)?.ok_or(StoreError::NotFound(*id))?;
        Tree::from_stored_object(&stored)
    }

    /// Resolve the bytes of a blob.
    fn read_blob(&self, id: &ObjectHash) -> StoreResult<Blob> {
        let stored = self.read(id)?.ok_or(StoreError::NotFound(*id))?;
        Blob::from_stored_object(&stored)
    }

    /// Encode and write a tree, returning its hash.
    fn write_tree(&self, tree: &Tree) -> StoreResult<ObjectHash> {
        self.write(&tree.to_stored_object()?)
    }

    /// Write raw bytes as a blob, returning its hash.
    fn write_blob(&self, data: &[u8]) -> StoreResult<ObjectHash> {
        self.write(&Blob::new(data.to_vec()).to_stored_object())
    }
}
