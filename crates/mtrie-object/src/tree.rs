//! Trees resolved from the object store.

use std::fmt;
use std::sync::Arc;

use mtrie_store::{ObjectStore, Tree, TreeEntry};
use mtrie_types::{FileMode, ObjectHash};
use tracing::debug;

use crate::cache::CacheSet;
use crate::error::{ObjectError, ObjectResult};

/// A decoded tree bound to the store it was read from.
///
/// Holds the store handle so sub-trees can be resolved on demand. It never
/// holds a cache handle: caches reference trees, not the other way round.
pub struct ObjectTree {
    id: ObjectHash,
    entries: Vec<TreeEntry>,
    store: Arc<dyn ObjectStore>,
}

impl ObjectTree {
    /// Resolve a tree by hash, consulting and filling the session tree cache.
    pub fn load(
        store: &Arc<dyn ObjectStore>,
        id: ObjectHash,
        caches: Option<&CacheSet>,
    ) -> ObjectResult<Arc<Self>> {
        if let Some(tree) = caches.and_then(|c| c.tree(&id)) {
            return Ok(tree);
        }

        debug!(tree = %id.short_hex(), "resolving tree");
        let decoded = store.read_tree(&id)?;
        let tree = Arc::new(Self::from_decoded(Arc::clone(store), id, decoded));

        if let Some(caches) = caches {
            caches.put_tree(Arc::clone(&tree));
        }
        Ok(tree)
    }

    /// Bind an already decoded tree to its store.
    pub fn from_decoded(store: Arc<dyn ObjectStore>, id: ObjectHash, tree: Tree) -> Self {
        Self {
            id,
            entries: tree.entries,
            store,
        }
    }

    pub fn id(&self) -> ObjectHash {
        self.id
    }

    /// Stored entry records, in encoding order.
    pub fn entries(&self) -> &[TreeEntry] {
        &self.entries
    }

    pub fn store(&self) -> &Arc<dyn ObjectStore> {
        &self.store
    }

    /// Look up a direct entry by name.
    pub fn entry(&self, name: &str) -> Option<&TreeEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Resolve the sub-tree at a slash-separated path below this tree.
    pub fn tree(&self, path: &str, caches: Option<&CacheSet>) -> ObjectResult<Arc<ObjectTree>> {
        let mut current: Option<Arc<ObjectTree>> = None;

        for component in path.split('/').filter(|c| !c.is_empty()) {
            let parent: &ObjectTree = current.as_deref().unwrap_or(self);
            let entry = parent
                .entry(component)
                .ok_or_else(|| ObjectError::EntryNotFound(path.to_string()))?;
            if entry.mode != FileMode::Dir {
                return Err(ObjectError::NotATree(path.to_string()));
            }
            let next = ObjectTree::load(&parent.store, entry.hash, caches)?;
            current = Some(next);
        }

        current.ok_or_else(|| ObjectError::EntryNotFound(path.to_string()))
    }
}

impl fmt::Debug for ObjectTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectTree")
            .field("id", &self.id)
            .field("entries", &self.entries.len())
            .finish()
    }
}
