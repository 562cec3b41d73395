//! [`Noder`] implementation over object-store trees.

use std::fmt;
use std::sync::{Arc, OnceLock, Weak};

use mtrie_noder::{Noder, NoderRef, NoderResult, NO_CHILDREN};
use mtrie_store::TreeEntry;
use mtrie_types::{FileMode, NodeHash, ObjectHash};

use crate::cache::CacheSet;
use crate::error::{ObjectError, ObjectResult};
use crate::tree::ObjectTree;
use crate::walker::TreeWalker;

/// A node of a tree stored in an object store.
///
/// The comparison key is the entry hash encoded with the entry mode.
/// Children are produced on the first [`Noder::children`] call by a
/// one-level walk of the resolved sub-tree, then memoized. A failed
/// materialization memoizes nothing, so a later call retries.
///
/// Nodes are deduplicated per session by `(hash, mode)`. When a cached node
/// is found under a different entry name, a renamed alias is returned that
/// shares the cached node's children.
pub struct TreeNoder {
    parent: Arc<ObjectTree>,
    name: Arc<str>,
    mode: FileMode,
    nhash: ObjectHash,
    hash: NodeHash,
    children: Arc<OnceLock<Vec<NoderRef>>>,
    caches: Weak<CacheSet>,
}

/// Create the root node of `tree`.
///
/// With a cache set, asking twice for the root of the same tree yields the
/// same node. Without one, nothing the node builds is memoized beyond its
/// own children.
pub fn new_tree_root_node(tree: &Arc<ObjectTree>, caches: Option<&Arc<CacheSet>>) -> NoderRef {
    fetch_or_build(caches, tree, "", FileMode::Dir, tree.id())
}

impl TreeNoder {
    pub fn mode(&self) -> FileMode {
        self.mode
    }

    /// The raw object hash of the entry.
    pub fn object_hash(&self) -> ObjectHash {
        self.nhash
    }

    /// The tree this entry is listed in. A root is its own parent.
    pub fn parent(&self) -> &Arc<ObjectTree> {
        &self.parent
    }

    fn is_root(&self) -> bool {
        self.name.is_empty()
    }

    fn renamed(&self, parent: &Arc<ObjectTree>, name: Arc<str>) -> Self {
        Self {
            parent: Arc::clone(parent),
            name,
            mode: self.mode,
            nhash: self.nhash,
            hash: self.hash,
            children: Arc::clone(&self.children),
            caches: self.caches.clone(),
        }
    }

    fn materialize(&self) -> ObjectResult<Vec<NoderRef>> {
        let caches = self.caches.upgrade();
        let tree = if self.is_root() {
            Arc::clone(&self.parent)
        } else {
            self.parent.tree(&self.name, caches.as_deref())?
        };

        match &caches {
            Some(c) => {
                let mut walker =
                    c.walkers()
                        .acquire(Arc::clone(&tree), false, None, Some(Arc::clone(c)));
                collect(&mut walker, &tree, Some(c))
            }
            None => {
                let mut walker = TreeWalker::new(Arc::clone(&tree), false, None, None);
                collect(&mut walker, &tree, None)
            }
        }
    }
}

fn collect(
    walker: &mut TreeWalker,
    tree: &Arc<ObjectTree>,
    caches: Option<&Arc<CacheSet>>,
) -> ObjectResult<Vec<NoderRef>> {
    let mut children: Vec<NoderRef> = Vec::with_capacity(tree.entries().len());
    while let Some((_, entry)) = walker.next_entry()? {
        if !TreeEntry::is_valid_name(&entry.name) {
            return Err(ObjectError::InvalidEntryName(entry.name));
        }
        children.push(fetch_or_build(caches, tree, &entry.name, entry.mode, entry.hash));
    }
    Ok(children)
}

fn fetch_or_build(
    caches: Option<&Arc<CacheSet>>,
    parent: &Arc<ObjectTree>,
    name: &str,
    mode: FileMode,
    hash: ObjectHash,
) -> Arc<TreeNoder> {
    let Some(caches) = caches else {
        return Arc::new(build(parent, Arc::from(name), mode, hash, Weak::new()));
    };

    if let Some(cached) = caches.noder(&hash, mode) {
        if &*cached.name == name {
            return cached;
        }
        return Arc::new(cached.renamed(parent, caches.intern(name)));
    }

    let node = Arc::new(build(
        parent,
        caches.intern(name),
        mode,
        hash,
        Arc::downgrade(caches),
    ));
    caches.put_noder(hash, mode, Arc::clone(&node));
    node
}

fn build(
    parent: &Arc<ObjectTree>,
    name: Arc<str>,
    mode: FileMode,
    hash: ObjectHash,
    caches: Weak<CacheSet>,
) -> TreeNoder {
    TreeNoder {
        parent: Arc::clone(parent),
        name,
        mode,
        nhash: hash,
        hash: NodeHash::encode(&hash, mode),
        children: Arc::new(OnceLock::new()),
        caches,
    }
}

impl Noder for TreeNoder {
    fn hash(&self) -> NodeHash {
        self.hash
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn is_dir(&self) -> bool {
        self.mode == FileMode::Dir
    }

    fn children(&self) -> NoderResult<&[NoderRef]> {
        if !self.is_dir() {
            return Ok(NO_CHILDREN);
        }
        if let Some(children) = self.children.get() {
            return Ok(children);
        }
        let built = self.materialize()?;
        Ok(self.children.get_or_init(|| built))
    }

    fn num_children(&self) -> NoderResult<usize> {
        Ok(self.children()?.len())
    }
}

impl fmt::Debug for TreeNoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeNoder")
            .field("name", &&*self.name)
            .field("mode", &self.mode)
            .field("hash", &self.nhash)
            .finish()
    }
}
