//! Session-scoped memoization for tree comparison.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::{Arc, Mutex};

use mtrie_noder::Changes;
use mtrie_types::{pair_key, FileMode, NodeHash, ObjectHash, PAIR_KEY_LEN};
use tracing::debug;

use crate::pool::WalkerPool;
use crate::tree::ObjectTree;
use crate::treenoder::TreeNoder;

/// Everything a comparison session memoizes.
///
/// - resolved trees, keyed by tree hash
/// - tree nodes, keyed by `(hash, mode)`
/// - comparison results, keyed by the `(from, to)` comparison-key pair
/// - interned entry names
/// - a pool of idle walkers with their path buffers
///
/// A set lives exactly as long as the session that owns it. Share it
/// between sessions by handing the same `Arc` to each through
/// [`TreeOptions`](crate::TreeOptions).
#[derive(Default)]
pub struct CacheSet {
    trees: Mutex<HashMap<ObjectHash, Arc<ObjectTree>>>,
    noders: Mutex<HashMap<(ObjectHash, FileMode), Arc<TreeNoder>>>,
    changes: Mutex<HashMap<[u8; PAIR_KEY_LEN], Changes>>,
    strings: Mutex<HashSet<Arc<str>>>,
    walkers: WalkerPool,
}

/// Entry counts of a [`CacheSet`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub trees: usize,
    pub noders: usize,
    pub changes: usize,
    pub strings: usize,
}

impl CacheSet {
    pub fn new() -> Self {
        debug!("creating comparison cache set");
        Self::default()
    }

    /// A new set behind an `Arc`, ready to hand to nodes and options.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    // -----------------------------------------------------------------------
    // Trees
    // -----------------------------------------------------------------------

    pub fn tree(&self, id: &ObjectHash) -> Option<Arc<ObjectTree>> {
        self.trees.lock().expect("lock poisoned").get(id).cloned()
    }

    pub fn put_tree(&self, tree: Arc<ObjectTree>) {
        self.trees
            .lock()
            .expect("lock poisoned")
            .insert(tree.id(), tree);
    }

    // -----------------------------------------------------------------------
    // Nodes
    // -----------------------------------------------------------------------

    pub fn noder(&self, hash: &ObjectHash, mode: FileMode) -> Option<Arc<TreeNoder>> {
        self.noders
            .lock()
            .expect("lock poisoned")
            .get(&(*hash, mode))
            .cloned()
    }

    pub fn put_noder(&self, hash: ObjectHash, mode: FileMode, node: Arc<TreeNoder>) {
        self.noders
            .lock()
            .expect("lock poisoned")
            .insert((hash, mode), node);
    }

    // -----------------------------------------------------------------------
    // Comparison results
    // -----------------------------------------------------------------------

    /// A stored comparison result for the ordered key pair.
    pub fn changes(&self, from: &NodeHash, to: &NodeHash) -> Option<Changes> {
        self.changes
            .lock()
            .expect("lock poisoned")
            .get(&pair_key(from, to))
            .cloned()
    }

    pub fn put_changes(&self, from: &NodeHash, to: &NodeHash, changes: Changes) {
        self.changes
            .lock()
            .expect("lock poisoned")
            .insert(pair_key(from, to), changes);
    }

    // -----------------------------------------------------------------------
    // Names and walkers
    // -----------------------------------------------------------------------

    /// The canonical shared copy of `name`.
    pub fn intern(&self, name: &str) -> Arc<str> {
        let mut strings = self.strings.lock().expect("lock poisoned");
        if let Some(existing) = strings.get(name) {
            return Arc::clone(existing);
        }
        let interned: Arc<str> = Arc::from(name);
        strings.insert(Arc::clone(&interned));
        interned
    }

    pub fn walkers(&self) -> &WalkerPool {
        &self.walkers
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            trees: self.trees.lock().expect("lock poisoned").len(),
            noders: self.noders.lock().expect("lock poisoned").len(),
            changes: self.changes.lock().expect("lock poisoned").len(),
            strings: self.strings.lock().expect("lock poisoned").len(),
        }
    }
}

impl fmt::Debug for CacheSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheSet")
            .field("stats", &self.stats())
            .field("walkers", &self.walkers)
            .finish()
    }
}
