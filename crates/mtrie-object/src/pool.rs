//! Reuse pool for tree walkers.

use std::collections::HashSet;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use mtrie_types::ObjectHash;
use tracing::debug;

use crate::cache::CacheSet;
use crate::tree::ObjectTree;
use crate::walker::TreeWalker;

/// A pool of idle [`TreeWalker`]s.
///
/// [`WalkerPool::acquire`] hands out a [`PooledWalker`] guard that releases
/// the walker and returns it to the pool when dropped, whichever way the
/// borrowing scope exits. Walkers are never handed out twice at once.
#[derive(Default)]
pub struct WalkerPool {
    idle: Mutex<Vec<TreeWalker>>,
    created: AtomicUsize,
}

impl WalkerPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrow a walker reset to the given tree and configuration.
    pub fn acquire(
        &self,
        tree: Arc<ObjectTree>,
        recursive: bool,
        seen: Option<HashSet<ObjectHash>>,
        caches: Option<Arc<CacheSet>>,
    ) -> PooledWalker<'_> {
        let reused = self.idle.lock().expect("lock poisoned").pop();
        let mut walker = match reused {
            Some(walker) => walker,
            None => {
                let created = self.created.fetch_add(1, Ordering::Relaxed) + 1;
                debug!(created, "walker pool grew");
                TreeWalker::with_capacity()
            }
        };
        walker.reset(tree, recursive, seen, caches);
        PooledWalker { pool: self, walker }
    }

    /// Walkers currently waiting in the pool.
    pub fn idle(&self) -> usize {
        self.idle.lock().expect("lock poisoned").len()
    }

    /// Walkers ever created by this pool.
    pub fn created(&self) -> usize {
        self.created.load(Ordering::Relaxed)
    }

    fn put_back(&self, mut walker: TreeWalker) {
        walker.release();
        self.idle.lock().expect("lock poisoned").push(walker);
    }
}

impl std::fmt::Debug for WalkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalkerPool")
            .field("idle", &self.idle())
            .field("created", &self.created())
            .finish()
    }
}

/// A walker borrowed from a [`WalkerPool`].
pub struct PooledWalker<'a> {
    pool: &'a WalkerPool,
    walker: TreeWalker,
}

impl Deref for PooledWalker<'_> {
    type Target = TreeWalker;

    fn deref(&self) -> &TreeWalker {
        &self.walker
    }
}

impl DerefMut for PooledWalker<'_> {
    fn deref_mut(&mut self) -> &mut TreeWalker {
        &mut self.walker
    }
}

impl Drop for PooledWalker<'_> {
    fn drop(&mut self) {
        self.pool.put_back(std::mem::take(&mut self.walker));
    }
}
