//! Configuration for tree walks and tree-node sessions.

use std::collections::HashSet;
use std::sync::Arc;

use crate::cache::CacheSet;
use crate::pool::PooledWalker;
use crate::tree::ObjectTree;

/// Options shared by walks and comparison sessions over object trees.
#[derive(Clone, Debug)]
pub struct TreeOptions {
    /// Cache set to share with other sessions. `None` gives each session
    /// its own fresh set.
    pub caches: Option<Arc<CacheSet>>,
    /// Descend into directory entries.
    pub recursive: bool,
    /// Track visited tree hashes and never descend into one twice.
    pub cycle_protection: bool,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            caches: None,
            recursive: true,
            cycle_protection: false,
        }
    }
}

impl TreeOptions {
    pub fn with_caches(mut self, caches: Arc<CacheSet>) -> Self {
        self.caches = Some(caches);
        self
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn cycle_protection(mut self, enabled: bool) -> Self {
        self.cycle_protection = enabled;
        self
    }

    /// The injected cache set, or a fresh one for a new session.
    pub fn session_caches(&self) -> Arc<CacheSet> {
        match &self.caches {
            Some(caches) => Arc::clone(caches),
            None => CacheSet::shared(),
        }
    }

    /// A walker over `tree` configured by these options, borrowed from the
    /// pool of `caches`.
    pub fn pooled_walker<'a>(
        &self,
        caches: &'a Arc<CacheSet>,
        tree: Arc<ObjectTree>,
    ) -> PooledWalker<'a> {
        caches
            .walkers()
            .acquire(tree, self.recursive, self.seen_set(), Some(Arc::clone(caches)))
    }

    fn seen_set(&self) -> Option<HashSet<mtrie_types::ObjectHash>> {
        self.cycle_protection.then(HashSet::new)
    }
}
