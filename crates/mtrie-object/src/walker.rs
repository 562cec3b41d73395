//! Depth-first iteration over tree entries.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use mtrie_store::TreeEntry;
use mtrie_types::{FileMode, ObjectHash};

use crate::cache::CacheSet;
use crate::error::{ObjectError, ObjectResult};
use crate::tree::ObjectTree;

/// Deepest frame stack a walk may build before it is considered malformed.
pub const MAX_TREE_DEPTH: usize = 1024;

/// Initial frame capacity of a freshly created walker.
pub(crate) const STARTING_STACK_SIZE: usize = 8;

struct Frame {
    tree: Arc<ObjectTree>,
    pos: usize,
}

/// A resettable, depth-first iterator over the entries of an [`ObjectTree`].
///
/// Entries are yielded with their slash-separated path relative to the
/// root. In recursive mode the walker descends into directory entries (never
/// into submodule entries) right after yielding them. In non-recursive mode
/// sub-trees are never resolved.
///
/// With a seen-set installed, a directory whose hash was already visited is
/// still yielded but not descended into again. Self-referential trees are
/// cut at their first repetition.
///
/// Walkers keep their frame stack and path buffer allocated across
/// [`TreeWalker::reset`], which is what makes pooling them worthwhile.
#[derive(Default)]
pub struct TreeWalker {
    stack: Vec<Frame>,
    base: String,
    recursive: bool,
    seen: Option<HashSet<ObjectHash>>,
    caches: Option<Arc<CacheSet>>,
}

impl TreeWalker {
    pub fn new(
        tree: Arc<ObjectTree>,
        recursive: bool,
        seen: Option<HashSet<ObjectHash>>,
        caches: Option<Arc<CacheSet>>,
    ) -> Self {
        let mut walker = Self::with_capacity();
        walker.reset(tree, recursive, seen, caches);
        walker
    }

    pub(crate) fn with_capacity() -> Self {
        Self {
            stack: Vec::with_capacity(STARTING_STACK_SIZE),
            ..Self::default()
        }
    }

    /// Point the walker at a new tree, reusing its buffers.
    pub fn reset(
        &mut self,
        tree: Arc<ObjectTree>,
        recursive: bool,
        mut seen: Option<HashSet<ObjectHash>>,
        caches: Option<Arc<CacheSet>>,
    ) {
        if let Some(seen) = seen.as_mut() {
            seen.insert(tree.id());
        }
        self.stack.clear();
        if self.stack.capacity() == 0 {
            self.stack.reserve(STARTING_STACK_SIZE);
        }
        self.stack.push(Frame { tree, pos: 0 });
        self.base.clear();
        self.recursive = recursive;
        self.seen = seen;
        self.caches = caches;
    }

    /// Drop every reference the walker holds. Buffers stay allocated.
    pub fn release(&mut self) {
        self.stack.clear();
        self.base.clear();
        self.recursive = false;
        self.seen = None;
        self.caches = None;
    }

    /// The tree the walk started from, if the walker is active.
    pub fn tree(&self) -> Option<&Arc<ObjectTree>> {
        self.stack.first().map(|f| &f.tree)
    }

    /// Hashes of every tree visited so far, when cycle protection is on.
    pub fn seen(&self) -> Option<&HashSet<ObjectHash>> {
        self.seen.as_ref()
    }

    pub fn stack_capacity(&self) -> usize {
        self.stack.capacity()
    }

    /// Advance to the next entry.
    ///
    /// Returns `Ok(None)` once the walk is exhausted. Failures to resolve a
    /// sub-tree are returned as errors and never mistaken for the end.
    pub fn next_entry(&mut self) -> ObjectResult<Option<(String, TreeEntry)>> {
        loop {
            if self.stack.len() > MAX_TREE_DEPTH {
                return Err(ObjectError::MaxTreeDepth(MAX_TREE_DEPTH));
            }
            let Some(frame) = self.stack.last_mut() else {
                return Ok(None);
            };

            let Some(entry) = frame.tree.entries().get(frame.pos).cloned() else {
                self.stack.pop();
                pop_component(&mut self.base);
                continue;
            };
            frame.pos += 1;
            let store = Arc::clone(frame.tree.store());

            let path = join(&self.base, &entry.name);

            if self.recursive && entry.mode == FileMode::Dir {
                let descend = match self.seen.as_mut() {
                    Some(seen) => seen.insert(entry.hash),
                    None => true,
                };
                if descend {
                    let subtree = ObjectTree::load(&store, entry.hash, self.caches.as_deref())?;
                    self.stack.push(Frame {
                        tree: subtree,
                        pos: 0,
                    });
                    self.base.clear();
                    self.base.push_str(&path);
                }
            }

            return Ok(Some((path, entry)));
        }
    }
}

impl Iterator for TreeWalker {
    type Item = ObjectResult<(String, TreeEntry)>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_entry().transpose()
    }
}

impl fmt::Debug for TreeWalker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeWalker")
            .field("depth", &self.stack.len())
            .field("base", &self.base)
            .field("recursive", &self.recursive)
            .field("cycle_protection", &self.seen.is_some())
            .finish()
    }
}

fn join(base: &str, name: &str) -> String {
    if base.is_empty() {
        name.to_string()
    } else {
        format!("{base}/{name}")
    }
}

fn pop_component(base: &mut String) {
    match base.rfind('/') {
        Some(i) => base.truncate(i),
        None => base.clear(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mtrie_store::{InMemoryObjectStore, ObjectStore, StoreError, Tree};

    fn store() -> Arc<dyn ObjectStore> {
        Arc::new(InMemoryObjectStore::new())
    }

    fn blob(store: &Arc<dyn ObjectStore>, data: &str) -> ObjectHash {
        store.write_blob(data.as_bytes()).unwrap()
    }

    fn tree(store: &Arc<dyn ObjectStore>, entries: Vec<TreeEntry>) -> ObjectHash {
        store.write_tree(&Tree::new(entries)).unwrap()
    }

    fn load(store: &Arc<dyn ObjectStore>, id: ObjectHash) -> Arc<ObjectTree> {
        ObjectTree::load(store, id, None).unwrap()
    }

    fn paths(walker: TreeWalker) -> Vec<String> {
        walker.map(|r| r.unwrap().0).collect()
    }

    // (a(b<1>) c<2> d(e(f<3>)) m[submodule])
    fn sample(store: &Arc<dyn ObjectStore>) -> ObjectHash {
        let b = blob(store, "1");
        let c = blob(store, "2");
        let f = blob(store, "3");
        let a = tree(store, vec![TreeEntry::new(FileMode::Regular, "b", b)]);
        let e = tree(store, vec![TreeEntry::new(FileMode::Regular, "f", f)]);
        let d = tree(store, vec![TreeEntry::new(FileMode::Dir, "e", e)]);
        tree(
            store,
            vec![
                TreeEntry::new(FileMode::Dir, "a", a),
                TreeEntry::new(FileMode::Regular, "c", c),
                TreeEntry::new(FileMode::Dir, "d", d),
                TreeEntry::new(FileMode::Submodule, "m", ObjectHash::from_bytes(b"pin")),
            ],
        )
    }

    // -----------------------------------------------------------------------
    // Traversal order
    // -----------------------------------------------------------------------

    #[test]
    fn recursive_walk_is_depth_first() {
        let s = store();
        let root = sample(&s);
        let walker = TreeWalker::new(load(&s, root), true, None, None);
        assert_eq!(paths(walker), ["a", "a/b", "c", "d", "d/e", "d/e/f", "m"]);
    }

    #[test]
    fn non_recursive_walk_lists_one_level() {
        let s = store();
        let root = sample(&s);
        let walker = TreeWalker::new(load(&s, root), false, None, None);
        assert_eq!(paths(walker), ["a", "c", "d", "m"]);
    }

    #[test]
    fn non_recursive_walk_never_resolves_subtrees() {
        let s = store();
        let missing = ObjectHash::from_bytes(b"not stored");
        let root = tree(&s, vec![TreeEntry::new(FileMode::Dir, "x", missing)]);
        let walker = TreeWalker::new(load(&s, root), false, None, None);
        assert_eq!(paths(walker), ["x"]);
    }

    #[test]
    fn submodules_are_not_descended() {
        let s = store();
        let root = sample(&s);
        let mut walker = TreeWalker::new(load(&s, root), true, None, None);
        let mut last = None;
        while let Some((path, entry)) = walker.next_entry().unwrap() {
            last = Some((path, entry.mode));
        }
        assert_eq!(last, Some(("m".to_string(), FileMode::Submodule)));
    }

    #[test]
    fn exhausted_walker_keeps_returning_none() {
        let s = store();
        let root = tree(&s, vec![]);
        let mut walker = TreeWalker::new(load(&s, root), true, None, None);
        assert!(walker.next_entry().unwrap().is_none());
        assert!(walker.next_entry().unwrap().is_none());
    }

    // -----------------------------------------------------------------------
    // Failures
    // -----------------------------------------------------------------------

    #[test]
    fn unresolvable_subtree_is_an_error_not_eof() {
        let s = store();
        let missing = ObjectHash::from_bytes(b"not stored");
        let root = tree(&s, vec![TreeEntry::new(FileMode::Dir, "x", missing)]);
        let mut walker = TreeWalker::new(load(&s, root), true, None, None);
        let err = walker.next_entry().unwrap_err();
        assert!(matches!(err, ObjectError::Store(StoreError::NotFound(_))));
    }

    #[test]
    fn cycle_without_protection_hits_depth_limit() {
        let mem = Arc::new(InMemoryObjectStore::new());
        let id = ObjectHash::from_bytes(b"loop");
        let looped = Tree::new(vec![TreeEntry::new(FileMode::Dir, "again", id)]);
        mem.insert_raw(id, looped.to_stored_object().unwrap());
        let s: Arc<dyn ObjectStore> = mem;

        let mut walker = TreeWalker::new(load(&s, id), true, None, None);
        let err = walker.find_map(|r| r.err()).unwrap();
        assert!(matches!(err, ObjectError::MaxTreeDepth(MAX_TREE_DEPTH)));
    }

    #[test]
    fn cycle_protection_cuts_self_reference() {
        let mem = Arc::new(InMemoryObjectStore::new());
        let id = ObjectHash::from_bytes(b"loop");
        let looped = Tree::new(vec![TreeEntry::new(FileMode::Dir, "again", id)]);
        mem.insert_raw(id, looped.to_stored_object().unwrap());
        let s: Arc<dyn ObjectStore> = mem;

        let walker = TreeWalker::new(load(&s, id), true, Some(HashSet::new()), None);
        assert_eq!(paths(walker), ["again"]);
    }

    #[test]
    fn seen_subtree_is_listed_but_not_rewalked() {
        let s = store();
        let f = blob(&s, "1");
        let shared = tree(&s, vec![TreeEntry::new(FileMode::Regular, "f", f)]);
        let root = tree(
            &s,
            vec![
                TreeEntry::new(FileMode::Dir, "x", shared),
                TreeEntry::new(FileMode::Dir, "y", shared),
            ],
        );

        let plain = TreeWalker::new(load(&s, root), true, None, None);
        assert_eq!(paths(plain), ["x", "x/f", "y", "y/f"]);

        let mut guarded = TreeWalker::new(load(&s, root), true, Some(HashSet::new()), None);
        let mut got = Vec::new();
        while let Some((p, _)) = guarded.next_entry().unwrap() {
            got.push(p);
        }
        assert_eq!(got, ["x", "x/f", "y"]);
        let seen = guarded.seen().unwrap();
        assert!(seen.contains(&root) && seen.contains(&shared));
    }

    // -----------------------------------------------------------------------
    // Reuse
    // -----------------------------------------------------------------------

    #[test]
    fn reset_reuses_buffers() {
        let s = store();
        let root = sample(&s);
        let mut walker = TreeWalker::new(load(&s, root), true, None, None);
        while walker.next_entry().unwrap().is_some() {}
        let cap = walker.stack_capacity();
        assert!(cap >= STARTING_STACK_SIZE);

        walker.reset(load(&s, root), false, None, None);
        assert_eq!(walker.stack_capacity(), cap);
        assert_eq!(paths(walker), ["a", "c", "d", "m"]);
    }

    #[test]
    fn release_drops_references() {
        let s = store();
        let root = sample(&s);
        let t = load(&s, root);
        let mut walker = TreeWalker::new(Arc::clone(&t), true, Some(HashSet::new()), None);
        assert_eq!(Arc::strong_count(&t), 2);
        walker.release();
        assert_eq!(Arc::strong_count(&t), 1);
        assert!(walker.tree().is_none());
        assert!(walker.seen().is_none());
        assert!(walker.next_entry().unwrap().is_none());
    }

    #[test]
    fn walk_fills_session_tree_cache() {
        let s = store();
        let root = sample(&s);
        let caches = Arc::new(CacheSet::new());
        let walker = TreeWalker::new(load(&s, root), true, None, Some(Arc::clone(&caches)));
        assert_eq!(paths(walker).len(), 7);
        // a, d, and d/e were resolved through the cache.
        assert_eq!(caches.stats().trees, 3);
    }

    #[test]
    fn path_helpers() {
        assert_eq!(join("", "a"), "a");
        assert_eq!(join("a/b", "c"), "a/b/c");
        let mut base = "a/b/c".to_string();
        pop_component(&mut base);
        assert_eq!(base, "a/b");
        pop_component(&mut base);
        pop_component(&mut base);
        assert_eq!(base, "");
        pop_component(&mut base);
        assert_eq!(base, "");
    }
}
