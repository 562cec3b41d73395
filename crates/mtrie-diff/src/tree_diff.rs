//! Tree-level diff: walk two node trees in lockstep and collect changes.
//!
//! Siblings are merged by name. Pairs with equal comparison keys are
//! skipped without being opened, except for the all-zero placeholder that
//! filesystem directories carry. A path that is a directory on one side and
//! a file on the other becomes a delete of one subtree and an insert of the
//! other. Only leaves are reported.
//!
//! Results for directory pairs with real keys on both sides are stored in
//! the session's comparison cache relative to the pair, and re-rooted when
//! the same pair turns up again.

use std::cmp::Ordering;
use std::path::Path;
use std::sync::Arc;

use mtrie_fs::{new_root_node, FsOptions};
use mtrie_noder::{Change, Changes, NoderRef};
use mtrie_object::{new_tree_root_node, CacheSet, ObjectTree, TreeOptions};
use mtrie_store::ObjectStore;
use mtrie_types::ObjectHash;
use tracing::debug;

use crate::error::DiffResult;

/// Options for a comparison session.
#[derive(Clone, Debug, Default)]
pub struct DiffTreeOptions {
    /// Cache set to consult and fill. `None` gives the session a fresh one.
    pub caches: Option<Arc<CacheSet>>,
}

impl DiffTreeOptions {
    pub fn with_caches(caches: Arc<CacheSet>) -> Self {
        Self {
            caches: Some(caches),
        }
    }
}

/// Compare two trees given by their root nodes.
///
/// Changes are ordered depth-first by path, with paths relative to the
/// roots.
pub fn diff_tree(from: &NoderRef, to: &NoderRef, opts: &DiffTreeOptions) -> DiffResult<Changes> {
    let caches = match &opts.caches {
        Some(caches) => Arc::clone(caches),
        None => CacheSet::shared(),
    };
    let mut session = Session { caches, hits: 0 };

    let mut changes = Changes::new();
    session.diff_nodes("", from, to, &mut changes)?;
    debug!(
        changes = changes.len(),
        cache_hits = session.hits,
        "comparison finished"
    );
    Ok(changes)
}

/// Compare two trees held in `store`.
pub fn diff_object_trees(
    store: &Arc<dyn ObjectStore>,
    from: ObjectHash,
    to: ObjectHash,
    opts: &TreeOptions,
) -> DiffResult<Changes> {
    let caches = opts.session_caches();
    let from = ObjectTree::load(store, from, Some(&caches))?;
    let to = ObjectTree::load(store, to, Some(&caches))?;
    diff_tree(
        &new_tree_root_node(&from, Some(&caches)),
        &new_tree_root_node(&to, Some(&caches)),
        &DiffTreeOptions::with_caches(caches),
    )
}

/// Compare a stored tree (the old side) against the directory at `dir`.
pub fn diff_worktree(
    store: &Arc<dyn ObjectStore>,
    tree: ObjectHash,
    dir: &Path,
    fs_opts: &FsOptions,
    opts: &TreeOptions,
) -> DiffResult<Changes> {
    let caches = opts.session_caches();
    let tree = ObjectTree::load(store, tree, Some(&caches))?;
    diff_tree(
        &new_tree_root_node(&tree, Some(&caches)),
        &new_root_node(dir, fs_opts.clone()),
        &DiffTreeOptions::with_caches(caches),
    )
}

struct Session {
    caches: Arc<CacheSet>,
    hits: usize,
}

impl Session {
    fn diff_nodes(
        &mut self,
        path: &str,
        from: &NoderRef,
        to: &NoderRef,
        out: &mut Changes,
    ) -> DiffResult<()> {
        let unchanged = from.hash() == to.hash() && !from.hash().is_zero();

        match (from.is_dir(), to.is_dir()) {
            (true, true) if unchanged => {}
            (true, true) => self.diff_dirs(path, from, to, out)?,
            (false, false) => {
                if from.hash() != to.hash() {
                    out.push(Change::modify(path, Arc::clone(from), Arc::clone(to)));
                }
            }
            (true, false) => {
                delete_subtree(path, from, out)?;
                out.push(Change::insert(path, Arc::clone(to)));
            }
            (false, true) => {
                out.push(Change::delete(path, Arc::clone(from)));
                insert_subtree(path, to, out)?;
            }
        }
        Ok(())
    }

    fn diff_dirs(
        &mut self,
        path: &str,
        from: &NoderRef,
        to: &NoderRef,
        out: &mut Changes,
    ) -> DiffResult<()> {
        let (fk, tk) = (from.hash(), to.hash());
        let cacheable = !fk.is_zero() && !tk.is_zero();

        if cacheable {
            if let Some(cached) = self.caches.changes(&fk, &tk) {
                self.hits += 1;
                debug!(path, changes = cached.len(), "comparison cache hit");
                out.extend(cached.iter().map(|c| c.rebased(path)));
                return Ok(());
            }
        }

        let mut local = Changes::new();
        self.merge_children(from, to, &mut local)?;
        out.extend(local.iter().map(|c| c.rebased(path)));
        if cacheable {
            self.caches.put_changes(&fk, &tk, local);
        }
        Ok(())
    }

    fn merge_children(&mut self, from: &NoderRef, to: &NoderRef, out: &mut Changes) -> DiffResult<()> {
        let old = visible_children(from)?;
        let new = visible_children(to)?;
        let (mut i, mut j) = (0, 0);

        loop {
            match (old.get(i), new.get(j)) {
                (None, None) => break,
                (Some(a), None) => {
                    delete_subtree(a.name(), a, out)?;
                    i += 1;
                }
                (None, Some(b)) => {
                    insert_subtree(b.name(), b, out)?;
                    j += 1;
                }
                (Some(a), Some(b)) => match a.name().cmp(b.name()) {
                    Ordering::Less => {
                        delete_subtree(a.name(), a, out)?;
                        i += 1;
                    }
                    Ordering::Greater => {
                        insert_subtree(b.name(), b, out)?;
                        j += 1;
                    }
                    Ordering::Equal => {
                        self.diff_nodes(a.name(), a, b, out)?;
                        i += 1;
                        j += 1;
                    }
                },
            }
        }
        Ok(())
    }
}

fn visible_children(node: &NoderRef) -> DiffResult<Vec<&NoderRef>> {
    let mut children: Vec<&NoderRef> = node.children()?.iter().filter(|c| !c.skip()).collect();
    children.sort_by(|a, b| a.name().cmp(b.name()));
    Ok(children)
}

fn delete_subtree(path: &str, node: &NoderRef, out: &mut Changes) -> DiffResult<()> {
    if !node.is_dir() {
        out.push(Change::delete(path, Arc::clone(node)));
        return Ok(());
    }
    for child in visible_children(node)? {
        delete_subtree(&join(path, child.name()), child, out)?;
    }
    Ok(())
}

fn insert_subtree(path: &str, node: &NoderRef, out: &mut Changes) -> DiffResult<()> {
    if !node.is_dir() {
        out.push(Change::insert(path, Arc::clone(node)));
        return Ok(());
    }
    for child in visible_children(node)? {
        insert_subtree(&join(path, child.name()), child, out)?;
    }
    Ok(())
}

fn join(base: &str, name: &str) -> String {
    if base.is_empty() {
        name.to_string()
    } else {
        format!("{base}/{name}")
    }
}
