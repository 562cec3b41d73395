//! Comparisons between stored trees and live directories.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use mtrie_diff::{diff_object_trees, diff_worktree, DiffError};
use mtrie_fs::{write_tree, FsOptions};
use mtrie_noder::{Action, Changes};
use mtrie_object::{CacheSet, ObjectError, TreeOptions};
use mtrie_store::{InMemoryObjectStore, ObjectStore, StoreError, Tree, TreeEntry};
use mtrie_types::FileMode;

fn populate(dir: &Path) {
    fs::create_dir_all(dir.join("src/util")).unwrap();
    fs::write(dir.join("README.md"), "# project\n").unwrap();
    fs::write(dir.join("src/main.rs"), "fn main() {}\n").unwrap();
    fs::write(dir.join("src/util/mod.rs"), "pub mod io;\n").unwrap();
    fs::write(dir.join("src/util/io.rs"), "pub fn read() {}\n").unwrap();
}

fn summary(changes: &Changes) -> Vec<String> {
    changes.iter().map(|c| c.to_string()).collect()
}

fn import(store: &Arc<dyn ObjectStore>, dir: &Path) -> mtrie_types::ObjectHash {
    write_tree(store.as_ref(), dir, &FsOptions::default()).unwrap()
}

// ---------------------------------------------------------------------------
// Stored tree against working directory
// ---------------------------------------------------------------------------

#[test]
fn untouched_worktree_matches_its_import() {
    let dir = tempfile::tempdir().unwrap();
    populate(dir.path());
    let store: Arc<dyn ObjectStore> = Arc::new(InMemoryObjectStore::new());
    let tree = import(&store, dir.path());

    let changes = diff_worktree(
        &store,
        tree,
        dir.path(),
        &FsOptions::default(),
        &TreeOptions::default(),
    )
    .unwrap();
    assert!(changes.is_empty(), "unexpected: {:?}", summary(&changes));
}

#[test]
fn edits_on_disk_are_reported() {
    let dir = tempfile::tempdir().unwrap();
    populate(dir.path());
    let store: Arc<dyn ObjectStore> = Arc::new(InMemoryObjectStore::new());
    let tree = import(&store, dir.path());

    fs::write(dir.path().join("src/main.rs"), "fn main() { run() }\n").unwrap();
    fs::remove_file(dir.path().join("README.md")).unwrap();
    fs::write(dir.path().join("src/util/net.rs"), "pub fn get() {}\n").unwrap();

    let changes = diff_worktree(
        &store,
        tree,
        dir.path(),
        &FsOptions::default(),
        &TreeOptions::default(),
    )
    .unwrap();
    assert_eq!(
        summary(&changes),
        [
            "<Delete README.md>",
            "<Modify src/main.rs>",
            "<Insert src/util/net.rs>"
        ]
    );
}

#[test]
fn ignored_names_stay_invisible() {
    let dir = tempfile::tempdir().unwrap();
    populate(dir.path());
    let store: Arc<dyn ObjectStore> = Arc::new(InMemoryObjectStore::new());
    let tree = import(&store, dir.path());

    fs::create_dir(dir.path().join(".git")).unwrap();
    fs::write(dir.path().join(".git/HEAD"), "ref: main\n").unwrap();

    let changes = diff_worktree(
        &store,
        tree,
        dir.path(),
        &FsOptions::default(),
        &TreeOptions::default(),
    )
    .unwrap();
    assert!(changes.is_empty());
}

#[cfg(unix)]
#[test]
fn mode_change_is_a_modification() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    populate(dir.path());
    let store: Arc<dyn ObjectStore> = Arc::new(InMemoryObjectStore::new());
    let tree = import(&store, dir.path());

    fs::set_permissions(
        dir.path().join("src/main.rs"),
        fs::Permissions::from_mode(0o755),
    )
    .unwrap();

    let changes = diff_worktree(
        &store,
        tree,
        dir.path(),
        &FsOptions::default(),
        &TreeOptions::default(),
    )
    .unwrap();
    assert_eq!(summary(&changes), ["<Modify src/main.rs>"]);
    assert_eq!(changes[0].action, Action::Modify);
}

#[test]
fn pinned_submodule_compares_by_pin() {
    let dir = tempfile::tempdir().unwrap();
    populate(dir.path());
    fs::create_dir(dir.path().join("vendor")).unwrap();
    fs::write(dir.path().join("vendor/lib.rs"), "// checked out\n").unwrap();

    let pin = mtrie_types::ObjectHash::from_bytes(b"v1");
    let opts = FsOptions::default().with_submodule("vendor", pin);
    let store: Arc<dyn ObjectStore> = Arc::new(InMemoryObjectStore::new());
    let tree = write_tree(store.as_ref(), dir.path(), &opts).unwrap();

    // Changing the checked-out content does not matter, only the pin.
    fs::write(dir.path().join("vendor/lib.rs"), "// edited\n").unwrap();
    let same = diff_worktree(&store, tree, dir.path(), &opts, &TreeOptions::default()).unwrap();
    assert!(same.is_empty());

    let bumped = FsOptions::default().with_submodule("vendor", mtrie_types::ObjectHash::from_bytes(b"v2"));
    let changes =
        diff_worktree(&store, tree, dir.path(), &bumped, &TreeOptions::default()).unwrap();
    assert_eq!(summary(&changes), ["<Modify vendor>"]);
}

// ---------------------------------------------------------------------------
// Stored tree against stored tree
// ---------------------------------------------------------------------------

#[test]
fn stored_trees_compare_by_content() {
    let before = tempfile::tempdir().unwrap();
    let after = tempfile::tempdir().unwrap();
    populate(before.path());
    populate(after.path());
    fs::remove_dir_all(after.path().join("src/util")).unwrap();
    fs::write(after.path().join("src/util"), "now a file\n").unwrap();

    let store: Arc<dyn ObjectStore> = Arc::new(InMemoryObjectStore::new());
    let old = import(&store, before.path());
    let new = import(&store, after.path());

    let changes = diff_object_trees(&store, old, new, &TreeOptions::default()).unwrap();
    assert_eq!(
        summary(&changes),
        [
            "<Delete src/util/io.rs>",
            "<Delete src/util/mod.rs>",
            "<Insert src/util>"
        ]
    );
    assert!(diff_object_trees(&store, old, old, &TreeOptions::default())
        .unwrap()
        .is_empty());
}

#[test]
fn shared_cache_set_is_reused_across_sessions() {
    let before = tempfile::tempdir().unwrap();
    let after = tempfile::tempdir().unwrap();
    populate(before.path());
    populate(after.path());
    fs::write(after.path().join("src/util/io.rs"), "pub fn write() {}\n").unwrap();

    let store: Arc<dyn ObjectStore> = Arc::new(InMemoryObjectStore::new());
    let old = import(&store, before.path());
    let new = import(&store, after.path());

    let caches = CacheSet::shared();
    let opts = TreeOptions::default().with_caches(Arc::clone(&caches));
    let first = diff_object_trees(&store, old, new, &opts).unwrap();
    let stats = caches.stats();
    assert!(stats.changes >= 3);

    let second = diff_object_trees(&store, old, new, &opts).unwrap();
    assert_eq!(summary(&first), summary(&second));
    assert_eq!(caches.stats(), stats);
}

#[test]
fn trees_with_unaddressable_names_fail_instead_of_recursing() {
    let store: Arc<dyn ObjectStore> = Arc::new(InMemoryObjectStore::new());
    let mut roots = Vec::new();
    for content in [&b"1"[..], b"2"] {
        let blob = store.write_blob(content).unwrap();
        let inner = store
            .write_tree(&Tree::new(vec![TreeEntry::new(FileMode::Regular, "f", blob)]))
            .unwrap();
        let root = store
            .write_tree(&Tree::new(vec![TreeEntry::new(FileMode::Dir, "", inner)]))
            .unwrap();
        roots.push(root);
    }

    let err = diff_object_trees(&store, roots[0], roots[1], &TreeOptions::default()).unwrap_err();
    assert!(matches!(
        err,
        DiffError::Object(ObjectError::Store(StoreError::CorruptObject { .. }))
    ));
}
