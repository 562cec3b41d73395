//! Import a working directory into an object store.

use std::fs;
use std::path::Path;

use mtrie_noder::Noder;
use mtrie_store::{ObjectStore, Tree, TreeEntry};
use mtrie_types::{FileMode, ObjectHash};
use tracing::debug;

use crate::error::FsResult;
use crate::node::FsNode;
use crate::options::FsOptions;

/// Write every blob and tree below `root` to `store`, returning the root
/// tree hash.
///
/// Listing follows the same rules as [`FsNode`]: ignored names are skipped,
/// mapped submodules are recorded by their pin, and symlinks are stored as
/// blobs holding their target path.
pub fn write_tree(store: &dyn ObjectStore, root: &Path, options: &FsOptions) -> FsResult<ObjectHash> {
    let node = FsNode::root(root, options.clone());
    let id = write_dir(store, &node)?;
    debug!(root = %root.display(), tree = %id.short_hex(), "imported directory");
    Ok(id)
}

fn write_dir(store: &dyn ObjectStore, dir: &FsNode) -> FsResult<ObjectHash> {
    let children = dir.list()?;
    let mut entries = Vec::with_capacity(children.len());

    for child in &children {
        let hash = match child.mode() {
            FileMode::Dir => write_dir(store, child)?,
            FileMode::Submodule => child.hash().content_hash(),
            FileMode::Symlink => {
                let target = fs::read_link(child.full_path())?;
                store.write_blob(target.as_os_str().as_encoded_bytes())?
            }
            _ => store.write_blob(&fs::read(child.full_path())?)?,
        };
        entries.push(TreeEntry::new(child.mode(), child.name(), hash));
    }

    Ok(store.write_tree(&Tree::new(entries))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::new_root_node;
    use mtrie_store::InMemoryObjectStore;
    use mtrie_types::NodeHash;

    #[test]
    fn imports_nested_directories() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::write(dir.path().join("README"), "hi").unwrap();
        fs::write(dir.path().join("src/lib.rs"), "pub fn f() {}").unwrap();

        let store = InMemoryObjectStore::new();
        let id = write_tree(&store, dir.path(), &FsOptions::default()).unwrap();

        let root = store.read_tree(&id).unwrap();
        assert_eq!(root.len(), 2);
        let src = root.get("src").unwrap();
        assert_eq!(src.mode, FileMode::Dir);
        let src = store.read_tree(&src.hash).unwrap();
        let lib = src.get("lib.rs").unwrap();
        assert_eq!(store.read_blob(&lib.hash).unwrap().data, b"pub fn f() {}");
    }

    #[test]
    fn stored_hashes_agree_with_node_keys() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a"), "one").unwrap();
        fs::write(dir.path().join("b"), "two").unwrap();

        let store = InMemoryObjectStore::new();
        let id = write_tree(&store, dir.path(), &FsOptions::default()).unwrap();
        let tree = store.read_tree(&id).unwrap();

        let node = new_root_node(dir.path(), FsOptions::default());
        for child in node.children().unwrap() {
            let entry = tree.get(child.name()).unwrap();
            assert_eq!(child.hash(), NodeHash::encode(&entry.hash, entry.mode));
        }
    }

    #[test]
    fn same_content_imports_to_same_tree() {
        let one = tempfile::tempdir().unwrap();
        let two = tempfile::tempdir().unwrap();
        for d in [&one, &two] {
            fs::create_dir(d.path().join("x")).unwrap();
            fs::write(d.path().join("x/f"), "same").unwrap();
        }
        let store = InMemoryObjectStore::new();
        let a = write_tree(&store, one.path(), &FsOptions::default()).unwrap();
        let b = write_tree(&store, two.path(), &FsOptions::default()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn submodules_are_recorded_by_pin() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/f"), "ignored").unwrap();
        let pin = ObjectHash::from_bytes(b"head");

        let store = InMemoryObjectStore::new();
        let opts = FsOptions::default().with_submodule("sub", pin);
        let id = write_tree(&store, dir.path(), &opts).unwrap();
        let entry = store.read_tree(&id).unwrap().get("sub").cloned().unwrap();
        assert_eq!(entry.mode, FileMode::Submodule);
        assert_eq!(entry.hash, pin);
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_store_their_target() {
        let dir = tempfile::tempdir().unwrap();
        std::os::unix::fs::symlink("elsewhere", dir.path().join("link")).unwrap();
        let store = InMemoryObjectStore::new();
        let id = write_tree(&store, dir.path(), &FsOptions::default()).unwrap();
        let entry = store.read_tree(&id).unwrap().get("link").cloned().unwrap();
        assert_eq!(entry.mode, FileMode::Symlink);
        assert_eq!(store.read_blob(&entry.hash).unwrap().data, b"elsewhere");
    }
}
