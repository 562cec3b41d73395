//! Working-directory nodes.

use std::fmt;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use mtrie_crypto::ContentHasher;
use mtrie_noder::{Noder, NoderError, NoderRef, NoderResult, NO_CHILDREN};
use mtrie_types::{FileMode, NodeHash, ObjectHash};
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use crate::mode::mode_of;
use crate::options::FsOptions;

struct FsContext {
    root: PathBuf,
    options: FsOptions,
}

/// A file, directory, symlink, or pinned submodule in a working directory.
///
/// Keys are computed when the parent lists the entry:
///
/// - directories get [`NodeHash::ZERO`]
/// - regular and executable files get their streamed blob hash
/// - symlinks get the blob hash of their target path, never of the target
/// - mapped submodules get their pinned hash, and are leaves
///
/// Children are listed once, sorted by name, and memoized; later changes on
/// disk are not observed by the same node.
pub struct FsNode {
    ctx: Arc<FsContext>,
    path: String,
    mode: FileMode,
    hash: NodeHash,
    children: OnceLock<Vec<NoderRef>>,
}

/// Create the root node of the working directory at `root`.
pub fn new_root_node(root: impl Into<PathBuf>, options: FsOptions) -> NoderRef {
    Arc::new(FsNode::root(root, options))
}

impl FsNode {
    pub fn root(root: impl Into<PathBuf>, options: FsOptions) -> Self {
        Self {
            ctx: Arc::new(FsContext {
                root: root.into(),
                options,
            }),
            path: String::new(),
            mode: FileMode::Dir,
            hash: NodeHash::ZERO,
            children: OnceLock::new(),
        }
    }

    pub fn mode(&self) -> FileMode {
        self.mode
    }

    /// Slash-separated path relative to the root. Empty for the root.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Location of the entry on disk.
    pub fn full_path(&self) -> PathBuf {
        if self.path.is_empty() {
            self.ctx.root.clone()
        } else {
            self.ctx.root.join(&self.path)
        }
    }

    fn child(&self, path: String, mode: FileMode, hash: NodeHash) -> Self {
        Self {
            ctx: Arc::clone(&self.ctx),
            path,
            mode,
            hash,
            children: OnceLock::new(),
        }
    }

    /// List and hash the direct entries of this directory.
    pub(crate) fn list(&self) -> NoderResult<Vec<FsNode>> {
        let entries = self.scan()?;
        self.hash_all(entries)
    }

    /// Direct entries of this directory, sorted by name. A directory that
    /// no longer exists has none.
    fn scan(&self) -> NoderResult<Vec<DirEntry>> {
        let dir = self.full_path();
        let mut out = Vec::new();

        let entries = WalkDir::new(&dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
            .sort_by_file_name();

        for entry in entries {
            match entry {
                Ok(entry) => out.push(entry),
                Err(err) if is_not_found(&err) && err.depth() == 0 => {
                    debug!(path = %dir.display(), "directory gone before listing");
                    return Ok(Vec::new());
                }
                Err(err) if is_not_found(&err) && self.ctx.options.tolerate_vanished => continue,
                Err(err) => return Err(walk_error(err)),
            }
        }
        Ok(out)
    }

    /// Build child nodes for scanned entries. Entries gone since the scan
    /// are dropped when `tolerate_vanished` is set and fail otherwise.
    fn hash_all(&self, entries: Vec<DirEntry>) -> NoderResult<Vec<FsNode>> {
        let opts = &self.ctx.options;
        let mut out = Vec::with_capacity(entries.len());

        for entry in entries {
            let name = entry.file_name().to_str().ok_or_else(|| {
                NoderError::Malformed(format!("non UTF-8 name: {}", entry.path().display()))
            })?;
            if opts.is_ignored(name) {
                continue;
            }
            let path = join(&self.path, name);

            if let Some(pin) = opts.submodules.get(&path) {
                let hash = NodeHash::encode(pin, FileMode::Submodule);
                out.push(self.child(path, FileMode::Submodule, hash));
                continue;
            }

            match hash_entry(&entry) {
                Ok((mode, hash)) => out.push(self.child(path, mode, hash)),
                Err(NoderError::NotFound(_)) if opts.tolerate_vanished => {
                    debug!(%path, "entry vanished while hashing");
                }
                Err(e) => return Err(e),
            }
        }

        Ok(out)
    }
}

fn hash_entry(entry: &DirEntry) -> NoderResult<(FileMode, NodeHash)> {
    let full = entry.path();
    let meta = entry.metadata().map_err(walk_error)?;
    let mode = mode_of(full, &meta)?;
    let content = match mode {
        FileMode::Dir => return Ok((mode, NodeHash::ZERO)),
        FileMode::Symlink => hash_symlink(full)?,
        _ => hash_regular(full, meta.len())?,
    };
    Ok((mode, NodeHash::encode(&content, mode)))
}

fn hash_regular(path: &Path, size: u64) -> NoderResult<ObjectHash> {
    let mut file = File::open(path).map_err(|e| io_error(path, e))?;
    let mut hasher = ContentHasher::BLOB.begin(size);
    io::copy(&mut file, &mut hasher).map_err(|e| io_error(path, e))?;
    Ok(hasher.finalize())
}

fn hash_symlink(path: &Path) -> NoderResult<ObjectHash> {
    let target = std::fs::read_link(path).map_err(|e| io_error(path, e))?;
    Ok(ContentHasher::BLOB.hash(target.as_os_str().as_encoded_bytes()))
}

fn is_not_found(err: &walkdir::Error) -> bool {
    err.io_error()
        .is_some_and(|e| e.kind() == io::ErrorKind::NotFound)
}

fn walk_error(err: walkdir::Error) -> NoderError {
    let path = err
        .path()
        .map(|p| p.display().to_string())
        .unwrap_or_default();
    match err.into_io_error() {
        Some(io) if io.kind() == io::ErrorKind::NotFound => NoderError::NotFound(path),
        Some(io) => NoderError::Io(io),
        None => NoderError::Malformed(format!("filesystem loop at {path}")),
    }
}

fn io_error(path: &Path, err: io::Error) -> NoderError {
    if err.kind() == io::ErrorKind::NotFound {
        NoderError::NotFound(path.display().to_string())
    } else {
        NoderError::Io(err)
    }
}

fn join(base: &str, name: &str) -> String {
    if base.is_empty() {
        name.to_string()
    } else {
        format!("{base}/{name}")
    }
}

impl Noder for FsNode {
    fn hash(&self) -> NodeHash {
        self.hash
    }

    fn name(&self) -> &str {
        match self.path.rfind('/') {
            Some(i) => &self.path[i + 1..],
            None => &self.path,
        }
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
        let listed: Vec<NoderRef> = self
            .list()?
            .into_iter()
            .map(|n| Arc::new(n) as NoderRef)
            .collect();
        Ok(self.children.get_or_init(|| listed))
    }

    fn num_children(&self) -> NoderResult<usize> {
        Ok(self.children()?.len())
    }
}

impl fmt::Debug for FsNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FsNode")
            .field("path", &self.path)
            .field("mode", &self.mode)
            .finish()
    }
}
