//! File modes from filesystem metadata.

use std::fs::Metadata;
use std::path::Path;

use mtrie_noder::{NoderError, NoderResult};
use mtrie_types::FileMode;

/// Map `lstat`-style metadata to a [`FileMode`].
///
/// Device files, sockets, and pipes have no stored representation and are
/// rejected.
pub fn mode_of(path: &Path, meta: &Metadata) -> NoderResult<FileMode> {
    let file_type = meta.file_type();
    if file_type.is_symlink() {
        Ok(FileMode::Symlink)
    } else if file_type.is_dir() {
        Ok(FileMode::Dir)
    } else if file_type.is_file() {
        Ok(if is_executable(meta) {
            FileMode::Executable
        } else {
            FileMode::Regular
        })
    } else {
        Err(NoderError::Malformed(format!(
            "unsupported file type: {}",
            path.display()
        )))
    }
}

#[cfg(unix)]
fn is_executable(meta: &Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(_meta: &Metadata) -> bool {
    false
}
