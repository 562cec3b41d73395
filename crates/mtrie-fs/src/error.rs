//! Error types for the filesystem adapter.

use mtrie_noder::NoderError;
use mtrie_store::StoreError;

/// Errors that can occur while importing a directory.
#[derive(Debug, thiserror::Error)]
pub enum FsError {
    /// Listing or hashing the directory failed.
    #[error("node error: {0}")]
    Noder(#[from] NoderError),

    /// Writing objects failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Reading file contents failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for filesystem results.
pub type FsResult<T> = Result<T, FsError>;
