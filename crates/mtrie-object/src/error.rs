//! Error types for the object-tree adapter.

use mtrie_noder::NoderError;
use mtrie_store::StoreError;

/// Errors that can occur while resolving or walking trees.
#[derive(Debug, thiserror::Error)]
pub enum ObjectError {
    /// Object resolution failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// A path component has no entry in its tree.
    #[error("entry not found: {0}")]
    EntryNotFound(String),

    /// A path component names an entry that is not a directory.
    #[error("not a tree: {0}")]
    NotATree(String),

    /// A tree lists an entry under a name that cannot address it.
    #[error("invalid entry name {0:?}")]
    InvalidEntryName(String),

    /// The walk nested deeper than any sane tree.
    #[error("maximum tree depth exceeded ({0})")]
    MaxTreeDepth(usize),
}

/// Convenience alias for object-tree results.
pub type ObjectResult<T> = Result<T, ObjectError>;

impl From<ObjectError> for NoderError {
    fn from(err: ObjectError) -> Self {
        match err {
            ObjectError::Store(StoreError::NotFound(id)) => {
                NoderError::NotFound(format!("object {id}"))
            }
            ObjectError::Store(StoreError::Io(e)) => NoderError::Io(e),
            ObjectError::Store(e) => NoderError::Malformed(e.to_string()),
            ObjectError::EntryNotFound(path) => NoderError::NotFound(path),
            e @ (ObjectError::NotATree(_)
            | ObjectError::InvalidEntryName(_)
            | ObjectError::MaxTreeDepth(_)) => {
                NoderError::Malformed(e.to_string())
            }
        }
    }
}
