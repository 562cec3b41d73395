//! Error types for the diff crate.

/// Errors that can occur during a comparison.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    /// A node failed to produce its children.
    #[error("node error: {0}")]
    Noder(#[from] mtrie_noder::NoderError),

    /// A stored tree could not be resolved.
    #[error("object error: {0}")]
    Object(#[from] mtrie_object::ObjectError),
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
