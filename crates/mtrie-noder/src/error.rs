//! Error types for node operations.

/// Errors surfaced by [`Noder`](crate::Noder) implementations.
#[derive(Debug, thiserror::Error)]
pub enum NoderError {
    /// A referenced object or path is absent.
    #[error("not found: {0}")]
    NotFound(String),

    /// An entry mode or tree record cannot be decoded.
    #[error("malformed entry: {0}")]
    Malformed(String),

    /// Reading content failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A tree literal has an invalid shape (duplicate or missing names).
    #[error("invalid tree shape: {0}")]
    Construction(String),
}

/// Convenience alias for node results.
pub type NoderResult<T> = Result<T, NoderError>;
