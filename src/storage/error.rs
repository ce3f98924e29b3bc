use thiserror::Error;

/// Errors produced by the media store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// No object exists at the given media path.
    #[error("media object not found: {0}")]
    NotFound(String),

    /// The media path is malformed or escapes the store root.
    #[error("invalid media path: {0}")]
    InvalidPath(String),

    /// The object is larger than the configured limit.
    #[error("object of {actual} bytes exceeds size limit of {limit} bytes")]
    SizeLimitExceeded { actual: u64, limit: u64 },

    /// Underlying filesystem error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
