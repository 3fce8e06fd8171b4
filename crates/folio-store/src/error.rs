use folio_types::ContentId;

/// Errors from track store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The referenced track was never handed to the store.
    #[error("unknown track: {0}")]
    UnknownTrack(ContentId),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A lock guarding store state was poisoned by a panicking writer.
    #[error("lock poisoned: {0}")]
    LockPoisoned(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
