//! Error types for the index crate.

use std::path::PathBuf;

use folio_crypto::HasherError;
use folio_types::NameId;

/// Errors that can occur while building or browsing the library index.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// The library root could not be inspected.
    #[error("cannot read library root {path}: {source}")]
    RootUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The library root exists but is not a directory.
    #[error("library root is not a directory: {0}")]
    NotADirectory(PathBuf),

    /// The directory traversal failed part way through.
    #[error("walk failed: {0}")]
    Walk(#[from] walkdir::Error),

    /// The walk yielded a path that does not lie under the library root.
    #[error("path {path} is outside library root {root}")]
    OutsideRoot { path: PathBuf, root: PathBuf },

    /// A file could not be opened or hashed.
    #[error("could not index file {path}: {source}")]
    Track {
        path: PathBuf,
        #[source]
        source: HasherError,
    },

    /// Two different names derived the same identifier in one directory.
    #[error("identifier {id} in '{parent}' claimed by both '{existing}' and '{incoming}'")]
    IdCollision {
        id: NameId,
        parent: String,
        existing: String,
        incoming: String,
    },

    /// A browse path segment does not name a child directory.
    #[error("subdirectory '{id}' not found at path position {position}")]
    SegmentNotFound { position: usize, id: String },

    /// Handing the track set to the metadata store failed.
    #[error("store error: {0}")]
    Store(#[from] folio_store::StoreError),

    /// The index configuration is invalid or could not be loaded.
    #[error("configuration error: {0}")]
    Config(String),
}

impl IndexError {
    /// Returns `true` for a browse path that does not resolve.
    ///
    /// This is an expected outcome for stale or mistyped paths, not a fault.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::SegmentNotFound { .. })
    }
}

/// Convenience alias for index results.
pub type IndexResult<T> = Result<T, IndexError>;
