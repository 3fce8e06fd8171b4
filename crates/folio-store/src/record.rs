use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use folio_types::ContentId;

/// A track as handed to the metadata store.
///
/// One `StoredTrack` exists per distinct file content; when several files
/// share content only one of their paths is kept.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoredTrack {
    /// Content hash of the file, the store's lookup key.
    pub id: ContentId,
    /// Where the file was found during the scan.
    pub path: PathBuf,
}

impl StoredTrack {
    pub fn new(id: ContentId, path: impl Into<PathBuf>) -> Self {
        Self {
            id,
            path: path.into(),
        }
    }
}
