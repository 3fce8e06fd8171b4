//! Per-file records of the library tree.

use std::path::{Path, PathBuf};

use folio_crypto::IdHasher;
use folio_types::ContentId;

use crate::error::{IndexError, IndexResult};

/// One indexed file.
///
/// Created once per matching file during a scan and never modified. Within
/// its directory a track is keyed by the name identifier of `file_name`;
/// the metadata store knows it by `file_hash`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Track {
    /// File name with its last extension removed.
    pub title: String,
    /// File name as found on disk.
    pub file_name: String,
    /// Hash of the file's bytes.
    pub file_hash: ContentId,
    /// Location of the file at scan time.
    pub path: PathBuf,
}

impl Track {
    /// Build a track from an already hashed file.
    pub fn new(file_name: impl Into<String>, file_hash: ContentId, path: impl Into<PathBuf>) -> Self {
        let file_name = file_name.into();
        Self {
            title: title_from_file_name(&file_name).to_string(),
            file_name,
            file_hash,
            path: path.into(),
        }
    }

    /// Read and hash the file at `path`.
    pub fn from_path(path: &Path, hasher: &IdHasher) -> IndexResult<Self> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let file_hash = hasher
            .content_id_of_file(path)
            .map_err(|source| IndexError::Track {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self::new(file_name, file_hash, path))
    }
}

/// Strip the last extension from a file name.
///
/// A leading dot does not start an extension, so `".gitignore"` keeps its
/// name while `"archive.tar.gz"` becomes `"archive.tar"`.
pub fn title_from_file_name(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(i) if i > 0 => &file_name[..i],
        _ => file_name,
    }
}
