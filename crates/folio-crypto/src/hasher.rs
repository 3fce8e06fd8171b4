use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use folio_types::{ContentId, NameId, TypeError, DEFAULT_NAME_ID_LEN};

/// BLAKE3 identifier deriver.
///
/// Name identifiers are the BLAKE3 digest of a UTF-8 name rendered as
/// lowercase hex and truncated to `name_len` characters. Content identifiers
/// are the untruncated BLAKE3 digest of a byte stream, so they match what
/// `b3sum` prints for the same file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IdHasher {
    name_len: usize,
}

impl IdHasher {
    /// Create a hasher producing name identifiers of `name_len` hex characters.
    pub fn new(name_len: usize) -> Result<Self, HasherError> {
        NameId::check_len(name_len)?;
        Ok(Self { name_len })
    }

    /// Length of the name identifiers this hasher produces.
    pub fn name_len(&self) -> usize {
        self.name_len
    }

    /// Derive the identifier of a directory or file name.
    pub fn name_id(&self, name: &str) -> NameId {
        NameId::from_digest(blake3::hash(name.as_bytes()).as_bytes(), self.name_len)
    }

    /// Derive the content identifier of everything `reader` yields.
    pub fn content_id<R: Read>(&self, mut reader: R) -> Result<ContentId, HasherError> {
        let mut hasher = blake3::Hasher::new();
        io::copy(&mut reader, &mut hasher)?;
        Ok(ContentId::from_hash(*hasher.finalize().as_bytes()))
    }

    /// Open `path` and derive the content identifier of its bytes.
    pub fn content_id_of_file(&self, path: &Path) -> Result<ContentId, HasherError> {
        let file = File::open(path)?;
        self.content_id(io::BufReader::new(file))
    }
}

impl Default for IdHasher {
    fn default() -> Self {
        Self {
            name_len: DEFAULT_NAME_ID_LEN,
        }
    }
}

/// Errors from hashing operations.
#[derive(Debug, thiserror::Error)]
pub enum HasherError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    InvalidIdLength(#[from] TypeError),
}
