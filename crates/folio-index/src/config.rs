//! Index configuration.
//!
//! File format: TOML. Every field has a default, so an empty file (or no
//! file) yields a usable configuration rooted at the current directory.
//!
//! ```toml
//! root = "/srv/music"
//! root_title = "Folio"
//! id_length = 20
//! collision = "overwrite"
//! parallel = true
//! extensions = ["mp3", "flac"]
//! include_hidden = false
//! follow_links = false
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use folio_crypto::IdHasher;
use folio_types::{NameId, DEFAULT_NAME_ID_LEN};

use crate::error::{IndexError, IndexResult};

/// Title given to the synthetic root directory unless configured otherwise.
pub const DEFAULT_ROOT_TITLE: &str = "Folio";

/// What to do when two different names derive the same identifier within
/// one directory.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// Keep going: a later file replaces the earlier one, and directories
    /// merge into whichever was created first. Each collision is logged.
    #[default]
    Overwrite,
    /// Fail the build with [`IndexError::IdCollision`].
    Reject,
}

/// Configuration for building a library index.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Directory to scan.
    pub root: PathBuf,
    /// Title of the synthetic root directory.
    pub root_title: String,
    /// Length of name identifiers in hex characters (8..=64).
    pub id_length: usize,
    /// Handling of truncated-identifier collisions.
    pub collision: CollisionPolicy,
    /// Hash files on a thread pool instead of one at a time.
    pub parallel: bool,
    /// File extensions to index, without the dot. Empty indexes every file.
    pub extensions: Vec<String>,
    /// Index files and directories whose name starts with a dot.
    pub include_hidden: bool,
    /// Descend into symbolic links to directories. Links to files are
    /// indexed either way.
    pub follow_links: bool,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            root_title: DEFAULT_ROOT_TITLE.to_string(),
            id_length: DEFAULT_NAME_ID_LEN,
            collision: CollisionPolicy::default(),
            parallel: false,
            extensions: Vec::new(),
            include_hidden: true,
            follow_links: false,
        }
    }
}

impl IndexConfig {
    /// Default configuration scanning `root`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Default::default()
        }
    }

    /// Parse a configuration from TOML text and validate it.
    pub fn from_toml_str(text: &str) -> IndexResult<Self> {
        let config: Self = toml::from_str(text).map_err(|e| IndexError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML configuration file.
    pub fn load(path: &Path) -> IndexResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| IndexError::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Check the configuration for values the indexer cannot work with.
    pub fn validate(&self) -> IndexResult<()> {
        NameId::check_len(self.id_length).map_err(|e| IndexError::Config(e.to_string()))?;
        if self.root_title.is_empty() {
            return Err(IndexError::Config("root_title must not be empty".into()));
        }
        if let Some(bad) = self.extensions.iter().find(|e| e.trim_start_matches('.').is_empty()) {
            return Err(IndexError::Config(format!("invalid extension: '{bad}'")));
        }
        Ok(())
    }

    /// The identifier deriver matching this configuration.
    pub fn hasher(&self) -> IndexResult<IdHasher> {
        IdHasher::new(self.id_length).map_err(|e| IndexError::Config(e.to_string()))
    }

    /// Whether a file with this name should be indexed.
    pub fn accepts_file(&self, file_name: &str) -> bool {
        if !self.include_hidden && is_hidden(file_name) {
            return false;
        }
        if self.extensions.is_empty() {
            return true;
        }
        let Some((_, ext)) = file_name.rsplit_once('.') else {
            return false;
        };
        self.extensions
            .iter()
            .any(|e| e.trim_start_matches('.').eq_ignore_ascii_case(ext))
    }

    /// Whether the walk should descend into a directory with this name.
    pub fn accepts_dir(&self, dir_name: &str) -> bool {
        self.include_hidden || !is_hidden(dir_name)
    }
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}
