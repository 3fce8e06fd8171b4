//! In-memory directory tree.
//!
//! A [`Directory`] owns its children outright, so the graph is a tree by
//! construction: no cycles, one parent per node. Children are kept in hash
//! maps keyed by name identifier; ordering is a query-time concern.

use std::collections::HashMap;

use folio_types::NameId;

use crate::track::Track;

/// One directory of the library, or the synthetic root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Directory {
    pub(crate) title: String,
    pub(crate) directories: HashMap<NameId, Directory>,
    pub(crate) tracks: HashMap<NameId, Track>,
}

impl Directory {
    /// Create an empty directory.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            directories: HashMap::new(),
            tracks: HashMap::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Child directory with the given identifier.
    pub fn directory(&self, id: &NameId) -> Option<&Directory> {
        self.directories.get(id)
    }

    /// Track in this directory with the given identifier.
    pub fn track(&self, id: &NameId) -> Option<&Track> {
        self.tracks.get(id)
    }

    /// Immediate child directories, in no particular order.
    pub fn directories(&self) -> impl Iterator<Item = (&NameId, &Directory)> {
        self.directories.iter()
    }

    /// Tracks directly in this directory, in no particular order.
    pub fn tracks(&self) -> impl Iterator<Item = (&NameId, &Track)> {
        self.tracks.iter()
    }

    /// Returns `true` if the directory has no children.
    pub fn is_empty(&self) -> bool {
        self.directories.is_empty() && self.tracks.is_empty()
    }

    /// Every track in this directory and all directories below it.
    ///
    /// The iterator is lazy and walks the tree depth first with an explicit
    /// stack; it can be restarted at any time by calling this again.
    pub fn walk_tracks(&self) -> WalkTracks<'_> {
        WalkTracks {
            stack: vec![self],
            current: None,
        }
    }

    /// Number of directories below this one, not counting itself.
    pub fn directory_count(&self) -> usize {
        self.directories
            .values()
            .map(|d| 1 + d.directory_count())
            .sum()
    }

    /// Number of tracks in this directory and below.
    pub fn track_count(&self) -> usize {
        self.walk_tracks().count()
    }
}

/// Iterator returned by [`Directory::walk_tracks`].
pub struct WalkTracks<'a> {
    stack: Vec<&'a Directory>,
    current: Option<std::collections::hash_map::Values<'a, NameId, Track>>,
}

impl<'a> Iterator for WalkTracks<'a> {
    type Item = &'a Track;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(track) = self.current.as_mut().and_then(Iterator::next) {
                return Some(track);
            }
            let dir = self.stack.pop()?;
            self.stack.extend(dir.directories.values());
            self.current = Some(dir.tracks.values());
        }
    }
}
