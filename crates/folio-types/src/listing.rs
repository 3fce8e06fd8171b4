//! Browse query results.
//!
//! A [`Listing`] is a transient projection of one directory. It is assembled
//! per query and never stored.

use serde::{Deserialize, Serialize};

use crate::id::{ContentId, NameId};

/// One ancestor on the path from the root to a listed directory.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breadcrumb {
    pub id: NameId,
    pub title: String,
}

/// A child directory as shown in a listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumSummary {
    pub id: NameId,
    pub title: String,
}

/// A child track as shown in a listing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackSummary {
    pub id: NameId,
    pub title: String,
    pub file_hash: ContentId,
    /// Duration in seconds as reported by the metadata store, `0.0` if unknown.
    pub duration: f64,
}

/// The contents of one directory, with its ancestry.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    /// Title of the listed directory.
    pub title: String,
    /// Ancestors in root-to-directory order. The root itself is never included;
    /// the last entry, when present, is the listed directory.
    pub parents: Vec<Breadcrumb>,
    /// Child directories, ordered by title then id.
    pub albums: Vec<AlbumSummary>,
    /// Child tracks, ordered by title then id.
    pub tracks: Vec<TrackSummary>,
}

impl Listing {
    /// Returns `true` if the listed directory has no children at all.
    pub fn is_empty(&self) -> bool {
        self.albums.is_empty() && self.tracks.is_empty()
    }

    /// Find a child directory by title.
    pub fn album(&self, title: &str) -> Option<&AlbumSummary> {
        self.albums.iter().find(|a| a.title == title)
    }

    /// Find a child track by title.
    pub fn track(&self, title: &str) -> Option<&TrackSummary> {
        self.tracks.iter().find(|t| t.title == title)
    }
}
