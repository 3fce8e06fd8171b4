//! Resolving identifier paths into listings.
//!
//! Browsing never mutates the tree, so any number of queries can run at
//! once against a published [`Directory`].

use std::cmp::Ordering;

use folio_store::TrackStore;
use folio_types::{AlbumSummary, Breadcrumb, Listing, NameId, TrackSummary};

use crate::directory::Directory;
use crate::error::{IndexError, IndexResult};

/// Follow `path` from `root` through child directories.
///
/// Returns the directory reached and one breadcrumb per consumed segment.
/// Only directories are searched; an identifier naming a track in an
/// intermediate or final position does not resolve.
pub fn resolve<'a>(
    root: &'a Directory,
    path: &[NameId],
) -> IndexResult<(&'a Directory, Vec<Breadcrumb>)> {
    let mut node = root;
    let mut parents = Vec::with_capacity(path.len());
    for (position, id) in path.iter().enumerate() {
        node = node
            .directory(id)
            .ok_or_else(|| IndexError::SegmentNotFound {
                position,
                id: id.to_string(),
            })?;
        parents.push(Breadcrumb {
            id: id.clone(),
            title: node.title().to_string(),
        });
    }
    Ok((node, parents))
}

/// Build the listing of the directory at `path`.
///
/// Child directories and tracks are ordered by title, ties broken by
/// identifier. Track durations come from `store`, zero when unknown.
pub fn browse(root: &Directory, path: &[NameId], store: &dyn TrackStore) -> IndexResult<Listing> {
    let (node, parents) = resolve(root, path)?;

    let mut albums: Vec<AlbumSummary> = node
        .directories()
        .map(|(id, dir)| AlbumSummary {
            id: id.clone(),
            title: dir.title().to_string(),
        })
        .collect();
    albums.sort_by(|a, b| by_title(&a.title, &a.id, &b.title, &b.id));

    let mut tracks: Vec<TrackSummary> = node
        .tracks()
        .map(|(id, track)| TrackSummary {
            id: id.clone(),
            title: track.title.clone(),
            file_hash: track.file_hash,
            duration: store.duration_secs(&track.file_hash),
        })
        .collect();
    tracks.sort_by(|a, b| by_title(&a.title, &a.id, &b.title, &b.id));

    Ok(Listing {
        title: node.title().to_string(),
        parents,
        albums,
        tracks,
    })
}

fn by_title(a_title: &str, a_id: &NameId, b_title: &str, b_id: &NameId) -> Ordering {
    a_title.cmp(b_title).then_with(|| a_id.cmp(b_id))
}
