//! Scanning a library root into a [`Directory`] tree.
//!
//! A build walks the root once, hashes every accepted file, and assembles
//! the tree on a [`BuildContext`] owned by the build. Nothing is shared
//! until the build returns: on error the context is dropped and no partial
//! tree escapes.

use std::collections::hash_map::Entry;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use folio_crypto::IdHasher;
use folio_store::StoredTrack;
use folio_types::{ContentId, NameId};

use crate::config::{CollisionPolicy, IndexConfig};
use crate::directory::Directory;
use crate::error::{IndexError, IndexResult};
use crate::track::Track;

/// In-progress tree of a single build.
///
/// The context is the only writer of the tree it owns. Directories are
/// resolved segment by segment and created on first sight; see
/// [`resolve_or_create`](Self::resolve_or_create).
#[derive(Debug)]
pub struct BuildContext {
    root: Directory,
    hasher: IdHasher,
    policy: CollisionPolicy,
    directories: usize,
    collisions: usize,
}

impl BuildContext {
    /// Start a build with an empty root titled `root_title`.
    pub fn new(root_title: impl Into<String>, hasher: IdHasher, policy: CollisionPolicy) -> Self {
        Self {
            root: Directory::new(root_title),
            hasher,
            policy,
            directories: 0,
            collisions: 0,
        }
    }

    /// Walk `segments` down from the root, creating missing directories.
    ///
    /// A directory whose identifier is already present at a level is reused.
    /// If that directory carries a different name the identifiers collided,
    /// and the configured [`CollisionPolicy`] decides what happens.
    pub fn resolve_or_create(&mut self, segments: &[String]) -> IndexResult<&mut Directory> {
        let Self {
            root,
            hasher,
            policy,
            directories,
            collisions,
        } = self;
        resolve(root, hasher, *policy, directories, collisions, segments)
    }

    /// Insert `track` into the directory named by `segments`.
    ///
    /// The track is keyed by the identifier of its file name; an existing
    /// track under that identifier is replaced.
    pub fn insert_track(&mut self, segments: &[String], track: Track) -> IndexResult<()> {
        let Self {
            root,
            hasher,
            policy,
            directories,
            collisions,
        } = self;
        let dir = resolve(root, hasher, *policy, directories, collisions, segments)?;
        let id = hasher.name_id(&track.file_name);
        if let Some(existing) = dir.tracks.get(&id) {
            if existing.file_name != track.file_name {
                on_collision(
                    *policy,
                    collisions,
                    &id,
                    segments,
                    &existing.file_name,
                    &track.file_name,
                )?;
            }
        }
        dir.tracks.insert(id, track);
        Ok(())
    }

    /// Number of directories created so far, not counting the root.
    pub fn directory_count(&self) -> usize {
        self.directories
    }

    /// Number of tracks in the tree so far.
    pub fn track_count(&self) -> usize {
        self.root.track_count()
    }

    /// Number of identifier collisions tolerated so far.
    pub fn collision_count(&self) -> usize {
        self.collisions
    }

    /// Finish the build and hand over the tree.
    pub fn finish(self) -> Directory {
        self.root
    }
}

fn resolve<'a>(
    root: &'a mut Directory,
    hasher: &IdHasher,
    policy: CollisionPolicy,
    directories: &mut usize,
    collisions: &mut usize,
    segments: &[String],
) -> IndexResult<&'a mut Directory> {
    let mut dir = root;
    for (depth, segment) in segments.iter().enumerate() {
        dir = match dir.directories.entry(hasher.name_id(segment)) {
            Entry::Occupied(entry) => {
                if entry.get().title != *segment {
                    on_collision(
                        policy,
                        collisions,
                        entry.key(),
                        &segments[..depth],
                        &entry.get().title,
                        segment,
                    )?;
                }
                entry.into_mut()
            }
            Entry::Vacant(entry) => {
                *directories += 1;
                entry.insert(Directory::new(segment.as_str()))
            }
        };
    }
    Ok(dir)
}

fn on_collision(
    policy: CollisionPolicy,
    collisions: &mut usize,
    id: &NameId,
    parent: &[String],
    existing: &str,
    incoming: &str,
) -> IndexResult<()> {
    let parent = format!("/{}", parent.join("/"));
    match policy {
        CollisionPolicy::Reject => Err(IndexError::IdCollision {
            id: id.clone(),
            parent,
            existing: existing.to_string(),
            incoming: incoming.to_string(),
        }),
        CollisionPolicy::Overwrite => {
            *collisions += 1;
            warn!(%id, %parent, existing, incoming, "identifier collision");
            Ok(())
        }
    }
}

/// Builds a library tree from an [`IndexConfig`].
pub struct IndexBuilder<'a> {
    config: &'a IndexConfig,
    hasher: IdHasher,
}

impl<'a> IndexBuilder<'a> {
    /// Validate `config` and prepare a builder for it.
    pub fn new(config: &'a IndexConfig) -> IndexResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            hasher: config.hasher()?,
        })
    }

    /// Scan the configured root and return the complete tree.
    ///
    /// Any unreadable directory or file fails the whole build.
    pub fn build(&self) -> IndexResult<Directory> {
        let started = Instant::now();
        let root = &self.config.root;
        info!(root = %root.display(), parallel = self.config.parallel, "indexing library");

        let files = self.collect_files()?;
        let tracks = self.hash_files(&files)?;

        let mut ctx = BuildContext::new(
            self.config.root_title.as_str(),
            self.hasher,
            self.config.collision,
        );
        for track in tracks {
            let segments = dir_segments(root, &track.path)?;
            debug!(name = %track.file_name, path = %track.path.display(), "file");
            ctx.insert_track(&segments, track)?;
        }

        info!(
            root = %root.display(),
            directories = ctx.directory_count(),
            files = files.len(),
            tracks = ctx.track_count(),
            collisions = ctx.collision_count(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "library indexed"
        );
        Ok(ctx.finish())
    }

    /// Every accepted file under the root, in file-name order.
    ///
    /// Symbolic links to files are indexed through the link. Links to
    /// directories are only descended when `follow_links` is set.
    fn collect_files(&self) -> IndexResult<Vec<PathBuf>> {
        let root = &self.config.root;
        let meta = fs::metadata(root).map_err(|source| IndexError::RootUnreadable {
            path: root.clone(),
            source,
        })?;
        if !meta.is_dir() {
            return Err(IndexError::NotADirectory(root.clone()));
        }

        let walker = WalkDir::new(root)
            .follow_links(self.config.follow_links)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                e.depth() == 0
                    || !e.file_type().is_dir()
                    || self.config.accepts_dir(&e.file_name().to_string_lossy())
            });

        let mut files = Vec::new();
        for entry in walker {
            let entry = entry?;
            // Unfollowed links are still indexed when they point at a file.
            let is_file = entry.file_type().is_file()
                || (entry.path_is_symlink() && entry.path().is_file());
            if !is_file {
                continue;
            }
            if self.config.accepts_file(&entry.file_name().to_string_lossy()) {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }

    fn hash_files(&self, files: &[PathBuf]) -> IndexResult<Vec<Track>> {
        if self.config.parallel {
            files
                .par_iter()
                .map(|path| Track::from_path(path, &self.hasher))
                .collect()
        } else {
            files
                .iter()
                .map(|path| Track::from_path(path, &self.hasher))
                .collect()
        }
    }
}

/// Directory names between `root` and the file at `path`.
fn dir_segments(root: &Path, path: &Path) -> IndexResult<Vec<String>> {
    let relative = path
        .strip_prefix(root)
        .map_err(|_| IndexError::OutsideRoot {
            path: path.to_path_buf(),
            root: root.to_path_buf(),
        })?;
    let Some(parent) = relative.parent() else {
        return Ok(Vec::new());
    };
    Ok(parent
        .components()
        .filter_map(|c| match c {
            Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect())
}

/// Every distinct file content in the tree, ordered by content hash.
///
/// Byte-identical files collapse to one entry carrying the smallest of
/// their paths, so the result does not depend on traversal order.
pub fn flatten(root: &Directory) -> Vec<StoredTrack> {
    root.walk_tracks()
        .fold(BTreeMap::<ContentId, &Path>::new(), |mut unique, track| {
            unique
                .entry(track.file_hash)
                .and_modify(|path| {
                    if track.path.as_path() < *path {
                        *path = track.path.as_path();
                    }
                })
                .or_insert(track.path.as_path());
            unique
        })
        .into_iter()
        .map(|(id, path)| StoredTrack::new(id, path))
        .collect()
}
