//! The published library index.
//!
//! [`Library`] owns the most recent successfully built tree behind an
//! `Arc`. Readers take a snapshot of that `Arc` and browse it without
//! holding any lock; a rescan builds a complete new tree off to the side and
//! swaps it in only when the build succeeds. Rescans run one at a time, so
//! the store always holds the track set of the published tree.

use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use tracing::info;

use folio_crypto::IdHasher;
use folio_store::{StoredTrack, TrackStore};
use folio_types::{Listing, NameId};

use crate::browse;
use crate::builder::{flatten, IndexBuilder};
use crate::config::IndexConfig;
use crate::directory::Directory;
use crate::error::{IndexError, IndexResult};

/// A scanned library, ready for browse queries.
pub struct Library {
    config: IndexConfig,
    hasher: IdHasher,
    store: Arc<dyn TrackStore>,
    root: RwLock<Arc<Directory>>,
    rescan_lock: Mutex<()>,
}

impl std::fmt::Debug for Library {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let root = self.snapshot();
        f.debug_struct("Library")
            .field("root", &self.config.root)
            .field("directories", &root.directory_count())
            .field("tracks", &root.track_count())
            .finish()
    }
}

impl Library {
    /// Scan the configured root and publish the result.
    ///
    /// Fails without producing a library if any part of the scan fails or
    /// the store rejects the track set.
    pub fn open(config: IndexConfig, store: Arc<dyn TrackStore>) -> IndexResult<Self> {
        let hasher = config.hasher()?;
        let root = Self::scan(&config, store.as_ref())?;
        Ok(Self {
            config,
            hasher,
            store,
            root: RwLock::new(Arc::new(root)),
            rescan_lock: Mutex::new(()),
        })
    }

    /// Scan the root again and replace the published tree.
    ///
    /// On failure the previously published tree stays in place. Concurrent
    /// calls are serialized across the store handoff and the swap.
    pub fn rescan(&self) -> IndexResult<()> {
        let _running = self.rescan_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let root = Self::scan(&self.config, self.store.as_ref())?;
        *self.root.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(root);
        info!(root = %self.config.root.display(), "library republished");
        Ok(())
    }

    fn scan(config: &IndexConfig, store: &dyn TrackStore) -> IndexResult<Directory> {
        let root = IndexBuilder::new(config)?.build()?;
        let tracks = flatten(&root);
        info!(unique = tracks.len(), "handing track set to store");
        store.set_tracks(tracks)?;
        Ok(root)
    }

    /// The currently published tree.
    pub fn snapshot(&self) -> Arc<Directory> {
        Arc::clone(&self.root.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// List the directory reached by following `path` from the root.
    ///
    /// An empty path lists the root itself.
    pub fn browse(&self, path: &[NameId]) -> IndexResult<Listing> {
        let root = self.snapshot();
        browse::browse(&root, path, self.store.as_ref())
    }

    /// Like [`browse`](Self::browse), for identifiers received as text.
    ///
    /// A malformed identifier cannot name anything in the tree and is
    /// reported as not found at its position.
    pub fn browse_str<S: AsRef<str>>(&self, path: &[S]) -> IndexResult<Listing> {
        let ids = path
            .iter()
            .enumerate()
            .map(|(position, s)| {
                NameId::parse(s.as_ref()).map_err(|_| IndexError::SegmentNotFound {
                    position,
                    id: s.as_ref().to_string(),
                })
            })
            .collect::<IndexResult<Vec<_>>>()?;
        self.browse(&ids)
    }

    /// Every distinct track of the published tree, as handed to the store.
    pub fn tracks(&self) -> Vec<StoredTrack> {
        flatten(&self.snapshot())
    }

    /// Identifier the library assigns to a directory or file name.
    pub fn name_id(&self, name: &str) -> NameId {
        self.hasher.name_id(name)
    }

    pub fn root_path(&self) -> &Path {
        &self.config.root
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    use folio_types::ContentId;

    use folio_store::InMemoryTrackStore;

    fn write(root: &Path, rel: &str, content: &[u8]) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn open(root: &Path) -> (Library, Arc<InMemoryTrackStore>) {
        let store = Arc::new(InMemoryTrackStore::new());
        let library = Library::open(IndexConfig::with_root(root), store.clone()).unwrap();
        (library, store)
    }

    /// Every directory reachable from `dir`, with the id path leading to it.
    fn all_paths(dir: &Directory, prefix: Vec<NameId>, out: &mut Vec<(Vec<NameId>, String)>) {
        out.push((prefix.clone(), dir.title().to_string()));
        for (id, child) in dir.directories() {
            let mut next = prefix.clone();
            next.push(id.clone());
            all_paths(child, next, out);
        }
    }

    #[test]
    fn rock_indie_scenario() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "Rock/Song.mp3", b"song");
        write(dir.path(), "Rock/Indie/Track.flac", b"track");
        let (library, _store) = open(dir.path());
        let rock = library.name_id("Rock");
        let indie = library.name_id("Indie");

        let root = library.browse(&[]).unwrap();
        assert_eq!(root.title, "Folio");
        assert!(root.parents.is_empty());
        assert_eq!(root.albums.len(), 1);
        assert_eq!(root.albums[0].title, "Rock");
        assert_eq!(root.albums[0].id, rock);
        assert!(root.tracks.is_empty());

        let listing = library.browse(&[rock.clone()]).unwrap();
        assert_eq!(listing.title, "Rock");
        assert_eq!(listing.tracks.len(), 1);
        assert_eq!(listing.tracks[0].title, "Song");
        assert_eq!(listing.albums.len(), 1);
        assert_eq!(listing.albums[0].title, "Indie");
        assert_eq!(listing.parents.len(), 1);
        assert_eq!(listing.parents[0].id, rock);
        assert_eq!(listing.parents[0].title, "Rock");

        let listing = library.browse(&[rock.clone(), indie.clone()]).unwrap();
        assert_eq!(listing.title, "Indie");
        assert_eq!(listing.tracks.len(), 1);
        assert_eq!(listing.tracks[0].title, "Track");
        let crumbs: Vec<(NameId, &str)> = listing
            .parents
            .iter()
            .map(|p| (p.id.clone(), p.title.as_str()))
            .collect();
        assert_eq!(crumbs, vec![(rock, "Rock"), (indie, "Indie")]);
    }

    #[test]
    fn every_directory_round_trips_through_browse() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "A/B/C/deep.mp3", b"1");
        write(dir.path(), "A/B/mid.mp3", b"2");
        write(dir.path(), "A/top.mp3", b"3");
        write(dir.path(), "D/E/other.mp3", b"4");
        let (library, _store) = open(dir.path());

        let mut paths = Vec::new();
        all_paths(&library.snapshot(), Vec::new(), &mut paths);
        assert_eq!(paths.len(), 6);
        for (path, title) in paths {
            let listing = library.browse(&path).unwrap();
            assert_eq!(listing.title, title);
            assert_eq!(listing.parents.len(), path.len());
        }
    }

    #[test]
    fn identical_content_is_one_track_in_store() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "Rock/Song.mp3", b"same");
        write(dir.path(), "Pop/Song.mp3", b"same");
        let (library, store) = open(dir.path());

        assert_eq!(store.len(), 1);
        assert_eq!(library.tracks().len(), 1);
        let rock = library.browse(&[library.name_id("Rock")]).unwrap();
        let pop = library.browse(&[library.name_id("Pop")]).unwrap();
        assert_eq!(rock.tracks[0].file_hash, pop.tracks[0].file_hash);
    }

    #[test]
    fn durations_are_enriched_from_store() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "Rock/Song.mp3", b"song");
        let (library, store) = open(dir.path());
        let id = library.tracks()[0].id;
        store.set_duration(&id, Duration::from_secs(200)).unwrap();

        let listing = library.browse(&[library.name_id("Rock")]).unwrap();
        assert_eq!(listing.tracks[0].duration, 200.0);
    }

    #[test]
    fn browse_str_parses_identifiers() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "Rock/Song.mp3", b"song");
        let (library, _store) = open(dir.path());
        let rock = library.name_id("Rock").to_string();

        assert_eq!(library.browse_str(&[rock.as_str()]).unwrap().title, "Rock");
        let err = library.browse_str(&[rock.as_str(), "../../etc"]).unwrap_err();
        assert!(matches!(err, IndexError::SegmentNotFound { position: 1, .. }));
        assert!(library.browse_str::<&str>(&[]).is_ok());
    }

    #[test]
    fn open_fails_on_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(InMemoryTrackStore::new());
        let result = Library::open(IndexConfig::with_root(dir.path().join("missing")), store.clone());
        assert!(result.is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn rescan_publishes_new_tree() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "Rock/Song.mp3", b"song");
        let (library, store) = open(dir.path());
        let rock = library.name_id("Rock");
        let before = library.browse(&[rock.clone()]).unwrap();

        write(dir.path(), "Rock/New.mp3", b"new");
        library.rescan().unwrap();

        let after = library.browse(&[rock]).unwrap();
        assert_eq!(before.tracks.len(), 1);
        assert_eq!(after.tracks.len(), 2);
        // Existing identifiers survive the rescan.
        assert_eq!(after.track("Song").unwrap().id, before.tracks[0].id);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn failed_rescan_keeps_previous_tree() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("music");
        write(&root, "Rock/Song.mp3", b"song");
        let (library, store) = open(&root);
        let snapshot = library.snapshot();

        fs::remove_dir_all(&root).unwrap();
        assert!(library.rescan().is_err());

        assert!(Arc::ptr_eq(&snapshot, &library.snapshot()));
        assert_eq!(library.browse(&[library.name_id("Rock")]).unwrap().tracks.len(), 1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn snapshots_outlive_rescans() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "Rock/Song.mp3", b"song");
        let (library, _store) = open(dir.path());
        let old = library.snapshot();
        write(dir.path(), "Jazz/Tune.mp3", b"tune");
        library.rescan().unwrap();
        assert_eq!(old.directory_count(), 1);
        assert_eq!(library.snapshot().directory_count(), 2);
    }

    #[test]
    fn concurrent_browsing() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..20 {
            write(dir.path(), &format!("Album {i}/Track.mp3"), format!("{i}").as_bytes());
        }
        let (library, _store) = open(dir.path());
        let expected = library.browse(&[]).unwrap();
        thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    for _ in 0..50 {
                        assert_eq!(library.browse(&[]).unwrap(), expected);
                    }
                });
            }
            s.spawn(|| library.rescan().unwrap());
        });
        assert_eq!(library.browse(&[]).unwrap().albums.len(), 20);
    }

    /// Delegating store that records how many `set_tracks` calls overlap.
    #[derive(Default)]
    struct OverlapStore {
        inner: InMemoryTrackStore,
        active: AtomicUsize,
        max_active: AtomicUsize,
    }

    impl TrackStore for OverlapStore {
        fn set_tracks(&self, tracks: Vec<StoredTrack>) -> folio_store::StoreResult<()> {
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_active.fetch_max(now, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(5));
            let result = self.inner.set_tracks(tracks);
            self.active.fetch_sub(1, Ordering::SeqCst);
            result
        }

        fn duration(&self, id: &ContentId) -> Option<Duration> {
            self.inner.duration(id)
        }
    }

    #[test]
    fn concurrent_rescans_keep_store_in_step() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "Rock/Song.mp3", b"song");
        let store = Arc::new(OverlapStore::default());
        let library = Library::open(IndexConfig::with_root(dir.path()), store.clone()).unwrap();

        thread::scope(|s| {
            for i in 0..6 {
                let library = &library;
                let root = dir.path();
                s.spawn(move || {
                    write(root, &format!("Album {i}/Track.mp3"), format!("{i}").as_bytes());
                    library.rescan().unwrap();
                });
            }
        });

        assert_eq!(store.max_active.load(Ordering::SeqCst), 1);
        assert_eq!(store.inner.tracks(), library.tracks());
    }

    #[test]
    fn library_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Library>();
    }

    #[test]
    fn custom_root_title_and_id_length() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "Rock/Song.mp3", b"song");
        let config = IndexConfig {
            root_title: "Music".into(),
            id_length: 32,
            ..IndexConfig::with_root(dir.path())
        };
        let library = Library::open(config, Arc::new(InMemoryTrackStore::new())).unwrap();
        let listing = library.browse(&[]).unwrap();
        assert_eq!(listing.title, "Music");
        assert_eq!(listing.albums[0].id.len(), 32);
    }
}
