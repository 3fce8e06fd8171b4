use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use tracing::debug;

use folio_types::ContentId;

use crate::error::{StoreError, StoreResult};
use crate::record::StoredTrack;
use crate::traits::TrackStore;

#[derive(Clone, Debug)]
struct Entry {
    path: PathBuf,
    duration: Option<Duration>,
}

/// In-memory, HashMap-based track store.
///
/// Intended for tests and embedding. Durations are supplied by the embedding
/// application through [`set_duration`](Self::set_duration); a new track set
/// keeps the durations of tracks whose content is unchanged.
pub struct InMemoryTrackStore {
    tracks: RwLock<HashMap<ContentId, Entry>>,
}

impl InMemoryTrackStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            tracks: RwLock::new(HashMap::new()),
        }
    }

    /// Number of tracks currently known.
    pub fn len(&self) -> usize {
        self.tracks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` if the store knows no tracks.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Record the duration of a known track.
    pub fn set_duration(&self, id: &ContentId, duration: Duration) -> StoreResult<()> {
        let mut map = self
            .tracks
            .write()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        let entry = map.get_mut(id).ok_or(StoreError::UnknownTrack(*id))?;
        entry.duration = Some(duration);
        Ok(())
    }

    /// All known tracks, sorted by content hash.
    pub fn tracks(&self) -> Vec<StoredTrack> {
        let map = self.tracks.read().unwrap_or_else(PoisonError::into_inner);
        let mut tracks: Vec<StoredTrack> = map
            .iter()
            .map(|(id, entry)| StoredTrack::new(*id, entry.path.clone()))
            .collect();
        tracks.sort_by(|a, b| a.id.cmp(&b.id));
        tracks
    }

    /// Look up a track's source path.
    pub fn path(&self, id: &ContentId) -> Option<PathBuf> {
        let map = self.tracks.read().unwrap_or_else(PoisonError::into_inner);
        map.get(id).map(|entry| entry.path.clone())
    }
}

impl Default for InMemoryTrackStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TrackStore for InMemoryTrackStore {
    fn set_tracks(&self, tracks: Vec<StoredTrack>) -> StoreResult<()> {
        let mut map = self
            .tracks
            .write()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        let mut next = HashMap::with_capacity(tracks.len());
        for track in tracks {
            let duration = map.get(&track.id).and_then(|e| e.duration);
            next.insert(
                track.id,
                Entry {
                    path: track.path,
                    duration,
                },
            );
        }
        debug!(previous = map.len(), current = next.len(), "track set replaced");
        *map = next;
        Ok(())
    }

    fn duration(&self, id: &ContentId) -> Option<Duration> {
        let map = self.tracks.read().unwrap_or_else(PoisonError::into_inner);
        map.get(id).and_then(|entry| entry.duration)
    }
}

impl std::fmt::Debug for InMemoryTrackStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryTrackStore")
            .field("track_count", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cid(b: u8) -> ContentId {
        ContentId::from_hash([b; 32])
    }

    #[test]
    fn new_store_is_empty() {
        let store = InMemoryTrackStore::new();
        assert!(store.is_empty());
        assert!(store.tracks().is_empty());
    }

    #[test]
    fn set_tracks_replaces_track_set() {
        let store = InMemoryTrackStore::new();
        store
            .set_tracks(vec![
                StoredTrack::new(cid(1), "/music/a.mp3"),
                StoredTrack::new(cid(2), "/music/b.mp3"),
            ])
            .unwrap();
        assert_eq!(store.len(), 2);

        store
            .set_tracks(vec![StoredTrack::new(cid(3), "/music/c.mp3")])
            .unwrap();
        assert_eq!(store.len(), 1);
        assert!(store.path(&cid(1)).is_none());
        assert_eq!(store.path(&cid(3)).unwrap(), PathBuf::from("/music/c.mp3"));
    }

    #[test]
    fn unknown_track_has_no_duration() {
        let store = InMemoryTrackStore::new();
        assert_eq!(store.duration(&cid(9)), None);
        assert_eq!(store.duration_secs(&cid(9)), 0.0);
    }

    #[test]
    fn set_duration_on_known_track() {
        let store = InMemoryTrackStore::new();
        store
            .set_tracks(vec![StoredTrack::new(cid(1), "/music/a.mp3")])
            .unwrap();
        store
            .set_duration(&cid(1), Duration::from_millis(2500))
            .unwrap();
        assert_eq!(store.duration_secs(&cid(1)), 2.5);
    }

    #[test]
    fn set_duration_on_unknown_track_fails() {
        let store = InMemoryTrackStore::new();
        let result = store.set_duration(&cid(4), Duration::from_secs(1));
        assert!(matches!(result, Err(StoreError::UnknownTrack(id)) if id == cid(4)));
    }

    #[test]
    fn durations_survive_a_new_track_set() {
        let store = InMemoryTrackStore::new();
        store
            .set_tracks(vec![StoredTrack::new(cid(1), "/music/a.mp3")])
            .unwrap();
        store.set_duration(&cid(1), Duration::from_secs(60)).unwrap();

        // Same content moved to a new path.
        store
            .set_tracks(vec![
                StoredTrack::new(cid(1), "/music/moved/a.mp3"),
                StoredTrack::new(cid(2), "/music/b.mp3"),
            ])
            .unwrap();
        assert_eq!(store.duration(&cid(1)), Some(Duration::from_secs(60)));
        assert_eq!(store.duration(&cid(2)), None);
        assert_eq!(
            store.path(&cid(1)).unwrap(),
            PathBuf::from("/music/moved/a.mp3")
        );
    }

    #[test]
    fn tracks_are_sorted_by_content_hash() {
        let store = InMemoryTrackStore::new();
        store
            .set_tracks(vec![
                StoredTrack::new(cid(5), "/e"),
                StoredTrack::new(cid(1), "/a"),
                StoredTrack::new(cid(3), "/c"),
            ])
            .unwrap();
        let ids: Vec<ContentId> = store.tracks().into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![cid(1), cid(3), cid(5)]);
    }

    #[test]
    fn stored_track_json_shape() {
        let track = StoredTrack::new(cid(0), "/music/a.mp3");
        let value = serde_json::to_value(&track).unwrap();
        assert_eq!(value["id"], "0".repeat(64));
        assert_eq!(value["path"], "/music/a.mp3");
    }

    #[test]
    fn store_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<InMemoryTrackStore>();
    }
}
