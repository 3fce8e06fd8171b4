use std::time::Duration;

use folio_types::ContentId;

use crate::error::StoreResult;
use crate::record::StoredTrack;

/// Metadata store consulted by the indexer and the browse resolver.
///
/// All implementations must satisfy these invariants:
/// - `set_tracks` replaces the known track set wholesale; it is called once
///   per successful index build.
/// - `duration` never fails; an unknown track simply has no duration.
/// - Implementations are shared between threads and must be `Send + Sync`.
pub trait TrackStore: Send + Sync {
    /// Receive the flattened track set produced by an index build.
    fn set_tracks(&self, tracks: Vec<StoredTrack>) -> StoreResult<()>;

    /// Duration of the track with the given content hash, if known.
    fn duration(&self, id: &ContentId) -> Option<Duration>;

    /// Duration in seconds, `0.0` when unknown.
    fn duration_secs(&self, id: &ContentId) -> f64 {
        self.duration(id).map(|d| d.as_secs_f64()).unwrap_or(0.0)
    }
}
