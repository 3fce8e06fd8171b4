//! Track metadata store boundary for Folio.
//!
//! The indexer hands the flattened, deduplicated set of tracks to a store
//! after every successful build, and the browse resolver asks the store for
//! each listed track's duration. What a store does with the track set
//! (probing durations, persisting play counts) is its own business.
//!
//! # Storage Backends
//!
//! All backends implement the [`TrackStore`] trait:
//!
//! - [`InMemoryTrackStore`] -- `HashMap`-based store for tests and embedding
//!
//! # Design Rules
//!
//! 1. Tracks are keyed by [`ContentId`](folio_types::ContentId); byte-identical
//!    files are one logical track.
//! 2. Duration lookups never fail: an unknown track has no duration.
//! 3. Concurrent reads are always safe.

pub mod error;
pub mod memory;
pub mod record;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use memory::InMemoryTrackStore;
pub use record::StoredTrack;
pub use traits::TrackStore;
