//! Library indexer for Folio.
//!
//! Scans a root directory once into an in-memory tree whose directories and
//! files are keyed by identifiers derived from their names, then answers
//! browse queries against that tree. Identifiers are pure functions of names,
//! so a path of identifiers stays valid across rescans as long as the names
//! on disk do not change.
//!
//! # Key Types
//!
//! - [`Library`] -- Published index; entry point for browse queries
//! - [`IndexBuilder`] -- Walks a root and builds a [`Directory`] tree
//! - [`BuildContext`] -- In-progress tree of one build (single writer)
//! - [`Directory`] -- A directory node with child directories and tracks
//! - [`Track`] -- One indexed file
//! - [`IndexConfig`] -- Root, identifier length, filters, collision policy

pub mod browse;
pub mod builder;
pub mod config;
pub mod directory;
pub mod error;
pub mod library;
pub mod track;

pub use builder::{flatten, BuildContext, IndexBuilder};
pub use config::{CollisionPolicy, IndexConfig, DEFAULT_ROOT_TITLE};
pub use directory::{Directory, WalkTracks};
pub use error::{IndexError, IndexResult};
pub use library::Library;
pub use track::{title_from_file_name, Track};
