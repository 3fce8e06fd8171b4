//! Foundation types for Folio.
//!
//! This crate provides the identifier and query-result types shared by every
//! other Folio crate.
//!
//! # Key Types
//!
//! - [`NameId`] -- Short identifier derived from a directory or file name
//! - [`ContentId`] -- Full-length content hash of a file's bytes
//! - [`Listing`] -- Projection of one directory returned by a browse query
//! - [`Breadcrumb`] -- Ancestor `(id, title)` pair inside a [`Listing`]

pub mod error;
pub mod id;
pub mod listing;

pub use error::TypeError;
pub use id::{ContentId, NameId, DEFAULT_NAME_ID_LEN, MAX_NAME_ID_LEN, MIN_NAME_ID_LEN};
pub use listing::{AlbumSummary, Breadcrumb, Listing, TrackSummary};
