//! Identifier derivation for Folio.
//!
//! Provides BLAKE3-based derivation of short name identifiers for directory
//! and file names, and full-length content identifiers for file bytes.
//!
//! Hashing is delegated to the `blake3` crate.

pub mod hasher;

pub use hasher::{HasherError, IdHasher};
