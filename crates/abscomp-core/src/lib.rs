//! # abscomp-core
//!
//! Core library for comparing two Audiobookshelf libraries.
//!
//! Raw catalog records fetched from each library are normalized into
//! immutable snapshots, paired by canonical key, and diffed field by field.
//! The resulting report lists items added (only in library B), removed
//! (only in library A), and changed (present in both with differing tracked
//! fields), and can be rendered to the console, CSV, or JSON.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Error types and the crate-wide `Result` alias
pub mod error;

/// Item, key, and field value types shared across the crate
pub mod model;

/// Raw record normalization and canonical key derivation
pub mod normalize;

/// Immutable per-library snapshots
pub mod snapshot;

/// Matching, field diffing, and report assembly
pub mod comparison;

/// Configuration file discovery, parsing, and validation
pub mod config;

/// Audiobookshelf API client
pub mod fetch;

/// Console, CSV, and JSON rendering of reports
pub mod export;

pub use comparison::{ComparisonOutcome, DiffReport, FieldDiffer, LibraryComparator, TextCase};
pub use error::{DuplicateKeyWarning, NormalizationError, Warning};
pub use model::{
    CanonicalKey, FieldValue, KeySource, LibrarySide, NormalizedItem, RawItem, TrackedField,
};
pub use normalize::{KeyStrategy, Normalizer};
pub use snapshot::{LibrarySnapshot, SnapshotBuilder};
