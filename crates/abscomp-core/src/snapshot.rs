//! Immutable per-library snapshots
//!
//! A snapshot is built once per run from one fetch and never mutated. Items
//! keep the order the server returned them in, and no two items share a
//! canonical key.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{DuplicateKeyWarning, Warning};
use crate::model::{CanonicalKey, LibrarySide, NormalizedItem, RawItem};
use crate::normalize::Normalizer;

/// One library's normalized state at fetch time
#[derive(Debug, Clone, PartialEq)]
pub struct LibrarySnapshot {
    side: LibrarySide,
    library_id: String,
    fetched_at: DateTime<Utc>,
    total_count: usize,
    items: Vec<NormalizedItem>,
    warnings: Vec<Warning>,
}

/// Metadata describing a snapshot, without its items
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotSummary {
    /// Side of the comparison
    pub side: LibrarySide,
    /// Server-side library identifier
    pub library_id: String,
    /// When the raw records were fetched
    pub fetched_at: DateTime<Utc>,
    /// Number of raw records received
    pub total_count: usize,
    /// Number of items kept after normalization and de-duplication
    pub item_count: usize,
    /// Number of raw records skipped or dropped
    pub skipped_count: usize,
}

impl LibrarySnapshot {
    /// Side of the comparison this snapshot stands for
    #[must_use]
    pub const fn side(&self) -> LibrarySide {
        self.side
    }

    /// Server-side library identifier
    #[must_use]
    pub fn library_id(&self) -> &str {
        &self.library_id
    }

    /// When the raw records were fetched
    #[must_use]
    pub const fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    /// Number of raw records the snapshot was built from
    #[must_use]
    pub const fn total_count(&self) -> usize {
        self.total_count
    }

    /// Normalized items, in fetch order
    #[must_use]
    pub fn items(&self) -> &[NormalizedItem] {
        &self.items
    }

    /// Iterate over normalized items in fetch order
    pub fn iter(&self) -> std::slice::Iter<'_, NormalizedItem> {
        self.items.iter()
    }

    /// Number of normalized items
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the snapshot holds no items
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Warnings recorded while building the snapshot
    #[must_use]
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Metadata for reporting
    #[must_use]
    pub fn summary(&self) -> SnapshotSummary {
        SnapshotSummary {
            side: self.side,
            library_id: self.library_id.clone(),
            fetched_at: self.fetched_at,
            total_count: self.total_count,
            item_count: self.items.len(),
            skipped_count: self.total_count - self.items.len(),
        }
    }
}

impl<'a> IntoIterator for &'a LibrarySnapshot {
    type Item = &'a NormalizedItem;
    type IntoIter = std::slice::Iter<'a, NormalizedItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Builds a `LibrarySnapshot` from raw records
pub struct SnapshotBuilder<'a> {
    normalizer: &'a Normalizer,
    side: LibrarySide,
    library_id: String,
    fetched_at: Option<DateTime<Utc>>,
}

impl<'a> SnapshotBuilder<'a> {
    /// Create a builder for one side of the comparison
    #[must_use]
    pub fn new(normalizer: &'a Normalizer, side: LibrarySide, library_id: impl Into<String>) -> Self {
        Self {
            normalizer,
            side,
            library_id: library_id.into(),
            fetched_at: None,
        }
    }

    /// Record when the raw records were fetched (defaults to now)
    #[must_use]
    pub fn fetched_at(mut self, fetched_at: DateTime<Utc>) -> Self {
        self.fetched_at = Some(fetched_at);
        self
    }

    /// Normalize every record and assemble the snapshot
    ///
    /// Records that fail normalization are skipped, and records whose key
    /// was already seen are dropped in favour of the first occurrence. Both
    /// cases are recorded as warnings on the snapshot.
    #[must_use]
    pub fn build(self, raw_items: &[RawItem]) -> LibrarySnapshot {
        let mut items: Vec<NormalizedItem> = Vec::with_capacity(raw_items.len());
        let mut warnings = Vec::new();
        let mut seen: HashMap<CanonicalKey, usize> = HashMap::with_capacity(raw_items.len());

        for (index, raw) in raw_items.iter().enumerate() {
            let item = match self.normalizer.normalize(raw, index, self.side) {
                Ok(item) => item,
                Err(e) => {
                    debug!(side = %self.side, index, "skipping item: {e}");
                    warnings.push(Warning::from(e));
                    continue;
                }
            };

            if let Some(&kept) = seen.get(item.canonical_key()) {
                let warning = DuplicateKeyWarning {
                    side: self.side,
                    key: item.canonical_key().clone(),
                    kept: items[kept].raw_ref().clone(),
                    dropped: item.raw_ref().clone(),
                    dropped_title: item.title().to_string(),
                };
                debug!(side = %self.side, index, "{warning}");
                warnings.push(Warning::from(warning));
                continue;
            }

            seen.insert(item.canonical_key().clone(), items.len());
            items.push(item);
        }

        if !warnings.is_empty() {
            warn!(
                side = %self.side,
                library = %self.library_id,
                "{} of {} item(s) skipped or dropped",
                warnings.len(),
                raw_items.len()
            );
        }
        debug!(
            side = %self.side,
            library = %self.library_id,
            items = items.len(),
            "snapshot built"
        );

        LibrarySnapshot {
            side: self.side,
            library_id: self.library_id,
            fetched_at: self.fetched_at.unwrap_or_else(Utc::now),
            total_count: raw_items.len(),
            items,
            warnings,
        }
    }
}
