//! Stable output records derived from a report
//!
//! The same records back both the JSON and CSV exporters, so the two
//! formats always agree on ordering and content.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::comparison::{ChangedItem, DiffReport, FieldDiscrepancy, MatchedPair};
use crate::model::{CanonicalKey, FieldValue, LibrarySide, NormalizedItem, TrackedField};
use crate::snapshot::LibrarySnapshot;

/// Column names of the added/removed CSV
pub const ITEM_HEADERS: [&str; 4] = ["status", "title", "author", "canonical_key"];

/// Column names of the field discrepancy CSV
pub const DISCREPANCY_HEADERS: [&str; 5] = ["title", "author", "field_name", "value_a", "value_b"];

/// Column names of the matched item CSV
pub const MATCHED_HEADERS: [&str; 5] = ["canonical_key", "title", "author", "raw_id_a", "raw_id_b"];

/// One normalized item as exported
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemRecord<'a> {
    /// Matching key
    pub canonical_key: &'a CanonicalKey,
    /// Display title
    pub title: &'a str,
    /// Display author
    pub author: Option<&'a str>,
    /// Library the item came from
    pub source_library: LibrarySide,
    /// Server-side identifier
    pub raw_id: Option<&'a str>,
    /// Tracked attributes that have a value
    pub attributes: &'a BTreeMap<TrackedField, FieldValue>,
}

impl<'a> From<&'a NormalizedItem> for ItemRecord<'a> {
    fn from(item: &'a NormalizedItem) -> Self {
        Self {
            canonical_key: item.canonical_key(),
            title: item.title(),
            author: item.author(),
            source_library: item.source_library(),
            raw_id: item.raw_ref().id.as_deref(),
            attributes: item.attributes(),
        }
    }
}

/// One matched pair with discrepancies as exported
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangedRecord<'a> {
    /// Shared matching key
    pub canonical_key: &'a CanonicalKey,
    /// Display title from library A
    pub title: &'a str,
    /// Display author from library A
    pub author: Option<&'a str>,
    /// Server-side identifier in library A
    pub raw_id_a: Option<&'a str>,
    /// Server-side identifier in library B
    pub raw_id_b: Option<&'a str>,
    /// Differing fields
    pub discrepancies: &'a [FieldDiscrepancy],
}

impl<'a> From<&'a ChangedItem> for ChangedRecord<'a> {
    fn from(changed: &'a ChangedItem) -> Self {
        let pair = &changed.pair;
        Self {
            canonical_key: &pair.key,
            title: pair.item_a.title(),
            author: pair.item_a.author(),
            raw_id_a: pair.item_a.raw_ref().id.as_deref(),
            raw_id_b: pair.item_b.raw_ref().id.as_deref(),
            discrepancies: &changed.discrepancies,
        }
    }
}

/// One item found in both libraries
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchedRecord<'a> {
    /// Shared matching key
    pub canonical_key: &'a str,
    /// Display title from library A
    pub title: &'a str,
    /// Display author from library A
    pub author: Option<&'a str>,
    /// Server-side identifier in library A
    pub raw_id_a: Option<&'a str>,
    /// Server-side identifier in library B
    pub raw_id_b: Option<&'a str>,
}

impl<'a> From<&'a MatchedPair> for MatchedRecord<'a> {
    fn from(pair: &'a MatchedPair) -> Self {
        Self {
            canonical_key: pair.key.as_str(),
            title: pair.item_a.title(),
            author: pair.item_a.author(),
            raw_id_a: pair.item_a.raw_ref().id.as_deref(),
            raw_id_b: pair.item_b.raw_ref().id.as_deref(),
        }
    }
}

/// The JSON report document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportDocument<'a> {
    /// Items only in library B
    pub added: Vec<ItemRecord<'a>>,
    /// Items only in library A
    pub removed: Vec<ItemRecord<'a>>,
    /// Matched items with discrepancies
    pub changed: Vec<ChangedRecord<'a>>,
    /// Matched items without discrepancies
    pub unchanged_count: usize,
}

impl<'a> From<&'a DiffReport> for ReportDocument<'a> {
    fn from(report: &'a DiffReport) -> Self {
        Self {
            added: report.added.iter().map(ItemRecord::from).collect(),
            removed: report.removed.iter().map(ItemRecord::from).collect(),
            changed: report.changed.iter().map(ChangedRecord::from).collect(),
            unchanged_count: report.unchanged_count,
        }
    }
}

/// A full library snapshot as exported
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotDocument<'a> {
    /// Server-side library identifier
    pub library_id: &'a str,
    /// Side of the comparison
    pub side: LibrarySide,
    /// When the library was fetched
    pub fetched_at: DateTime<Utc>,
    /// Raw records received
    pub total_count: usize,
    /// Normalized items
    pub items: Vec<ItemRecord<'a>>,
}

impl<'a> From<&'a LibrarySnapshot> for SnapshotDocument<'a> {
    fn from(snapshot: &'a LibrarySnapshot) -> Self {
        Self {
            library_id: snapshot.library_id(),
            side: snapshot.side(),
            fetched_at: snapshot.fetched_at(),
            total_count: snapshot.total_count(),
            items: snapshot.iter().map(ItemRecord::from).collect(),
        }
    }
}

/// Whether an item row describes an addition or a removal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    /// Only in library B
    Added,
    /// Only in library A
    Removed,
}

/// One CSV row for an added or removed item
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemRow<'a> {
    /// Added or removed
    pub status: ItemStatus,
    /// Display title
    pub title: &'a str,
    /// Display author, empty when absent
    pub author: &'a str,
    /// Matching key
    pub canonical_key: &'a str,
}

/// One CSV row per field discrepancy
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscrepancyRow<'a> {
    /// Display title from library A
    pub title: &'a str,
    /// Display author from library A, empty when absent
    pub author: &'a str,
    /// Name of the differing field
    pub field_name: &'static str,
    /// Value in library A, empty when absent
    pub value_a: String,
    /// Value in library B, empty when absent
    pub value_b: String,
}

/// Rows for every removed item (A's order) followed by every added item (B's order)
#[must_use]
pub fn item_rows(report: &DiffReport) -> Vec<ItemRow<'_>> {
    report
        .removed
        .iter()
        .map(|item| item_row(ItemStatus::Removed, item))
        .chain(report.added.iter().map(|item| item_row(ItemStatus::Added, item)))
        .collect()
}

fn item_row(status: ItemStatus, item: &NormalizedItem) -> ItemRow<'_> {
    ItemRow {
        status,
        title: item.title(),
        author: item.author().unwrap_or_default(),
        canonical_key: item.canonical_key().as_str(),
    }
}

/// One row per discrepancy, grouped by changed item
#[must_use]
pub fn discrepancy_rows(report: &DiffReport) -> Vec<DiscrepancyRow<'_>> {
    report
        .changed
        .iter()
        .flat_map(|changed| {
            let item = &changed.pair.item_a;
            changed.discrepancies.iter().map(move |d| DiscrepancyRow {
                title: item.title(),
                author: item.author().unwrap_or_default(),
                field_name: d.field_name.name(),
                value_a: d.value_a.as_ref().map(ToString::to_string).unwrap_or_default(),
                value_b: d.value_b.as_ref().map(ToString::to_string).unwrap_or_default(),
            })
        })
        .collect()
}
