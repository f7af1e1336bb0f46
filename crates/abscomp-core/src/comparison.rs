//! Library comparison: matching, field diffing, and report assembly
//!
//! This module is pure: every function is a finite, in-memory computation
//! over two fully built snapshots.
//! - `Matcher` pairs items by canonical key
//! - `FieldDiffer` compares tracked attributes of a matched pair
//! - `ReportBuilder` routes the results into a `DiffReport`

mod fields;
mod matcher;
mod report;

#[cfg(test)]
mod integration_tests;

use tracing::info;

pub use fields::{FieldDiffer, FieldDiscrepancy, TextCase};
pub use matcher::{MatchOutcome, MatchedPair, Matcher};
pub use report::{ChangedItem, DiffReport, ReportBuilder};

use crate::error::Warning;
use crate::snapshot::{LibrarySnapshot, SnapshotSummary};

/// Report plus everything needed to present it
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonOutcome {
    /// The structural difference between the two libraries
    pub report: DiffReport,
    /// Every item found in both libraries, changed or not, in A's order
    pub matched: Vec<MatchedPair>,
    /// Warnings from both snapshots, library A's first
    pub warnings: Vec<Warning>,
    /// Metadata of library A
    pub library_a: SnapshotSummary,
    /// Metadata of library B
    pub library_b: SnapshotSummary,
}

/// Compares two snapshots end to end
#[derive(Debug, Clone, Default)]
pub struct LibraryComparator {
    differ: FieldDiffer,
}

impl LibraryComparator {
    /// Create a comparator using the given field rules
    #[must_use]
    pub const fn new(differ: FieldDiffer) -> Self {
        Self { differ }
    }

    /// Match, diff, and assemble the report for two snapshots
    #[must_use]
    pub fn compare(&self, a: &LibrarySnapshot, b: &LibrarySnapshot) -> ComparisonOutcome {
        let MatchOutcome {
            unmatched_a,
            unmatched_b,
            matched,
        } = Matcher::match_snapshots(a, b);

        let both = matched.clone();
        let report = ReportBuilder::build(matched, unmatched_a, unmatched_b, &self.differ);

        info!(
            added = report.added.len(),
            removed = report.removed.len(),
            changed = report.changed.len(),
            unchanged = report.unchanged_count,
            "comparison complete"
        );

        let warnings = a.warnings().iter().chain(b.warnings()).cloned().collect();

        ComparisonOutcome {
            report,
            matched: both,
            warnings,
            library_a: a.summary(),
            library_b: b.summary(),
        }
    }
}
