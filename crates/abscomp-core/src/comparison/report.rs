//! Diff report assembly

use super::fields::{FieldDiffer, FieldDiscrepancy};
use super::matcher::MatchedPair;
use crate::model::NormalizedItem;

/// A matched pair together with its non-empty list of discrepancies
#[derive(Debug, Clone, PartialEq)]
pub struct ChangedItem {
    /// The matched items
    pub pair: MatchedPair,
    /// Fields that differ, in tracked-field order
    pub discrepancies: Vec<FieldDiscrepancy>,
}

/// Structural difference between library A (baseline) and B (candidate)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiffReport {
    /// Items only in library B
    pub added: Vec<NormalizedItem>,
    /// Items only in library A
    pub removed: Vec<NormalizedItem>,
    /// Items in both libraries with differing tracked fields
    pub changed: Vec<ChangedItem>,
    /// Items in both libraries with identical tracked fields
    pub unchanged_count: usize,
}

impl DiffReport {
    /// Whether the libraries hold the same items with the same fields
    #[must_use]
    pub const fn is_identical(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.changed.is_empty()
    }

    /// Count of added, removed, and changed items
    #[must_use]
    pub const fn change_count(&self) -> usize {
        self.added.len() + self.removed.len() + self.changed.len()
    }

    /// Count of items present in both libraries
    #[must_use]
    pub const fn matched_count(&self) -> usize {
        self.changed.len() + self.unchanged_count
    }

    /// Total number of individual field discrepancies
    #[must_use]
    pub fn discrepancy_count(&self) -> usize {
        self.changed.iter().map(|c| c.discrepancies.len()).sum()
    }
}

/// Assembles a `DiffReport` from matcher output
pub struct ReportBuilder;

impl ReportBuilder {
    /// Diff every matched pair and route the partitions into a report
    ///
    /// Partition order is preserved: `removed` follows A, `added` follows B,
    /// and `changed` follows A.
    #[must_use]
    pub fn build(
        matched: Vec<MatchedPair>,
        unmatched_a: Vec<NormalizedItem>,
        unmatched_b: Vec<NormalizedItem>,
        differ: &FieldDiffer,
    ) -> DiffReport {
        let mut report = DiffReport {
            added: unmatched_b,
            removed: unmatched_a,
            ..DiffReport::default()
        };

        for pair in matched {
            let discrepancies = differ.diff(&pair.item_a, &pair.item_b);
            if discrepancies.is_empty() {
                report.unchanged_count += 1;
            } else {
                report.changed.push(ChangedItem {
                    pair,
                    discrepancies,
                });
            }
        }

        report
    }
}
