//! CSV rendering of reports and snapshots

use std::collections::BTreeSet;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use ::csv::{Writer, WriterBuilder};
use anyhow::Context;

use super::records::{
    DISCREPANCY_HEADERS, ITEM_HEADERS, MATCHED_HEADERS, MatchedRecord, discrepancy_rows, item_rows,
};
use crate::comparison::{DiffReport, MatchedPair};
use crate::error::Result;
use crate::model::TrackedField;
use crate::snapshot::LibrarySnapshot;

/// CSV exporter
///
/// Headers are always written, even when there are no rows.
pub struct CsvExporter;

impl CsvExporter {
    /// Write one row per added or removed item
    ///
    /// # Errors
    ///
    /// Returns an error if a row cannot be written.
    pub fn write_items<W: Write>(report: &DiffReport, writer: W) -> Result<()> {
        let mut csv = Self::writer(writer);
        csv.write_record(ITEM_HEADERS)?;
        for row in item_rows(report) {
            csv.serialize(row)?;
        }
        csv.flush()?;
        Ok(())
    }

    /// Write one row per field discrepancy
    ///
    /// # Errors
    ///
    /// Returns an error if a row cannot be written.
    pub fn write_changes<W: Write>(report: &DiffReport, writer: W) -> Result<()> {
        let mut csv = Self::writer(writer);
        csv.write_record(DISCREPANCY_HEADERS)?;
        for row in discrepancy_rows(report) {
            csv.serialize(row)?;
        }
        csv.flush()?;
        Ok(())
    }

    /// Write one row per item found in both libraries
    ///
    /// # Errors
    ///
    /// Returns an error if a row cannot be written.
    pub fn write_matched<W: Write>(matched: &[MatchedPair], writer: W) -> Result<()> {
        let mut csv = Self::writer(writer);
        csv.write_record(MATCHED_HEADERS)?;
        for pair in matched {
            csv.serialize(MatchedRecord::from(pair))?;
        }
        csv.flush()?;
        Ok(())
    }

    /// Write every item of a snapshot
    ///
    /// Columns are `id`, `canonical_key`, `title`, `author`, then every other
    /// tracked field that has a value on at least one item.
    ///
    /// # Errors
    ///
    /// Returns an error if a row cannot be written.
    pub fn write_snapshot<W: Write>(snapshot: &LibrarySnapshot, writer: W) -> Result<()> {
        let extra: BTreeSet<TrackedField> = snapshot
            .iter()
            .flat_map(|item| item.attributes().keys().copied())
            .filter(|field| !matches!(field, TrackedField::Title | TrackedField::Author))
            .collect();

        let mut csv = Self::writer(writer);
        let header = ["id", "canonical_key", "title", "author"]
            .into_iter()
            .chain(extra.iter().map(|field| field.name()));
        csv.write_record(header)?;

        for item in snapshot {
            let mut record = vec![
                item.raw_ref().id.clone().unwrap_or_default(),
                item.canonical_key().to_string(),
                item.title().to_string(),
                item.author().unwrap_or_default().to_string(),
            ];
            record.extend(extra.iter().map(|&field| {
                item.attribute(field)
                    .map(ToString::to_string)
                    .unwrap_or_default()
            }));
            csv.write_record(&record)?;
        }
        csv.flush()?;
        Ok(())
    }

    /// Write the added/removed item rows to a file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written.
    pub fn write_items_file(report: &DiffReport, path: &Path) -> Result<()> {
        Self::write_items(report, Self::create(path)?)
            .with_context(|| format!("Failed to write CSV: {}", path.display()))
    }

    /// Write the discrepancy rows to a file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written.
    pub fn write_changes_file(report: &DiffReport, path: &Path) -> Result<()> {
        Self::write_changes(report, Self::create(path)?)
            .with_context(|| format!("Failed to write CSV: {}", path.display()))
    }

    /// Write the matched item rows to a file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written.
    pub fn write_matched_file(matched: &[MatchedPair], path: &Path) -> Result<()> {
        Self::write_matched(matched, Self::create(path)?)
            .with_context(|| format!("Failed to write CSV: {}", path.display()))
    }

    /// Write a snapshot dump to a file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written.
    pub fn write_snapshot_file(snapshot: &LibrarySnapshot, path: &Path) -> Result<()> {
        Self::write_snapshot(snapshot, Self::create(path)?)
            .with_context(|| format!("Failed to write CSV: {}", path.display()))
    }

    fn writer<W: Write>(writer: W) -> Writer<W> {
        WriterBuilder::new().has_headers(false).from_writer(writer)
    }

    fn create(path: &Path) -> Result<File> {
        File::create(path).with_context(|| format!("Failed to create file: {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparison::LibraryComparator;
    use crate::model::{LibrarySide, RawItem};
    use crate::normalize::Normalizer;
    use crate::snapshot::SnapshotBuilder;

    fn snapshots() -> (LibrarySnapshot, LibrarySnapshot) {
        let normalizer = Normalizer::default();
        let a = vec![
            RawItem::new()
                .with_field("title", "Dune")
                .with_field("author", "Frank Herbert")
                .with_field("narrator", "Jane Doe")
                .with_field("duration", 75_600),
            RawItem::new()
                .with_field("title", "Emma")
                .with_field("author", "Jane Austen"),
        ];
        let b = vec![
            RawItem::new()
                .with_field("title", "Dune")
                .with_field("author", "Frank Herbert")
                .with_field("narrator", "John Doe"),
            RawItem::new()
                .with_field("title", "Ubik, Again")
                .with_field("author", "Philip K. Dick"),
        ];
        (
            SnapshotBuilder::new(&normalizer, LibrarySide::A, "lib_a").build(&a),
            SnapshotBuilder::new(&normalizer, LibrarySide::B, "lib_b").build(&b),
        )
    }

    fn report() -> DiffReport {
        let (a, b) = snapshots();
        LibraryComparator::default().compare(&a, &b).report
    }

    #[test]
    fn test_items_csv() {
        let mut out = Vec::new();
        CsvExporter::write_items(&report(), &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "status,title,author,canonical_key\n\
             removed,Emma,Jane Austen,emma|jane austen\n\
             added,\"Ubik, Again\",Philip K. Dick,ubik again|philip k dick\n"
        );
    }

    #[test]
    fn test_changes_csv() {
        let mut out = Vec::new();
        CsvExporter::write_changes(&report(), &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "title,author,field_name,value_a,value_b\n\
             Dune,Frank Herbert,narrator,Jane Doe,John Doe\n\
             Dune,Frank Herbert,duration,75600,\n"
        );
    }

    #[test]
    fn test_matched_csv() {
        let (a, b) = snapshots();
        let matched = LibraryComparator::default().compare(&a, &b).matched;
        let mut out = Vec::new();
        CsvExporter::write_matched(&matched, &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "canonical_key,title,author,raw_id_a,raw_id_b\n\
             dune|frank herbert,Dune,Frank Herbert,,\n"
        );
    }

    #[test]
    fn test_empty_report_still_has_headers() {
        let mut out = Vec::new();
        CsvExporter::write_changes(&DiffReport::default(), &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "title,author,field_name,value_a,value_b\n"
        );
    }

    #[test]
    fn test_snapshot_csv_columns() {
        let (a, _) = snapshots();
        let mut out = Vec::new();
        CsvExporter::write_snapshot(&a, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("id,canonical_key,title,author,narrator,duration"));
        assert_eq!(lines.next(), Some(",dune|frank herbert,Dune,Frank Herbert,Jane Doe,75600"));
        assert_eq!(lines.next(), Some(",emma|jane austen,Emma,Jane Austen,,"));
    }

    #[test]
    fn test_write_items_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("items.csv");

        CsvExporter::write_items_file(&report(), &path).unwrap();

        assert!(std::fs::read_to_string(&path).unwrap().starts_with("status,"));
    }
}
