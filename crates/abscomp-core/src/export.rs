//! Report rendering and file export
//!
//! - `ConsoleReporter` builds the human-readable summary
//! - `CsvExporter` and `JsonExporter` write machine-readable files
//! - `ReportExporter` places those files under a dated prefix

mod console;
mod csv;
mod json;
mod records;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::NaiveDate;
use tracing::info;

pub use self::console::{ConsoleReporter, SummaryOptions};
pub use self::csv::CsvExporter;
pub use self::json::JsonExporter;
pub use self::records::{
    ChangedRecord, DISCREPANCY_HEADERS, DiscrepancyRow, ITEM_HEADERS, ItemRecord, ItemRow,
    ItemStatus, MATCHED_HEADERS, MatchedRecord, ReportDocument, SnapshotDocument,
    discrepancy_rows, item_rows,
};

use crate::comparison::{DiffReport, MatchedPair};
use crate::error::Result;
use crate::model::LibrarySide;
use crate::snapshot::LibrarySnapshot;

/// Output file locations for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPaths {
    dir: PathBuf,
    prefix: String,
}

impl ExportPaths {
    /// Paths under `dir` prefixed with `abscomp_books_<YYMMDD>_`
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>, date: NaiveDate) -> Self {
        Self {
            dir: dir.into(),
            prefix: format!("abscomp_books_{}_", date.format("%y%m%d")),
        }
    }

    /// Output directory
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File name prefix
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// JSON report
    #[must_use]
    pub fn report_json(&self) -> PathBuf {
        self.file("report.json")
    }

    /// Added/removed item CSV
    #[must_use]
    pub fn items_csv(&self) -> PathBuf {
        self.file("items.csv")
    }

    /// Field discrepancy CSV
    #[must_use]
    pub fn changes_csv(&self) -> PathBuf {
        self.file("changes.csv")
    }

    /// Items found in both libraries, as JSON
    #[must_use]
    pub fn both_json(&self) -> PathBuf {
        self.file("both.json")
    }

    /// Items found in both libraries, as CSV
    #[must_use]
    pub fn both_csv(&self) -> PathBuf {
        self.file("both.csv")
    }

    /// Full JSON dump of one library
    #[must_use]
    pub fn library_json(&self, side: LibrarySide) -> PathBuf {
        self.file(&format!("library_{}.json", side_suffix(side)))
    }

    /// Full CSV dump of one library
    #[must_use]
    pub fn library_csv(&self, side: LibrarySide) -> PathBuf {
        self.file(&format!("library_{}.csv", side_suffix(side)))
    }

    fn file(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}{name}", self.prefix))
    }
}

const fn side_suffix(side: LibrarySide) -> &'static str {
    match side {
        LibrarySide::A => "a",
        LibrarySide::B => "b",
    }
}

/// Writes report and snapshot files to an `ExportPaths` location
pub struct ReportExporter {
    paths: ExportPaths,
}

impl ReportExporter {
    /// Create an exporter for the given paths
    #[must_use]
    pub const fn new(paths: ExportPaths) -> Self {
        Self { paths }
    }

    /// Output locations
    #[must_use]
    pub const fn paths(&self) -> &ExportPaths {
        &self.paths
    }

    /// Write the JSON report, returning its path
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the file
    /// cannot be written.
    pub fn write_json(&self, report: &DiffReport) -> Result<PathBuf> {
        self.ensure_dir()?;
        let path = self.paths.report_json();
        JsonExporter::write_report(report, &path)?;
        info!(path = %path.display(), "wrote JSON report");
        Ok(path)
    }

    /// Write both CSV files, returning their paths
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or a file cannot
    /// be written.
    pub fn write_csv(&self, report: &DiffReport) -> Result<Vec<PathBuf>> {
        self.ensure_dir()?;
        let items = self.paths.items_csv();
        CsvExporter::write_items_file(report, &items)?;
        let changes = self.paths.changes_csv();
        CsvExporter::write_changes_file(report, &changes)?;
        info!(items = %items.display(), changes = %changes.display(), "wrote CSV report");
        Ok(vec![items, changes])
    }

    /// Write a full snapshot as both CSV and JSON, returning the paths
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or a file cannot
    /// be written.
    pub fn write_snapshot(&self, snapshot: &LibrarySnapshot) -> Result<Vec<PathBuf>> {
        self.ensure_dir()?;
        let csv = self.paths.library_csv(snapshot.side());
        CsvExporter::write_snapshot_file(snapshot, &csv)?;
        let json = self.paths.library_json(snapshot.side());
        JsonExporter::write_snapshot(snapshot, &json)?;
        info!(side = %snapshot.side(), "wrote library dump");
        Ok(vec![csv, json])
    }

    /// Write the items found in both libraries as CSV and JSON
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or a file cannot
    /// be written.
    pub fn write_matched(&self, matched: &[MatchedPair]) -> Result<Vec<PathBuf>> {
        self.ensure_dir()?;
        let csv = self.paths.both_csv();
        CsvExporter::write_matched_file(matched, &csv)?;
        let json = self.paths.both_json();
        JsonExporter::write_matched(matched, &json)?;
        info!(items = matched.len(), "wrote matched items");
        Ok(vec![csv, json])
    }

    fn ensure_dir(&self) -> Result<()> {
        let dir = self.paths.dir();
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory: {}", dir.display()))
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::comparison::LibraryComparator;
    use crate::model::RawItem;
    use crate::normalize::Normalizer;
    use crate::snapshot::SnapshotBuilder;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, 4).unwrap()
    }

    #[test]
    fn test_export_paths() {
        let paths = ExportPaths::new("/tmp/out", date());

        assert_eq!(paths.prefix(), "abscomp_books_240204_");
        assert_eq!(
            paths.report_json(),
            PathBuf::from("/tmp/out/abscomp_books_240204_report.json")
        );
        assert_eq!(
            paths.changes_csv(),
            PathBuf::from("/tmp/out/abscomp_books_240204_changes.csv")
        );
        assert_eq!(
            paths.library_csv(LibrarySide::B),
            PathBuf::from("/tmp/out/abscomp_books_240204_library_b.csv")
        );
    }

    #[test]
    fn test_exporter_creates_missing_directory() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("nested").join("out");
        let exporter = ReportExporter::new(ExportPaths::new(&out, date()));

        let json = exporter.write_json(&DiffReport::default()).unwrap();
        let csv = exporter.write_csv(&DiffReport::default()).unwrap();

        assert!(json.exists());
        assert_eq!(csv.len(), 2);
        assert!(csv.iter().all(|p| p.exists()));
    }

    #[test]
    fn test_snapshot_dump() {
        let tmp = TempDir::new().unwrap();
        let exporter = ReportExporter::new(ExportPaths::new(tmp.path(), date()));
        let normalizer = Normalizer::default();
        let raw = vec![RawItem::new().with_id("li_1").with_field("title", "Dune")];
        let snapshot = SnapshotBuilder::new(&normalizer, LibrarySide::A, "lib_a").build(&raw);

        let written = exporter.write_snapshot(&snapshot).unwrap();

        assert_eq!(
            written,
            vec![
                tmp.path().join("abscomp_books_240204_library_a.csv"),
                tmp.path().join("abscomp_books_240204_library_a.json"),
            ]
        );
        let json = std::fs::read_to_string(&written[1]).unwrap();
        assert!(json.contains("\"library_id\": \"lib_a\""));
        assert!(json.contains("\"raw_id\": \"li_1\""));
    }

    #[test]
    fn test_matched_dump() {
        let tmp = TempDir::new().unwrap();
        let exporter = ReportExporter::new(ExportPaths::new(tmp.path(), date()));
        let normalizer = Normalizer::default();
        let raw = vec![RawItem::new().with_id("li_1").with_field("title", "Dune")];
        let a = SnapshotBuilder::new(&normalizer, LibrarySide::A, "lib_a").build(&raw);
        let b = SnapshotBuilder::new(&normalizer, LibrarySide::B, "lib_b").build(&raw);
        let outcome = LibraryComparator::default().compare(&a, &b);

        let written = exporter.write_matched(&outcome.matched).unwrap();

        assert_eq!(
            written,
            vec![
                tmp.path().join("abscomp_books_240204_both.csv"),
                tmp.path().join("abscomp_books_240204_both.json"),
            ]
        );
        let csv = std::fs::read_to_string(&written[0]).unwrap();
        assert!(csv.ends_with("dune|,Dune,,li_1,li_1\n"));
    }
}
