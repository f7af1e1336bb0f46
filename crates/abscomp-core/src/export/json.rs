//! JSON rendering of reports and snapshots

use std::fs;
use std::path::Path;

use anyhow::Context;

use super::records::{MatchedRecord, ReportDocument, SnapshotDocument};
use crate::comparison::{DiffReport, MatchedPair};
use crate::error::Result;
use crate::snapshot::LibrarySnapshot;

/// JSON exporter
pub struct JsonExporter;

impl JsonExporter {
    /// Render a report as pretty-printed JSON
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_report(report: &DiffReport) -> Result<String> {
        let mut json = serde_json::to_string_pretty(&ReportDocument::from(report))
            .context("Failed to serialize diff report")?;
        json.push('\n');
        Ok(json)
    }

    /// Render a full snapshot as pretty-printed JSON
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_snapshot(snapshot: &LibrarySnapshot) -> Result<String> {
        let mut json = serde_json::to_string_pretty(&SnapshotDocument::from(snapshot))
            .with_context(|| format!("Failed to serialize library {}", snapshot.side()))?;
        json.push('\n');
        Ok(json)
    }

    /// Render the items found in both libraries as a pretty-printed array
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_matched(matched: &[MatchedPair]) -> Result<String> {
        let records: Vec<MatchedRecord<'_>> = matched.iter().map(MatchedRecord::from).collect();
        let mut json =
            serde_json::to_string_pretty(&records).context("Failed to serialize matched items")?;
        json.push('\n');
        Ok(json)
    }

    /// Write a report to a file
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn write_report(report: &DiffReport, path: &Path) -> Result<()> {
        let json = Self::render_report(report)?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write JSON report: {}", path.display()))
    }

    /// Write a full snapshot to a file
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn write_snapshot(snapshot: &LibrarySnapshot, path: &Path) -> Result<()> {
        let json = Self::render_snapshot(snapshot)?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write JSON library dump: {}", path.display()))
    }

    /// Write the items found in both libraries to a file
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn write_matched(matched: &[MatchedPair], path: &Path) -> Result<()> {
        let json = Self::render_matched(matched)?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write JSON matched items: {}", path.display()))
    }
}
