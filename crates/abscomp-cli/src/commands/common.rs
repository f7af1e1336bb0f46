//! Common types and utilities for command execution

use std::path::Path;

/// Execution options for the compare command
#[allow(clippy::struct_excessive_bools)]
pub struct CompareOptions<'a> {
    /// Path to custom config file
    pub config_path: Option<&'a Path>,
    /// Write CSV files
    pub csv: bool,
    /// Write the JSON report
    pub json: bool,
    /// Write full library dumps
    pub dump_libraries: bool,
    /// Directory for written files
    pub output_dir: &'a Path,
    /// Maximum items listed per console section
    pub list_limit: usize,
    /// Disable coloured output
    pub no_color: bool,
}

impl CompareOptions<'_> {
    /// Whether any file output was requested
    #[must_use]
    pub const fn writes_files(&self) -> bool {
        self.csv || self.json || self.dump_libraries
    }
}
