//! Human-readable comparison summary

use std::fmt::Write;

use similar::{ChangeTag, TextDiff};

use crate::comparison::{ComparisonOutcome, FieldDiscrepancy};
use crate::model::{FieldValue, NormalizedItem};
use crate::snapshot::SnapshotSummary;

const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Options controlling the console summary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryOptions {
    /// Maximum items listed per section; 0 prints counts only
    pub list_limit: usize,
    /// Emit ANSI colour codes
    pub color: bool,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            list_limit: 10,
            color: false,
        }
    }
}

/// Comparison summary reporter
pub struct ConsoleReporter;

impl ConsoleReporter {
    /// Generate a summary report
    #[must_use]
    pub fn generate_summary(outcome: &ComparisonOutcome, options: &SummaryOptions) -> String {
        let report = &outcome.report;
        let paint = Painter(options.color);
        let mut output = String::new();

        let _ = writeln!(output, "\n{}", paint.wrap(BOLD, "=== Library Comparison ==="));
        Self::library_line(&mut output, &outcome.library_a);
        Self::library_line(&mut output, &outcome.library_b);

        let _ = writeln!(output);
        let _ = writeln!(output, "Added:     {}", report.added.len());
        let _ = writeln!(output, "Removed:   {}", report.removed.len());
        let _ = writeln!(output, "Changed:   {}", report.changed.len());
        let _ = writeln!(output, "Unchanged: {}", report.unchanged_count);

        if options.list_limit > 0 {
            let removed_sign = paint.wrap(RED, "-");
            let added_sign = paint.wrap(GREEN, "+");
            Self::item_section(&mut output, "Removed (only in A)", &removed_sign, &report.removed, options.list_limit);
            Self::item_section(&mut output, "Added (only in B)", &added_sign, &report.added, options.list_limit);

            if !report.changed.is_empty() {
                let _ = writeln!(output, "\nChanged ({}):", report.changed.len());
                for changed in report.changed.iter().take(options.list_limit) {
                    let _ = writeln!(output, "  ~ {}", describe(&changed.pair.item_a));
                    for discrepancy in &changed.discrepancies {
                        let _ = writeln!(output, "      {}", Self::change_line(discrepancy, paint));
                    }
                }
                more(&mut output, report.changed.len(), options.list_limit);
            }
        }

        if !outcome.warnings.is_empty() {
            let _ = writeln!(
                output,
                "\n{}",
                paint.wrap(YELLOW, &format!("Warnings ({}):", outcome.warnings.len()))
            );
            for warning in &outcome.warnings {
                let _ = writeln!(output, "  - {warning}");
            }
        }

        let _ = writeln!(output);
        if report.is_identical() {
            let _ = writeln!(output, "Status: {}", paint.wrap(GREEN, "✓ Libraries match"));
        } else {
            let status = format!(
                "✗ {} difference(s), {} field discrepancy(ies)",
                report.change_count(),
                report.discrepancy_count()
            );
            let _ = writeln!(output, "Status: {}", paint.wrap(RED, &status));
        }

        output
    }

    /// Highlight the character-level difference between two values
    ///
    /// Returns the old value with deletions in red and the new value with
    /// insertions in green.
    #[must_use]
    pub fn highlight_change(old: &str, new: &str) -> (String, String) {
        let diff = TextDiff::from_chars(old, new);
        let mut left = String::new();
        let mut right = String::new();

        for change in diff.iter_all_changes() {
            let value = change.value();
            match change.tag() {
                ChangeTag::Equal => {
                    left.push_str(value);
                    right.push_str(value);
                }
                ChangeTag::Delete => {
                    let _ = write!(left, "{RED}{value}{RESET}");
                }
                ChangeTag::Insert => {
                    let _ = write!(right, "{GREEN}{value}{RESET}");
                }
            }
        }

        (left, right)
    }

    fn library_line(output: &mut String, summary: &SnapshotSummary) {
        let _ = write!(
            output,
            "Library {}: {} ({} item(s)",
            summary.side, summary.library_id, summary.item_count
        );
        if summary.skipped_count > 0 {
            let _ = write!(output, ", {} skipped", summary.skipped_count);
        }
        let _ = writeln!(output, ", fetched {})", summary.fetched_at.format("%Y-%m-%d %H:%M:%S UTC"));
    }

    fn item_section(
        output: &mut String,
        heading: &str,
        sign: &str,
        items: &[NormalizedItem],
        limit: usize,
    ) {
        if items.is_empty() {
            return;
        }
        let _ = writeln!(output, "\n{heading} ({}):", items.len());
        for item in items.iter().take(limit) {
            let _ = writeln!(output, "  {sign} {}", describe(item));
        }
        more(output, items.len(), limit);
    }

    fn change_line(discrepancy: &FieldDiscrepancy, paint: Painter) -> String {
        let (old, new) = match (&discrepancy.value_a, &discrepancy.value_b) {
            (Some(FieldValue::Text(a)), Some(FieldValue::Text(b))) if paint.0 => {
                Self::highlight_change(a, b)
            }
            (a, b) => (shown(a.as_ref()), shown(b.as_ref())),
        };
        format!("{}: \"{old}\" -> \"{new}\"", discrepancy.field_name)
    }
}

#[derive(Clone, Copy)]
struct Painter(bool);

impl Painter {
    fn wrap(self, code: &str, text: &str) -> String {
        if self.0 {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }
}

fn describe(item: &NormalizedItem) -> String {
    match item.author() {
        Some(author) => format!("{} by {author}", item.title()),
        None => item.title().to_string(),
    }
}

fn shown(value: Option<&FieldValue>) -> String {
    value.map_or_else(|| "(none)".to_string(), ToString::to_string)
}

fn more(output: &mut String, total: usize, limit: usize) {
    if total > limit {
        let _ = writeln!(output, "    ...and {} more", total - limit);
    }
}
