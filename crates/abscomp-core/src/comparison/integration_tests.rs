//! End-to-end tests from raw records to a diff report

use serde_json::json;

use super::{ComparisonOutcome, FieldDiffer, LibraryComparator, TextCase};
use crate::error::Warning;
use crate::export::JsonExporter;
use crate::model::{FieldValue, LibrarySide, RawItem, TrackedField};
use crate::normalize::{KeyStrategy, Normalizer};
use crate::snapshot::SnapshotBuilder;

fn raw(value: serde_json::Value) -> RawItem {
    serde_json::from_value(value).unwrap()
}

fn compare(a: &[RawItem], b: &[RawItem]) -> ComparisonOutcome {
    let normalizer = Normalizer::default();
    let snapshot_a = SnapshotBuilder::new(&normalizer, LibrarySide::A, "lib_a").build(a);
    let snapshot_b = SnapshotBuilder::new(&normalizer, LibrarySide::B, "lib_b").build(b);
    LibraryComparator::default().compare(&snapshot_a, &snapshot_b)
}

fn catalog_a() -> Vec<RawItem> {
    vec![
        raw(json!({"id": "a1", "title": "Dune", "author": "Frank Herbert", "narrator": "Scott Brick", "duration": 75600})),
        raw(json!({"id": "a2", "title": "Emma", "author": "Jane Austen", "narrator": "Juliet Stevenson"})),
        raw(json!({"id": "a3", "title": "The Hobbit", "author": "J.R.R. Tolkien", "narrator": "Andy Serkis"})),
        raw(json!({"id": "a4", "title": "The Hobbit", "author": "J.R.R. Tolkien"})),
        raw(json!({"id": "a5", "author": "Anonymous"})),
        raw(json!({"id": "a6", "title": "Solaris", "author": "Stanislaw Lem", "published_year": "1961"})),
    ]
}

fn catalog_b() -> Vec<RawItem> {
    vec![
        raw(json!({"id": "b1", "title": "Solaris", "author": "Stanisław Lem", "published_year": 1961})),
        raw(json!({"id": "b2", "title": "the hobbit", "author": "JRR Tolkien", "narrator": "Rob Inglis"})),
        raw(json!({"id": "b3", "title": "Dune", "author": "Frank Herbert", "narrator": "Scott Brick", "duration": "75600"})),
        raw(json!({"id": "b4", "title": "Ubik", "author": "Philip K. Dick"})),
    ]
}

#[test]
fn test_baseline_removed_scenario() {
    let a = vec![raw(json!({"title": "Dune", "author": "Frank Herbert"}))];

    let outcome = compare(&a, &[]);

    assert_eq!(outcome.report.removed.len(), 1);
    assert_eq!(outcome.report.removed[0].title(), "Dune");
    assert!(outcome.report.added.is_empty());
    assert!(outcome.report.changed.is_empty());
    assert_eq!(outcome.report.unchanged_count, 0);
}

#[test]
fn test_addition_scenario() {
    let b = vec![raw(json!({"title": "Dune", "author": "Frank Herbert"}))];

    let outcome = compare(&[], &b);

    assert_eq!(outcome.report.added.len(), 1);
    assert_eq!(outcome.report.added[0].source_library(), LibrarySide::B);
    assert!(outcome.report.removed.is_empty());
}

#[test]
fn test_empty_vs_empty_is_all_zero() {
    let outcome = compare(&[], &[]);

    assert!(outcome.report.is_identical());
    assert_eq!(outcome.report.unchanged_count, 0);
    assert!(outcome.warnings.is_empty());
}

#[test]
fn test_self_comparison_is_identical() {
    let catalog = catalog_a();

    let outcome = compare(&catalog, &catalog);

    assert!(outcome.report.added.is_empty());
    assert!(outcome.report.removed.is_empty());
    assert!(outcome.report.changed.is_empty());
    assert_eq!(outcome.report.unchanged_count, 4);
}

#[test]
fn test_narrator_discrepancy_scenario() {
    let a = vec![raw(json!({"title": "Dune", "author": "Frank Herbert", "narrator": "Jane Doe", "published_year": "1965"}))];
    let b = vec![raw(json!({"title": "Dune", "author": "Frank Herbert", "narrator": "John Doe", "published_year": "1965"}))];

    let outcome = compare(&a, &b);

    assert_eq!(outcome.report.changed.len(), 1);
    let changed = &outcome.report.changed[0];
    assert_eq!(changed.discrepancies.len(), 1);
    assert_eq!(changed.discrepancies[0].field_name, TrackedField::Narrator);
    assert_eq!(
        changed.discrepancies[0].value_a,
        Some(FieldValue::Text("Jane Doe".to_string()))
    );
    assert_eq!(
        changed.discrepancies[0].value_b,
        Some(FieldValue::Text("John Doe".to_string()))
    );
}

#[test]
fn test_mixed_catalogs() {
    let outcome = compare(&catalog_a(), &catalog_b());
    let report = &outcome.report;

    // Emma only in A; Solaris differs by author diacritics so does not match
    let removed: Vec<_> = report.removed.iter().map(|i| i.title()).collect();
    assert_eq!(removed, ["Emma", "Solaris"]);

    let added: Vec<_> = report.added.iter().map(|i| i.title()).collect();
    assert_eq!(added, ["Solaris", "Ubik"]);

    // The Hobbit matches on its folded key but its surface fields differ
    assert_eq!(report.changed.len(), 1);
    let hobbit = &report.changed[0];
    assert_eq!(hobbit.pair.item_a.raw_ref().id.as_deref(), Some("a3"));
    assert_eq!(hobbit.pair.item_b.raw_ref().id.as_deref(), Some("b2"));
    let fields: Vec<_> = hobbit.discrepancies.iter().map(|d| d.field_name).collect();
    assert_eq!(fields, [TrackedField::Title, TrackedField::Author, TrackedField::Narrator]);

    // Dune matches with equal numeric duration despite string vs number
    assert_eq!(report.unchanged_count, 1);

    // a4 is a duplicate of a3, a5 has no title
    assert_eq!(outcome.warnings.len(), 2);
    assert!(matches!(outcome.warnings[0], Warning::DuplicateKey(_)));
    assert!(matches!(outcome.warnings[1], Warning::Normalization(_)));
}

#[test]
fn test_partition_completeness() {
    let normalizer = Normalizer::default();
    let snapshot_a = SnapshotBuilder::new(&normalizer, LibrarySide::A, "lib_a").build(&catalog_a());
    let snapshot_b = SnapshotBuilder::new(&normalizer, LibrarySide::B, "lib_b").build(&catalog_b());

    let report = LibraryComparator::default()
        .compare(&snapshot_a, &snapshot_b)
        .report;

    assert_eq!(
        report.removed.len() + report.changed.len() + report.unchanged_count,
        snapshot_a.len()
    );
    assert_eq!(
        report.added.len() + report.changed.len() + report.unchanged_count,
        snapshot_b.len()
    );
}

#[test]
fn test_report_output_is_deterministic() {
    let first = JsonExporter::render_report(&compare(&catalog_a(), &catalog_b()).report).unwrap();
    let second = JsonExporter::render_report(&compare(&catalog_a(), &catalog_b()).report).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_case_insensitive_comparison() {
    let a = vec![raw(json!({"title": "The Hobbit", "author": "J.R.R. Tolkien"}))];
    let b = vec![raw(json!({"title": "the hobbit", "author": "j.r.r. tolkien"}))];
    let normalizer = Normalizer::default();
    let snapshot_a = SnapshotBuilder::new(&normalizer, LibrarySide::A, "lib_a").build(&a);
    let snapshot_b = SnapshotBuilder::new(&normalizer, LibrarySide::B, "lib_b").build(&b);

    let comparator = LibraryComparator::new(FieldDiffer::new(
        TrackedField::DEFAULTS.to_vec(),
        TextCase::Insensitive,
    ));
    let outcome = comparator.compare(&snapshot_a, &snapshot_b);

    assert!(outcome.report.is_identical());
    assert_eq!(outcome.report.unchanged_count, 1);
}

#[test]
fn test_outcome_carries_library_metadata() {
    let outcome = compare(&catalog_a(), &catalog_b());

    assert_eq!(outcome.library_a.library_id, "lib_a");
    assert_eq!(outcome.library_a.total_count, 6);
    assert_eq!(outcome.library_a.item_count, 4);
    assert_eq!(outcome.library_b.item_count, 4);
}

#[test]
fn test_outcome_keeps_every_matched_pair() {
    let outcome = compare(&catalog_a(), &catalog_b());

    let ids: Vec<_> = outcome
        .matched
        .iter()
        .map(|pair| (pair.item_a.raw_ref().id.as_deref(), pair.item_b.raw_ref().id.as_deref()))
        .collect();
    assert_eq!(ids.len(), outcome.report.matched_count());
    assert_eq!(ids[0], (Some("a1"), Some("b3")));
}

#[test]
fn test_identifier_first_pairs_asin_on_one_side() {
    let normalizer = Normalizer::new(KeyStrategy::IdentifierFirst, &TrackedField::DEFAULTS);
    let a = vec![raw(json!({"title": "Dune", "author": "Frank Herbert", "asin": "B002V1OF70"}))];
    let b = vec![raw(json!({"title": "Dune", "author": "Frank Herbert"}))];
    let snapshot_a = SnapshotBuilder::new(&normalizer, LibrarySide::A, "lib_a").build(&a);
    let snapshot_b = SnapshotBuilder::new(&normalizer, LibrarySide::B, "lib_b").build(&b);

    let outcome = LibraryComparator::new(normalizer.differ(TextCase::Sensitive))
        .compare(&snapshot_a, &snapshot_b);

    assert_eq!(outcome.report.matched_count(), 1);
    assert!(outcome.report.added.is_empty());
    assert!(outcome.report.removed.is_empty());
    assert!(outcome.report.is_identical());
}
