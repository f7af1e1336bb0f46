//! Canonical-key matching between two snapshots
//!
//! Items are paired on their canonical key first. Items left over after
//! that pass are paired on title and primary author, unless both carry an
//! identifier of the same kind: an ASIN in one library and none in the
//! other does not split a work in two, but two different ASINs do.

use std::collections::HashMap;

use crate::model::{CanonicalKey, NormalizedItem};
use crate::snapshot::LibrarySnapshot;

/// The same work found in both libraries
#[derive(Debug, Clone, PartialEq)]
pub struct MatchedPair {
    /// Shared canonical key
    pub key: CanonicalKey,
    /// Item from library A
    pub item_a: NormalizedItem,
    /// Item from library B
    pub item_b: NormalizedItem,
}

/// The three partitions produced by matching
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchOutcome {
    /// Items only in library A, in A's order
    pub unmatched_a: Vec<NormalizedItem>,
    /// Items only in library B, in B's order
    pub unmatched_b: Vec<NormalizedItem>,
    /// Items in both libraries, in A's order
    pub matched: Vec<MatchedPair>,
}

/// Pairs items across snapshots by canonical key
pub struct Matcher;

impl Matcher {
    /// Partition two snapshots into unmatched and matched items
    ///
    /// Runs in O(|A| + |B|) for distinct title keys. A key either matches
    /// exactly or not at all.
    #[must_use]
    pub fn match_snapshots(a: &LibrarySnapshot, b: &LibrarySnapshot) -> MatchOutcome {
        let items_a: Vec<&NormalizedItem> = a.iter().collect();
        let items_b: Vec<&NormalizedItem> = b.iter().collect();
        let mut partners: Vec<Option<(usize, &CanonicalKey)>> = vec![None; items_a.len()];
        let mut taken_b = vec![false; items_b.len()];

        let by_key_b: HashMap<&CanonicalKey, usize> = items_b
            .iter()
            .enumerate()
            .map(|(j, item)| (item.canonical_key(), j))
            .collect();
        for (i, &item_a) in items_a.iter().enumerate() {
            if let Some(&j) = by_key_b.get(item_a.canonical_key()) {
                partners[i] = Some((j, item_a.canonical_key()));
                taken_b[j] = true;
            }
        }

        let mut by_title_b: HashMap<&CanonicalKey, Vec<usize>> = HashMap::new();
        for (j, &item_b) in items_b.iter().enumerate() {
            if !taken_b[j] {
                by_title_b.entry(item_b.title_author_key()).or_default().push(j);
            }
        }
        for (i, &item_a) in items_a.iter().enumerate() {
            if partners[i].is_some() {
                continue;
            }
            let Some(candidates) = by_title_b.get(item_a.title_author_key()) else {
                continue;
            };
            let found = candidates
                .iter()
                .copied()
                .find(|&j| !taken_b[j] && !share_identifier_kind(item_a, items_b[j]));
            if let Some(j) = found {
                partners[i] = Some((j, item_a.title_author_key()));
                taken_b[j] = true;
            }
        }

        let mut outcome = MatchOutcome::default();
        for (&item_a, partner) in items_a.iter().zip(&partners) {
            match partner {
                Some((j, key)) => outcome.matched.push(MatchedPair {
                    key: (*key).clone(),
                    item_a: item_a.clone(),
                    item_b: items_b[*j].clone(),
                }),
                None => outcome.unmatched_a.push(item_a.clone()),
            }
        }
        outcome.unmatched_b = items_b
            .iter()
            .zip(&taken_b)
            .filter(|&(_, &taken)| !taken)
            .map(|(&item, _)| item.clone())
            .collect();

        outcome
    }
}

/// Both keys are identifiers of the same kind, so a mismatch is meaningful
fn share_identifier_kind(a: &NormalizedItem, b: &NormalizedItem) -> bool {
    a.key_source().is_identifier() && a.key_source() == b.key_source()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{KeySource, LibrarySide, RawItem, TrackedField};
    use crate::normalize::{KeyStrategy, Normalizer};
    use crate::snapshot::SnapshotBuilder;

    fn snapshot(side: LibrarySide, books: &[(&str, &str)]) -> LibrarySnapshot {
        let raw: Vec<RawItem> = books
            .iter()
            .map(|(title, author)| RawItem::from_iter([("title", *title), ("author", *author)]))
            .collect();
        SnapshotBuilder::new(&Normalizer::default(), side, "lib").build(&raw)
    }

    fn titles(items: &[NormalizedItem]) -> Vec<&str> {
        items.iter().map(NormalizedItem::title).collect()
    }

    #[test]
    fn test_partitions() {
        let a = snapshot(
            LibrarySide::A,
            &[("Dune", "Frank Herbert"), ("Emma", "Jane Austen"), ("Ubik", "Philip K. Dick")],
        );
        let b = snapshot(
            LibrarySide::B,
            &[("Ubik", "Philip K Dick"), ("Solaris", "Stanislaw Lem"), ("Dune", "Frank Herbert")],
        );

        let outcome = Matcher::match_snapshots(&a, &b);

        assert_eq!(titles(&outcome.unmatched_a), ["Emma"]);
        assert_eq!(titles(&outcome.unmatched_b), ["Solaris"]);
        let matched: Vec<_> = outcome.matched.iter().map(|p| p.item_a.title()).collect();
        // Matched pairs follow A's order
        assert_eq!(matched, ["Dune", "Ubik"]);
        assert_eq!(outcome.matched[1].item_b.author(), Some("Philip K Dick"));
        assert_eq!(outcome.matched[1].item_b.source_library(), LibrarySide::B);
    }

    #[test]
    fn test_unmatched_b_keeps_b_order() {
        let a = snapshot(LibrarySide::A, &[]);
        let b = snapshot(
            LibrarySide::B,
            &[("Zorba", "Nikos Kazantzakis"), ("Anathem", "Neal Stephenson"), ("Middlemarch", "George Eliot")],
        );

        let outcome = Matcher::match_snapshots(&a, &b);

        assert_eq!(titles(&outcome.unmatched_b), ["Zorba", "Anathem", "Middlemarch"]);
        assert!(outcome.unmatched_a.is_empty());
        assert!(outcome.matched.is_empty());
    }

    #[test]
    fn test_no_fuzzy_matching() {
        let a = snapshot(LibrarySide::A, &[("Dune", "Frank Herbert")]);
        let b = snapshot(LibrarySide::B, &[("Dune (Unabridged)", "Frank Herbert")]);

        let outcome = Matcher::match_snapshots(&a, &b);

        assert_eq!(outcome.unmatched_a.len(), 1);
        assert_eq!(outcome.unmatched_b.len(), 1);
        assert!(outcome.matched.is_empty());
    }

    fn identified(side: LibrarySide, books: &[(&str, &str, Option<&str>)]) -> LibrarySnapshot {
        let raw: Vec<RawItem> = books
            .iter()
            .map(|&(title, author, asin)| {
                let item = RawItem::new()
                    .with_field("title", title)
                    .with_field("author", author);
                match asin {
                    Some(asin) => item.with_field("asin", asin),
                    None => item,
                }
            })
            .collect();
        let normalizer = Normalizer::new(KeyStrategy::IdentifierFirst, &TrackedField::DEFAULTS);
        SnapshotBuilder::new(&normalizer, side, "lib").build(&raw)
    }

    #[test]
    fn test_identifier_on_one_side_only_still_matches() {
        let a = identified(LibrarySide::A, &[("Dune", "Frank Herbert", Some("B002V1OF70"))]);
        let b = identified(LibrarySide::B, &[("Dune", "Frank Herbert", None)]);

        let outcome = Matcher::match_snapshots(&a, &b);

        assert!(outcome.unmatched_a.is_empty());
        assert!(outcome.unmatched_b.is_empty());
        assert_eq!(outcome.matched.len(), 1);
        assert_eq!(outcome.matched[0].key.as_str(), "dune|frank herbert");
        assert_eq!(outcome.matched[0].item_a.key_source(), KeySource::Asin);
        assert_eq!(outcome.matched[0].item_b.key_source(), KeySource::TitleAuthor);
    }

    #[test]
    fn test_shared_identifier_matches_despite_title() {
        let a = identified(LibrarySide::A, &[("Dune", "Frank Herbert", Some("B002V1OF70"))]);
        let b = identified(LibrarySide::B, &[("Dune: Book One", "Herbert, Frank", Some("B002V1OF70"))]);

        let outcome = Matcher::match_snapshots(&a, &b);

        assert_eq!(outcome.matched.len(), 1);
        assert_eq!(outcome.matched[0].key.as_str(), "asin:B002V1OF70");
    }

    #[test]
    fn test_different_identifiers_do_not_fall_back() {
        let a = identified(LibrarySide::A, &[("Dune", "Frank Herbert", Some("B002V1OF70"))]);
        let b = identified(LibrarySide::B, &[("Dune", "Frank Herbert", Some("B07G2TBTN1"))]);

        let outcome = Matcher::match_snapshots(&a, &b);

        assert!(outcome.matched.is_empty());
        assert_eq!(outcome.unmatched_a.len(), 1);
        assert_eq!(outcome.unmatched_b.len(), 1);
    }

    #[test]
    fn test_fallback_keeps_a_order() {
        let a = identified(
            LibrarySide::A,
            &[
                ("Dune", "Frank Herbert", Some("B002V1OF70")),
                ("Emma", "Jane Austen", None),
                ("Ubik", "Philip K. Dick", None),
            ],
        );
        let b = identified(
            LibrarySide::B,
            &[("Ubik", "Philip K Dick", None), ("Dune", "Frank Herbert", None)],
        );

        let outcome = Matcher::match_snapshots(&a, &b);

        let matched: Vec<_> = outcome.matched.iter().map(|p| p.item_a.title()).collect();
        assert_eq!(matched, ["Dune", "Ubik"]);
        assert_eq!(titles(&outcome.unmatched_a), ["Emma"]);
        assert!(outcome.unmatched_b.is_empty());
    }
}
