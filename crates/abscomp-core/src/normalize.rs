//! Raw record normalization
//!
//! Two levels of text normalization are applied:
//! - key folding (case-folded, punctuation stripped, whitespace collapsed)
//!   is used only to build canonical keys
//! - attribute values are merely trimmed, so capitalization differences
//!   between libraries still show up as discrepancies

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::NormalizationError;
use crate::model::{
    CanonicalKey, FieldKind, FieldValue, KeySource, LibrarySide, NormalizedItem, RawItem, RawRef,
    TrackedField,
};
use crate::comparison::{FieldDiffer, TextCase};

/// How canonical keys are derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KeyStrategy {
    /// Folded title plus folded primary author
    #[default]
    TitleAuthor,
    /// ASIN only; items without one are skipped
    Asin,
    /// ISBN only; items without one are skipped
    Isbn,
    /// ASIN, then ISBN, then title plus primary author
    ///
    /// Items whose identifier has no counterpart in the other library are
    /// still matched on title and primary author.
    IdentifierFirst,
}

/// Converts raw records into normalized items
#[derive(Debug, Clone)]
pub struct Normalizer {
    strategy: KeyStrategy,
    fields: Vec<TrackedField>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(KeyStrategy::default(), &TrackedField::DEFAULTS)
    }
}

impl Normalizer {
    /// Create a normalizer extracting the given fields
    #[must_use]
    pub fn new(strategy: KeyStrategy, fields: &[TrackedField]) -> Self {
        Self {
            strategy,
            fields: fields.to_vec(),
        }
    }

    /// Key strategy in use
    #[must_use]
    pub const fn strategy(&self) -> KeyStrategy {
        self.strategy
    }

    /// Fields extracted into each item's attributes
    #[must_use]
    pub fn fields(&self) -> &[TrackedField] {
        &self.fields
    }

    /// A differ comparing exactly the fields this normalizer extracts
    #[must_use]
    pub fn differ(&self, text_case: TextCase) -> FieldDiffer {
        FieldDiffer::new(self.fields.clone(), text_case)
    }

    /// Normalize one raw record
    ///
    /// `index` is the record's position in the fetched sequence and is kept
    /// as part of the back-reference for reporting.
    ///
    /// # Errors
    ///
    /// Returns `NormalizationError::MissingTitle` if the title is absent or
    /// blank, or `NormalizationError::MissingIdentifier` if an identifier-only
    /// key strategy is in use and the record lacks that identifier.
    pub fn normalize(
        &self,
        raw: &RawItem,
        index: usize,
        side: LibrarySide,
    ) -> Result<NormalizedItem, NormalizationError> {
        let raw_ref = RawRef::new(index, raw.id.clone());

        let Some(title) = text_field(raw, TrackedField::Title) else {
            return Err(NormalizationError::MissingTitle { side, raw_ref });
        };
        let author = text_field(raw, TrackedField::Author);

        let title_author_key = title_author_key(&title, author.as_deref());
        let (canonical_key, key_source) = match self.strategy {
            KeyStrategy::TitleAuthor => (title_author_key.clone(), KeySource::TitleAuthor),
            KeyStrategy::Asin => {
                let key = asin_key(raw).ok_or_else(|| NormalizationError::MissingIdentifier {
                    side,
                    raw_ref: raw_ref.clone(),
                    title: title.clone(),
                    identifier: "asin",
                })?;
                (key, KeySource::Asin)
            }
            KeyStrategy::Isbn => {
                let key = isbn_key(raw).ok_or_else(|| NormalizationError::MissingIdentifier {
                    side,
                    raw_ref: raw_ref.clone(),
                    title: title.clone(),
                    identifier: "isbn",
                })?;
                (key, KeySource::Isbn)
            }
            KeyStrategy::IdentifierFirst => asin_key(raw)
                .map(|key| (key, KeySource::Asin))
                .or_else(|| isbn_key(raw).map(|key| (key, KeySource::Isbn)))
                .unwrap_or_else(|| (title_author_key.clone(), KeySource::TitleAuthor)),
        };

        let attributes = self
            .fields
            .iter()
            .filter_map(|&field| extract(raw, field).map(|value| (field, value)))
            .collect::<BTreeMap<_, _>>();

        Ok(NormalizedItem {
            canonical_key,
            key_source,
            title_author_key,
            source_library: side,
            title,
            author,
            attributes,
            raw_ref,
        })
    }
}

/// Case-fold, strip punctuation, and collapse whitespace
#[must_use]
pub fn fold_key_text(text: &str) -> String {
    let mut folded = String::with_capacity(text.len());
    for word in text.split_whitespace() {
        let cleaned: String = word
            .chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(char::to_lowercase)
            .collect();
        if cleaned.is_empty() {
            continue;
        }
        if !folded.is_empty() {
            folded.push(' ');
        }
        folded.push_str(&cleaned);
    }
    folded
}

/// First name in a `,`, `;`, or `&` separated author list
#[must_use]
pub fn primary_author(author: &str) -> &str {
    author
        .split([',', ';', '&'])
        .map(str::trim)
        .find(|name| !name.is_empty())
        .unwrap_or("")
}

fn title_author_key(title: &str, author: Option<&str>) -> CanonicalKey {
    let mut folded_title = fold_key_text(title);
    // Titles made only of punctuation still need a non-empty key
    if folded_title.is_empty() {
        folded_title = title.to_lowercase();
    }
    let folded_author = author.map(|a| fold_key_text(primary_author(a))).unwrap_or_default();
    CanonicalKey::new(format!("{folded_title}|{folded_author}"))
}

fn asin_key(raw: &RawItem) -> Option<CanonicalKey> {
    let asin: String = text_field(raw, TrackedField::Asin)?
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect();
    (!asin.is_empty()).then(|| CanonicalKey::new(format!("asin:{asin}")))
}

fn isbn_key(raw: &RawItem) -> Option<CanonicalKey> {
    let isbn: String = text_field(raw, TrackedField::Isbn)?
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_uppercase())
        .collect();
    (!isbn.is_empty()).then(|| CanonicalKey::new(format!("isbn:{isbn}")))
}

fn text_field(raw: &RawItem, field: TrackedField) -> Option<String> {
    raw.get(field.name()).and_then(value_text)
}

/// Render a JSON value as trimmed text; blank and structured values are absent
fn value_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(values) => values
            .iter()
            .filter_map(value_text)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Null | Value::Object(_) => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn extract(raw: &RawItem, field: TrackedField) -> Option<FieldValue> {
    let value = raw.get(field.name())?;
    match field.kind() {
        FieldKind::Text => value_text(value).map(FieldValue::Text),
        FieldKind::Numeric => {
            let number = match value {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => s.trim().parse::<f64>().ok(),
                _ => None,
            }
            .filter(|n| n.is_finite());

            match number {
                Some(n) if field == TrackedField::Duration => Some(FieldValue::Number(n.round())),
                Some(n) => Some(FieldValue::Number(n)),
                // Unparseable numerics (e.g. a "1-2" sequence) are compared as text
                None => value_text(value).map(FieldValue::Text),
            }
        }
    }
}
