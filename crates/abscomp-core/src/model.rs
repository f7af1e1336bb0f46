//! Item, key, and field value types
//!
//! `RawItem` is the untyped record handed over by the fetch layer. Everything
//! else in this module is produced by the normalizer and never mutated
//! afterwards.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// Which side of the comparison a library or item belongs to
///
/// Library A is the baseline and library B the candidate, so "added" always
/// means "only in B" and "removed" means "only in A".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LibrarySide {
    /// Baseline library
    A,
    /// Candidate library
    B,
}

impl fmt::Display for LibrarySide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => f.write_str("A"),
            Self::B => f.write_str("B"),
        }
    }
}

/// A catalog record as returned by the remote server
///
/// Field names are the `TrackedField` names (`title`, `author`, ...). Values
/// are arbitrary JSON; only the normalizer looks inside them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawItem {
    /// Server-side identifier, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Metadata fields keyed by name
    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,
}

impl RawItem {
    /// Create an empty record
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the server-side identifier
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set a metadata field
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Look up a metadata field
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

impl<K, V> FromIterator<(K, V)> for RawItem
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            id: None,
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Back-reference from a normalized item to the raw record it came from
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RawRef {
    /// Position of the record in the fetched sequence
    pub index: usize,
    /// Server-side identifier, if the record had one
    pub id: Option<String>,
}

impl RawRef {
    /// Create a new back-reference
    #[must_use]
    pub const fn new(index: usize, id: Option<String>) -> Self {
        Self { index, id }
    }
}

impl fmt::Display for RawRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.id {
            Some(id) => write!(f, "#{} ({id})", self.index),
            None => write!(f, "#{}", self.index),
        }
    }
}

/// Identifier used to pair the same work across two libraries
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CanonicalKey(String);

impl CanonicalKey {
    /// Wrap an already-normalized key string
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The key as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CanonicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What a canonical key was derived from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum KeySource {
    /// Folded title and primary author
    TitleAuthor,
    /// Audible ASIN
    Asin,
    /// ISBN
    Isbn,
}

impl KeySource {
    /// Whether the key is an external identifier
    #[must_use]
    pub const fn is_identifier(self) -> bool {
        !matches!(self, Self::TitleAuthor)
    }
}

/// How a tracked field is compared
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Trimmed string comparison
    Text,
    /// Exact numeric comparison
    Numeric,
}

/// Metadata fields that can be extracted and compared
///
/// Declaration order is the order used in every report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackedField {
    /// Book title
    Title,
    /// Author name(s) as displayed by the server
    Author,
    /// Narrator name(s)
    Narrator,
    /// Series name
    Series,
    /// Position within the series
    SeriesSequence,
    /// Total duration in whole seconds
    Duration,
    /// Year of publication
    PublishedYear,
    /// Audible ASIN
    Asin,
    /// ISBN
    Isbn,
    /// Publisher name
    Publisher,
    /// When the item was added to the library, in epoch milliseconds
    AddedAt,
    /// Number of audio files
    NumAudioFiles,
    /// Total size in bytes
    Size,
}

impl TrackedField {
    /// Every field, in report order
    pub const ALL: [Self; 13] = [
        Self::Title,
        Self::Author,
        Self::Narrator,
        Self::Series,
        Self::SeriesSequence,
        Self::Duration,
        Self::PublishedYear,
        Self::Asin,
        Self::Isbn,
        Self::Publisher,
        Self::AddedAt,
        Self::NumAudioFiles,
        Self::Size,
    ];

    /// Fields compared when the configuration does not name any
    pub const DEFAULTS: [Self; 7] = [
        Self::Title,
        Self::Author,
        Self::Narrator,
        Self::Series,
        Self::SeriesSequence,
        Self::Duration,
        Self::PublishedYear,
    ];

    /// Field name as used in raw records, config files, and exports
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Author => "author",
            Self::Narrator => "narrator",
            Self::Series => "series",
            Self::SeriesSequence => "series_sequence",
            Self::Duration => "duration",
            Self::PublishedYear => "published_year",
            Self::Asin => "asin",
            Self::Isbn => "isbn",
            Self::Publisher => "publisher",
            Self::AddedAt => "added_at",
            Self::NumAudioFiles => "num_audio_files",
            Self::Size => "size",
        }
    }

    /// Comparison rule for this field
    #[must_use]
    pub const fn kind(self) -> FieldKind {
        match self {
            Self::SeriesSequence
            | Self::Duration
            | Self::PublishedYear
            | Self::AddedAt
            | Self::NumAudioFiles
            | Self::Size => FieldKind::Numeric,
            _ => FieldKind::Text,
        }
    }
}

impl fmt::Display for TrackedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A normalized attribute value
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Trimmed, non-empty text
    Text(String),
    /// Finite number
    Number(f64),
}

impl FieldValue {
    /// The number as an integer when it has no fractional part
    #[allow(clippy::cast_possible_truncation)]
    fn as_integer(&self) -> Option<i64> {
        match *self {
            Self::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => Some(n as i64),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => match self.as_integer() {
                Some(i) => write!(f, "{i}"),
                None => write!(f, "{n}"),
            },
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Text(s) => serializer.serialize_str(s),
            Self::Number(n) => match self.as_integer() {
                Some(i) => serializer.serialize_i64(i),
                None => serializer.serialize_f64(*n),
            },
        }
    }
}

/// A raw record after validation and projection onto the tracked fields
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedItem {
    pub(crate) canonical_key: CanonicalKey,
    #[serde(skip)]
    pub(crate) key_source: KeySource,
    #[serde(skip)]
    pub(crate) title_author_key: CanonicalKey,
    pub(crate) source_library: LibrarySide,
    pub(crate) title: String,
    pub(crate) author: Option<String>,
    pub(crate) attributes: BTreeMap<TrackedField, FieldValue>,
    pub(crate) raw_ref: RawRef,
}

impl NormalizedItem {
    /// Key used for cross-library matching
    #[must_use]
    pub const fn canonical_key(&self) -> &CanonicalKey {
        &self.canonical_key
    }

    /// What the canonical key was derived from
    #[must_use]
    pub const fn key_source(&self) -> KeySource {
        self.key_source
    }

    /// Title and author key, equal to the canonical key unless an identifier
    /// was used
    #[must_use]
    pub const fn title_author_key(&self) -> &CanonicalKey {
        &self.title_author_key
    }

    /// Library this item was fetched from
    #[must_use]
    pub const fn source_library(&self) -> LibrarySide {
        self.source_library
    }

    /// Trimmed display title
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Trimmed display author, if present
    #[must_use]
    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    /// Value of a tracked attribute, `None` when absent
    #[must_use]
    pub fn attribute(&self, field: TrackedField) -> Option<&FieldValue> {
        self.attributes.get(&field)
    }

    /// All tracked attributes that have a value
    #[must_use]
    pub const fn attributes(&self) -> &BTreeMap<TrackedField, FieldValue> {
        &self.attributes
    }

    /// Back-reference to the raw record
    #[must_use]
    pub const fn raw_ref(&self) -> &RawRef {
        &self.raw_ref
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_item_builder() {
        let item = RawItem::new()
            .with_id("li_1")
            .with_field("title", "Dune")
            .with_field("duration", 75_600);

        assert_eq!(item.id.as_deref(), Some("li_1"));
        assert_eq!(item.get("title"), Some(&Value::from("Dune")));
        assert!(item.get("narrator").is_none());
    }

    #[test]
    fn test_raw_item_deserializes_flat_mapping() {
        let item: RawItem =
            serde_json::from_str(r#"{"id":"li_7","title":"Dune","author":"Frank Herbert"}"#)
                .unwrap();

        assert_eq!(item.id.as_deref(), Some("li_7"));
        assert_eq!(item.fields.len(), 2);
    }

    #[test]
    fn test_field_value_display_and_serde() {
        assert_eq!(FieldValue::Number(1965.0).to_string(), "1965");
        assert_eq!(FieldValue::Number(1.5).to_string(), "1.5");
        assert_eq!(serde_json::to_string(&FieldValue::Number(3.0)).unwrap(), "3");
        assert_eq!(
            serde_json::to_string(&FieldValue::Text("Jane Doe".to_string())).unwrap(),
            r#""Jane Doe""#
        );
    }

    #[test]
    fn test_tracked_field_names_match_serde() {
        for field in TrackedField::ALL {
            let json = serde_json::to_string(&field).unwrap();
            assert_eq!(json, format!("\"{}\"", field.name()));
        }
    }

    #[test]
    fn test_numeric_fields() {
        assert_eq!(TrackedField::Duration.kind(), FieldKind::Numeric);
        assert_eq!(TrackedField::SeriesSequence.kind(), FieldKind::Numeric);
        assert_eq!(TrackedField::Size.kind(), FieldKind::Numeric);
        assert_eq!(TrackedField::Narrator.kind(), FieldKind::Text);
    }

    #[test]
    fn test_raw_ref_display() {
        assert_eq!(RawRef::new(3, None).to_string(), "#3");
        assert_eq!(RawRef::new(3, Some("li_3".to_string())).to_string(), "#3 (li_3)");
    }
}
