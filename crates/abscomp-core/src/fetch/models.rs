//! Wire types of the library items endpoint

use serde::Deserialize;
use serde_json::Value;

use crate::model::{RawItem, TrackedField};

/// One page of `GET /api/libraries/{id}/items`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemsPage {
    /// Items on this page
    #[serde(default)]
    pub results: Vec<LibraryItem>,
    /// Total items in the library, when the server reports it
    #[serde(default)]
    pub total: Option<usize>,
    /// Page size the server applied
    #[serde(default)]
    pub limit: Option<u32>,
    /// Zero-based page number
    #[serde(default)]
    pub page: Option<u32>,
}

/// One library item
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryItem {
    /// Server-side item identifier
    #[serde(default)]
    pub id: Option<String>,
    /// When the item was added, in epoch milliseconds
    #[serde(default)]
    pub added_at: Option<Value>,
    /// Book media
    #[serde(default)]
    pub media: Media,
}

/// Media portion of a library item
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    /// Book metadata
    #[serde(default)]
    pub metadata: Metadata,
    /// Total duration in seconds
    #[serde(default)]
    pub duration: Option<Value>,
    /// Number of audio files
    #[serde(default)]
    pub num_audio_files: Option<Value>,
    /// Total size in bytes
    #[serde(default)]
    pub size: Option<Value>,
}

/// Book metadata in the minified form the listing returns
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    /// Title
    #[serde(default)]
    pub title: Option<String>,
    /// Comma-separated author names
    #[serde(default)]
    pub author_name: Option<String>,
    /// Comma-separated narrator names
    #[serde(default)]
    pub narrator_name: Option<String>,
    /// Comma-separated `Series #sequence` entries
    #[serde(default)]
    pub series_name: Option<String>,
    /// Publication year, string or number
    #[serde(default)]
    pub published_year: Option<Value>,
    /// Audible ASIN
    #[serde(default)]
    pub asin: Option<String>,
    /// ISBN
    #[serde(default)]
    pub isbn: Option<String>,
    /// Publisher
    #[serde(default)]
    pub publisher: Option<String>,
}

impl LibraryItem {
    /// Flatten into a raw record keyed by tracked field name
    #[must_use]
    pub fn into_raw(self) -> RawItem {
        let metadata = self.media.metadata;
        let mut raw = RawItem {
            id: self.id,
            ..RawItem::default()
        };

        let mut set = |field: TrackedField, value: Option<Value>| {
            if let Some(value) = value.filter(|v| !v.is_null()) {
                raw.fields.insert(field.name().to_string(), value);
            }
        };

        set(TrackedField::Title, metadata.title.map(Value::from));
        set(TrackedField::Author, metadata.author_name.map(Value::from));
        set(TrackedField::Narrator, metadata.narrator_name.map(Value::from));
        if let Some((series, sequence)) = metadata.series_name.as_deref().and_then(split_series) {
            set(TrackedField::Series, Some(Value::from(series)));
            set(TrackedField::SeriesSequence, sequence.map(Value::from));
        }
        set(TrackedField::Duration, self.media.duration);
        set(TrackedField::PublishedYear, metadata.published_year);
        set(TrackedField::Asin, metadata.asin.map(Value::from));
        set(TrackedField::Isbn, metadata.isbn.map(Value::from));
        set(TrackedField::Publisher, metadata.publisher.map(Value::from));
        set(TrackedField::AddedAt, self.added_at);
        set(TrackedField::NumAudioFiles, self.media.num_audio_files);
        set(TrackedField::Size, self.media.size);

        raw
    }
}

/// Split the first `Series #sequence` entry of a series listing
///
/// Returns `None` for a blank listing. The sequence is `None` when the entry
/// carries no ` #` marker.
#[must_use]
pub fn split_series(series_name: &str) -> Option<(&str, Option<&str>)> {
    let first = series_name.split(", ").next()?.trim();
    if first.is_empty() {
        return None;
    }
    match first.rsplit_once(" #") {
        Some((name, sequence)) if !name.trim().is_empty() => {
            let sequence = sequence.trim();
            Some((name.trim(), (!sequence.is_empty()).then_some(sequence)))
        }
        _ => Some((first, None)),
    }
}
