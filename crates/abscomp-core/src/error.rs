//! Errors and non-fatal warnings raised while building snapshots

use thiserror::Error;

use crate::model::{CanonicalKey, LibrarySide, RawRef};

/// Result type alias using `anyhow::Error`
pub type Result<T> = anyhow::Result<T>;

/// A raw record lacks the fields needed to derive a canonical key
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizationError {
    /// Title is absent or blank after trimming
    #[error("library {side}: item {raw_ref} has no title")]
    MissingTitle {
        /// Library the item came from
        side: LibrarySide,
        /// Position and identifier of the raw record
        raw_ref: RawRef,
    },
    /// The key strategy requires an identifier the item does not carry
    #[error("library {side}: item {raw_ref} \"{title}\" has no {identifier}")]
    MissingIdentifier {
        /// Library the item came from
        side: LibrarySide,
        /// Position and identifier of the raw record
        raw_ref: RawRef,
        /// Title of the item, for reporting
        title: String,
        /// Name of the missing identifier (`asin` or `isbn`)
        identifier: &'static str,
    },
}

/// Two records in one library normalized to the same canonical key
///
/// The first record is kept and the later one dropped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "library {side}: duplicate key \"{key}\", kept item {kept}, dropped item {dropped} \"{dropped_title}\""
)]
pub struct DuplicateKeyWarning {
    /// Library both records came from
    pub side: LibrarySide,
    /// The shared canonical key
    pub key: CanonicalKey,
    /// Record that stays in the snapshot
    pub kept: RawRef,
    /// Record that was dropped
    pub dropped: RawRef,
    /// Title of the dropped record
    pub dropped_title: String,
}

/// Non-fatal problem collected while building a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Warning {
    /// An item was skipped because it could not be normalized
    #[error(transparent)]
    Normalization(#[from] NormalizationError),
    /// An item was dropped because its key was already taken
    #[error(transparent)]
    DuplicateKey(#[from] DuplicateKeyWarning),
}

impl Warning {
    /// Library the warning refers to
    #[must_use]
    pub const fn side(&self) -> LibrarySide {
        match self {
            Self::Normalization(
                NormalizationError::MissingTitle { side, .. }
                | NormalizationError::MissingIdentifier { side, .. },
            ) => *side,
            Self::DuplicateKey(warning) => warning.side,
        }
    }
}
