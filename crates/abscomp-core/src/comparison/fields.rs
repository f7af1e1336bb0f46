//! Per-field comparison of matched items

use serde::{Deserialize, Serialize};

use crate::model::{FieldKind, FieldValue, NormalizedItem, TrackedField};

/// Whether text fields are compared case-sensitively
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextCase {
    /// Capitalization differences are reported
    #[default]
    Sensitive,
    /// Capitalization differences are ignored
    Insensitive,
}

/// One tracked field whose value differs between a matched pair
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDiscrepancy {
    /// The differing field
    pub field_name: TrackedField,
    /// Value in library A, `None` when absent
    pub value_a: Option<FieldValue>,
    /// Value in library B, `None` when absent
    pub value_b: Option<FieldValue>,
}

/// Compares the tracked attributes of two items
#[derive(Debug, Clone)]
pub struct FieldDiffer {
    fields: Vec<TrackedField>,
    text_case: TextCase,
}

impl Default for FieldDiffer {
    fn default() -> Self {
        Self::new(TrackedField::DEFAULTS.to_vec(), TextCase::default())
    }
}

impl FieldDiffer {
    /// Create a differ over the given fields
    ///
    /// Items only carry the fields their normalizer extracted, so a field
    /// missing from that list is absent on both sides and never differs.
    /// `Normalizer::differ` builds a differ over the normalizer's own fields.
    #[must_use]
    pub const fn new(fields: Vec<TrackedField>, text_case: TextCase) -> Self {
        Self { fields, text_case }
    }

    /// Fields compared, in report order
    #[must_use]
    pub fn fields(&self) -> &[TrackedField] {
        &self.fields
    }

    /// List every tracked field whose values differ
    ///
    /// Absent on both sides is not a discrepancy; absent on one side only is.
    #[must_use]
    pub fn diff(&self, item_a: &NormalizedItem, item_b: &NormalizedItem) -> Vec<FieldDiscrepancy> {
        self.fields
            .iter()
            .filter_map(|&field| {
                let value_a = item_a.attribute(field);
                let value_b = item_b.attribute(field);
                (!self.values_equal(field, value_a, value_b)).then(|| FieldDiscrepancy {
                    field_name: field,
                    value_a: value_a.cloned(),
                    value_b: value_b.cloned(),
                })
            })
            .collect()
    }

    fn values_equal(
        &self,
        field: TrackedField,
        a: Option<&FieldValue>,
        b: Option<&FieldValue>,
    ) -> bool {
        match (a, b) {
            (None, None) => true,
            (Some(_), None) | (None, Some(_)) => false,
            (Some(FieldValue::Text(a)), Some(FieldValue::Text(b))) => {
                let (a, b) = (a.trim(), b.trim());
                match (field.kind(), self.text_case) {
                    (FieldKind::Text, TextCase::Insensitive) => a.to_lowercase() == b.to_lowercase(),
                    _ => a == b,
                }
            }
            (Some(FieldValue::Number(a)), Some(FieldValue::Number(b))) => a == b,
            // A numeric field parsed on one side but kept as text on the other
            (Some(a), Some(b)) => a.to_string() == b.to_string(),
        }
    }
}
