//! Record Data Structures
//!
//! This module defines the persisted `Record` and the values its data map
//! holds. Record data is schemaless at the storage level: whatever the form
//! collected is what round-trips, keyed by property name in insertion order.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Property name whose value supplies a record's display label
pub const TITLE_PROPERTY: &str = "Title";

/// A single value in a record's data map
///
/// Form collection produces strings for everything except Checkbox, but raw
/// numeric JSON written by earlier versions is accepted too.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl FieldValue {
    /// Render the value the way a table cell or picker label shows it
    pub fn display(&self) -> String {
        match self {
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::Number(n) => {
                if n.fract() == 0.0 && n.is_finite() {
                    format!("{}", *n as i64)
                } else {
                    n.to_string()
                }
            }
            FieldValue::Text(s) => s.clone(),
        }
    }

    /// Empty-ish values fall through the display-label chain
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Bool(b) => !b,
            FieldValue::Number(n) => *n == 0.0,
            FieldValue::Text(s) => s.is_empty(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

/// Flat property-name to value map
///
/// Insertion order is preserved so display order and the first-property
/// label fallback stay stable across round-trips.
pub type RecordData = IndexMap<String, FieldValue>;

/// A persisted instance of a schema
///
/// # Fields
///
/// - `id`: auto-assigned integer id; `None` until first persisted
/// - `schema`: owning schema's name at time of last write
/// - `data`: property-name keyed values collected from the form
/// - `created_at`: epoch millis at creation; default sort key (descending)
/// - `created_time` / `created_by` / `last_edited_time` / `last_edited_by`:
///   denormalized provenance strings stamped by the record service, never
///   user-editable through the form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    pub schema: String,

    pub data: RecordData,

    pub created_at: i64,

    pub created_time: String,

    pub created_by: String,

    pub last_edited_time: String,

    pub last_edited_by: String,
}

impl Record {
    /// Build an unsaved record; id and provenance are filled in by the
    /// record service when persisted
    pub fn new(schema: impl Into<String>, data: RecordData) -> Self {
        Self {
            id: None,
            schema: schema.into(),
            data,
            created_at: 0,
            created_time: String::new(),
            created_by: String::new(),
            last_edited_time: String::new(),
            last_edited_by: String::new(),
        }
    }

    /// Display label for relation pickers and relation resolution.
    ///
    /// Falls back from the `Title` value to the first property value to a
    /// `Record #<id>` placeholder when nothing usable is stored.
    pub fn display_label(&self) -> String {
        if let Some(title) = self.data.get(TITLE_PROPERTY) {
            if !title.is_blank() {
                return title.display();
            }
        }

        if let Some(first) = self.data.values().next() {
            if !first.is_blank() {
                return first.display();
            }
        }

        format!("Record #{}", self.id.unwrap_or_default())
    }
}
