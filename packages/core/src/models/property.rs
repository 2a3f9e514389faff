//! Property Definitions
//!
//! This module defines the typed property system for user-defined schemas.
//! Every property carries a `PropertyKind` with one variant per supported
//! type; widget choice, value collection, and validation all select behavior
//! by matching on the variant, never by comparing type-name strings.
//!
//! # Serialized Layout
//!
//! `PropertyKind` is internally tagged with `type`, so a property definition
//! stays flat on disk:
//!
//! ```json
//! {"name": "Priority", "type": "Select", "options": ["Low", "High"], "isMandatory": false}
//! ```

use serde::{Deserialize, Serialize};

/// Typed property kinds supported by schemas
///
/// Serialized with an internal `type` tag; variant payloads (select options,
/// relation target) merge flat into the property object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PropertyKind {
    /// Primary label field; feeds relation display labels
    Title,

    /// Single-line text
    Text,

    /// Numeric value, fractional allowed, kept in string form by the form
    Number,

    /// Enumerated choice over a fixed option list
    Select {
        #[serde(default)]
        options: Vec<String>,
    },

    /// Reference to a record of another (or the same) schema, stored as the
    /// target record's id
    Relation {
        #[serde(
            rename = "relatedSchema",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        related_schema: Option<String>,
    },

    /// Calendar date in `YYYY-MM-DD` form
    Date,

    /// Date and time in `YYYY-MM-DD HH:mm` form
    DateTime,

    /// Boolean toggle
    Checkbox,
}

impl PropertyKind {
    /// Display name of the kind, as shown in schema summaries
    pub fn label(&self) -> &'static str {
        match self {
            PropertyKind::Title => "Title",
            PropertyKind::Text => "Text",
            PropertyKind::Number => "Number",
            PropertyKind::Select { .. } => "Select",
            PropertyKind::Relation { .. } => "Relation",
            PropertyKind::Date => "Date",
            PropertyKind::DateTime => "DateTime",
            PropertyKind::Checkbox => "Checkbox",
        }
    }
}

/// A single typed field definition within a schema
///
/// Property order inside a schema is display order. Names are not
/// deduplicated by storage; colliding names overwrite each other when the
/// form collects values keyed by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDef {
    /// Field name; the key this property's value is stored under
    pub name: String,

    /// Typed kind with per-kind payload
    #[serde(flatten)]
    pub kind: PropertyKind,

    /// Mandatory fields reject empty values on form submit (Checkbox exempt)
    #[serde(rename = "isMandatory", default)]
    pub is_mandatory: bool,
}

impl PropertyDef {
    /// Create an optional property
    pub fn new(name: impl Into<String>, kind: PropertyKind) -> Self {
        Self {
            name: name.into(),
            kind,
            is_mandatory: false,
        }
    }

    /// Create a mandatory property
    pub fn mandatory(name: impl Into<String>, kind: PropertyKind) -> Self {
        Self {
            name: name.into(),
            kind,
            is_mandatory: true,
        }
    }
}
