//! Form Field Widgets
//!
//! Editable widget state for each property kind. A built form holds one
//! `FieldInput` per schema property; the embedding UI mutates inputs through
//! the typed operations here and never touches raw strings it did not type.
//!
//! Title and Text share the plain text widget. Number, Date and DateTime are
//! also text-backed (their pickers overwrite the text), so collected values
//! for all of them are strings; Checkbox is the only boolean-producing
//! widget.

use crate::models::{FieldValue, PropertyKind};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Text shape written by the date picker
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One pickable target record for a relation field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationChoice {
    pub id: i64,
    pub label: String,
}

/// Editable state of a single form widget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FieldInput {
    /// Plain text entry (Title and Text properties)
    Text { value: String },

    /// Numeric entry; kept as typed text, fractional allowed
    Number { value: String },

    /// Single-select over the property's declared options
    Select {
        options: Vec<String>,
        selected: Option<String>,
    },

    /// `YYYY-MM-DD` text with picker overwrite
    Date { value: String },

    /// `YYYY-MM-DD HH:MM` text with picker overwrite
    DateTime { value: String },

    /// Picker over the related schema's records
    Relation {
        choices: Vec<RelationChoice>,
        selected: Option<i64>,
    },

    /// Boolean toggle
    Checkbox { checked: bool },
}

impl FieldInput {
    /// Blank widget for a property kind
    ///
    /// Relation inputs start with no choices; the form builder fills them
    /// in from the related schema's records.
    pub fn empty(kind: &PropertyKind) -> Self {
        match kind {
            PropertyKind::Title | PropertyKind::Text => Self::Text {
                value: String::new(),
            },
            PropertyKind::Number => Self::Number {
                value: String::new(),
            },
            PropertyKind::Select { options } => Self::Select {
                options: options.clone(),
                selected: None,
            },
            PropertyKind::Relation { .. } => Self::Relation {
                choices: Vec::new(),
                selected: None,
            },
            PropertyKind::Date => Self::Date {
                value: String::new(),
            },
            PropertyKind::DateTime => Self::DateTime {
                value: String::new(),
            },
            PropertyKind::Checkbox => Self::Checkbox { checked: false },
        }
    }

    /// Widget pre-populated from a stored value
    pub fn seeded(kind: &PropertyKind, value: &FieldValue) -> Self {
        let mut input = Self::empty(kind);
        input.seed(value);
        input
    }

    fn seed(&mut self, stored: &FieldValue) {
        match self {
            Self::Text { value }
            | Self::Number { value }
            | Self::Date { value }
            | Self::DateTime { value } => {
                *value = stored.display();
            }
            Self::Select { selected, .. } => {
                let shown = stored.display();
                *selected = if shown.is_empty() { None } else { Some(shown) };
            }
            Self::Relation { selected, .. } => {
                // Stored relation values are id strings
                *selected = stored.display().parse::<i64>().ok();
            }
            Self::Checkbox { checked } => {
                *checked = matches!(stored, FieldValue::Bool(true));
            }
        }
    }

    /// Replace the text of a text-backed widget; no-op for other kinds
    pub fn set_text(&mut self, text: impl Into<String>) {
        if let Self::Text { value }
        | Self::Number { value }
        | Self::Date { value }
        | Self::DateTime { value } = self
        {
            *value = text.into();
        }
    }

    /// Choose a select option, or clear the selection with `None`
    pub fn select_option(&mut self, option: Option<String>) {
        if let Self::Select { selected, .. } = self {
            *selected = option;
        }
    }

    /// Choose a relation target, or clear the selection with `None`
    pub fn select_relation(&mut self, target: Option<i64>) {
        if let Self::Relation { selected, .. } = self {
            *selected = target;
        }
    }

    /// Flip a checkbox
    pub fn toggle(&mut self) {
        if let Self::Checkbox { checked } = self {
            *checked = !*checked;
        }
    }

    /// Overwrite a date field from the date picker
    pub fn apply_picker_date(&mut self, picked: NaiveDate) {
        if let Self::Date { value } = self {
            *value = picked.format(DATE_FORMAT).to_string();
        }
    }

    /// Overwrite a date-time field from the picker
    ///
    /// Pickers hand back `YYYY-MM-DDTHH:MM`; the `T` separator is
    /// normalized to a space.
    pub fn apply_picker_datetime(&mut self, picked: &str) {
        if let Self::DateTime { value } = self {
            *value = picked.replacen('T', " ", 1);
        }
    }

    /// Current value as it would be stored
    ///
    /// Text-backed widgets trim; a cleared select or relation collects as
    /// the empty string, not as an absent key.
    pub fn collect_value(&self) -> FieldValue {
        match self {
            Self::Text { value }
            | Self::Number { value }
            | Self::Date { value }
            | Self::DateTime { value } => FieldValue::Text(value.trim().to_string()),
            Self::Select { selected, .. } => {
                FieldValue::Text(selected.clone().unwrap_or_default())
            }
            Self::Relation { selected, .. } => {
                FieldValue::Text(selected.map(|id| id.to_string()).unwrap_or_default())
            }
            Self::Checkbox { checked } => FieldValue::Bool(*checked),
        }
    }

    /// Whether the collected value counts as missing for mandatory checks
    pub fn is_empty(&self) -> bool {
        match self.collect_value() {
            FieldValue::Text(text) => text.is_empty(),
            // An unchecked checkbox is a real value, never a missing one
            FieldValue::Bool(_) => false,
            FieldValue::Number(_) => false,
        }
    }
}
