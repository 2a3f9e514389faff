//! Form Sessions
//!
//! A form session names the schema being filled in and whether the form
//! creates a new record or edits an existing one. The session travels with
//! the built form through submission, so no mode state lives anywhere else.

use serde::{Deserialize, Serialize};

/// What a submitted form does with its collected data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum FormMode {
    /// Submission stores a new record
    Create,

    /// Submission replaces the data of an existing record
    Edit {
        #[serde(rename = "recordId")]
        record_id: i64,
    },
}

/// Context for one form build/submit cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSession {
    /// Schema the form is built from
    pub schema: String,

    #[serde(flatten)]
    pub mode: FormMode,
}

impl FormSession {
    /// Session for creating a new record of a schema
    pub fn create(schema: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            mode: FormMode::Create,
        }
    }

    /// Session for editing an existing record
    pub fn edit(schema: impl Into<String>, record_id: i64) -> Self {
        Self {
            schema: schema.into(),
            mode: FormMode::Edit { record_id },
        }
    }
}
