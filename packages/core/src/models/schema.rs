//! Schema Data Structures
//!
//! A schema is a named, user-defined record type: a name plus an ordered
//! list of typed property definitions. Shape validation lives here at the
//! model edge; storage accepts whatever it is handed.

use crate::models::property::PropertyDef;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of properties shown in a schema's table-row summary
const SUMMARY_PROPERTY_LIMIT: usize = 4;

/// Validation errors for schema shapes and form submissions
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Schema name must not be empty")]
    MissingSchemaName,

    #[error("Schema '{0}' must define at least one property")]
    NoProperties(String),

    #[error("Missing mandatory fields: {}", .fields.join(", "))]
    MissingMandatoryFields { fields: Vec<String> },
}

/// A named, user-defined record type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// Unique name; primary key of the schema table
    pub name: String,

    /// Ordered property definitions; order is display order
    pub properties: Vec<PropertyDef>,
}

impl Schema {
    /// Validate and build a schema.
    ///
    /// The name is trimmed. Empty names and empty property lists are
    /// rejected here, not by storage, matching the edge-validation rule for
    /// the whole subsystem.
    pub fn new(
        name: impl Into<String>,
        properties: Vec<PropertyDef>,
    ) -> Result<Self, ValidationError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(ValidationError::MissingSchemaName);
        }
        if properties.is_empty() {
            return Err(ValidationError::NoProperties(name));
        }

        Ok(Self { name, properties })
    }

    /// Find a property definition by name; first match wins on duplicates
    pub fn property(&self, name: &str) -> Option<&PropertyDef> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Short "name (type)" summary of the leading properties, for table rows
    pub fn property_summary(&self) -> String {
        let mut summary = self
            .properties
            .iter()
            .take(SUMMARY_PROPERTY_LIMIT)
            .map(|p| format!("{} ({})", p.name, p.kind.label()))
            .collect::<Vec<_>>()
            .join(", ");

        if self.properties.len() > SUMMARY_PROPERTY_LIMIT {
            summary.push_str("...");
        }

        summary
    }
}
