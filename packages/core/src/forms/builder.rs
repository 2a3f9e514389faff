//! Form Builder
//!
//! Builds an editable form from a schema: one widget per property, seeded
//! from stored data when editing. Building is async because every relation
//! picker loads its choices from the related schema's records before the
//! form is returned; a built form needs no further queries to render.
//!
//! Submission collects the widgets into a data map, runs mandatory-field
//! validation on the collected values, and only then writes through the
//! record service.

use crate::forms::field::{FieldInput, RelationChoice};
use crate::forms::session::{FormMode, FormSession};
use crate::models::{PropertyKind, RecordData, ValidationError};
use crate::services::error::ServiceError;
use crate::services::record_service::RecordService;
use crate::services::schema_service::SchemaService;
use std::sync::Arc;

/// One rendered field of a built form
#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    /// Bound property name; doubles as the data-map key on collection
    pub name: String,

    /// Whether mandatory validation applies at submit
    pub mandatory: bool,

    /// Editable widget state
    pub input: FieldInput,
}

/// A built form: session context plus one field per schema property
#[derive(Debug, Clone)]
pub struct RecordForm {
    pub session: FormSession,
    pub fields: Vec<FormField>,
}

impl RecordForm {
    /// Mutable access to a field's widget by property name
    pub fn field_mut(&mut self, name: &str) -> Option<&mut FieldInput> {
        self.fields
            .iter_mut()
            .find(|field| field.name == name)
            .map(|field| &mut field.input)
    }

    /// Collect every field into a data map, in field order
    ///
    /// Duplicate property names collapse to one key; the later field wins,
    /// at the position the key first appeared.
    pub fn collect(&self) -> RecordData {
        let mut data = RecordData::new();
        for field in &self.fields {
            data.insert(field.name.clone(), field.input.collect_value());
        }

        data
    }

    /// Names of mandatory fields whose collected value is missing
    ///
    /// Checkbox fields never appear here; false is a present value.
    pub fn missing_mandatory(&self) -> Vec<String> {
        self.fields
            .iter()
            .filter(|field| field.mandatory && field.input.is_empty())
            .map(|field| field.name.clone())
            .collect()
    }
}

/// Builds and submits record forms
#[derive(Clone)]
pub struct FormBuilder {
    schemas: Arc<SchemaService>,
    records: Arc<RecordService>,
}

impl FormBuilder {
    pub fn new(schemas: Arc<SchemaService>, records: Arc<RecordService>) -> Self {
        Self { schemas, records }
    }

    /// Build a form for the session's schema
    ///
    /// In edit mode, widgets are seeded from the record's stored data; keys
    /// the schema no longer defines are ignored. A relation widget is
    /// pre-selected only when the stored id is still among its choices.
    ///
    /// # Errors
    ///
    /// - `SchemaNotFound` if the session names an unregistered schema
    /// - `RecordNotFound` if editing a record that no longer exists
    pub async fn build(&self, session: FormSession) -> Result<RecordForm, ServiceError> {
        let schema = self.schemas.get(&session.schema).await?;

        let existing = match session.mode {
            FormMode::Edit { record_id } => Some(self.records.get(record_id).await?),
            FormMode::Create => None,
        };

        let mut fields = Vec::with_capacity(schema.properties.len());
        for property in &schema.properties {
            let stored = existing
                .as_ref()
                .and_then(|record| record.data.get(&property.name));

            let input = if let PropertyKind::Relation { related_schema } = &property.kind {
                let choices = self.relation_choices(related_schema.as_deref()).await?;
                let selected = stored
                    .and_then(|value| value.display().parse::<i64>().ok())
                    .filter(|id| choices.iter().any(|choice| choice.id == *id));

                FieldInput::Relation { choices, selected }
            } else {
                match stored {
                    Some(value) => FieldInput::seeded(&property.kind, value),
                    None => FieldInput::empty(&property.kind),
                }
            };

            fields.push(FormField {
                name: property.name.clone(),
                mandatory: property.is_mandatory,
                input,
            });
        }

        tracing::debug!(
            "Built form for schema '{}' with {} fields",
            schema.name,
            fields.len()
        );

        Ok(RecordForm { session, fields })
    }

    /// Picker choices for a relation property, newest record first
    ///
    /// A relation without a configured target schema gets an empty picker.
    async fn relation_choices(
        &self,
        related_schema: Option<&str>,
    ) -> Result<Vec<RelationChoice>, ServiceError> {
        let Some(related) = related_schema else {
            return Ok(Vec::new());
        };

        let records = self.records.list(Some(related)).await?;

        Ok(records
            .iter()
            .filter_map(|record| {
                record.id.map(|id| RelationChoice {
                    id,
                    label: record.display_label(),
                })
            })
            .collect())
    }

    /// Validate and persist a form, returning the record id
    ///
    /// Mandatory validation runs on the collected values before anything is
    /// written; a rejected submission leaves the store untouched.
    pub async fn submit(&self, form: &RecordForm) -> Result<i64, ServiceError> {
        let missing = form.missing_mandatory();
        if !missing.is_empty() {
            return Err(ServiceError::Validation(
                ValidationError::MissingMandatoryFields { fields: missing },
            ));
        }

        let data = form.collect();

        match form.session.mode {
            FormMode::Create => self.records.create(form.session.schema.as_str(), data).await,
            FormMode::Edit { record_id } => {
                let updated = self.records.update(record_id, data).await?;
                Ok(updated.id.unwrap_or(record_id))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FieldValue;

    fn text_field(name: &str, mandatory: bool, value: &str) -> FormField {
        let mut input = FieldInput::Text {
            value: String::new(),
        };
        input.set_text(value);

        FormField {
            name: name.to_string(),
            mandatory,
            input,
        }
    }

    #[test]
    fn test_collect_keeps_field_order() {
        let form = RecordForm {
            session: FormSession::create("Task"),
            fields: vec![
                text_field("Title", true, "Ship it"),
                text_field("Notes", false, "tomorrow"),
            ],
        };

        let data = form.collect();
        let keys: Vec<&String> = data.keys().collect();

        assert_eq!(keys, vec!["Title", "Notes"]);
        assert_eq!(data.get("Title"), Some(&FieldValue::from("Ship it")));
    }

    #[test]
    fn test_collect_duplicate_names_later_field_wins() {
        let form = RecordForm {
            session: FormSession::create("Task"),
            fields: vec![
                text_field("Status", false, "first"),
                text_field("Status", false, "second"),
            ],
        };

        let data = form.collect();

        assert_eq!(data.len(), 1);
        assert_eq!(data.get("Status"), Some(&FieldValue::from("second")));
    }

    #[test]
    fn test_missing_mandatory_skips_checkbox() {
        let form = RecordForm {
            session: FormSession::create("Task"),
            fields: vec![
                text_field("Title", true, ""),
                text_field("Notes", false, ""),
                FormField {
                    name: "Done".to_string(),
                    mandatory: true,
                    input: FieldInput::Checkbox { checked: false },
                },
            ],
        };

        assert_eq!(form.missing_mandatory(), vec!["Title".to_string()]);
    }

    #[test]
    fn test_field_mut_finds_by_name() {
        let mut form = RecordForm {
            session: FormSession::create("Task"),
            fields: vec![text_field("Title", true, "")],
        };

        if let Some(input) = form.field_mut("Title") {
            input.set_text("filled in");
        }

        assert!(form.field_mut("Missing").is_none());
        assert_eq!(
            form.collect().get("Title"),
            Some(&FieldValue::from("filled in"))
        );
    }
}
