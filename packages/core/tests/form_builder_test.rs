//! Integration tests for FormBuilder
//!
//! Tests cover:
//! - Widget selection per property kind on create forms
//! - Seeding from stored data on edit forms
//! - Relation picker population and pre-selection
//! - Mandatory-field validation at submit (checkbox exemption included)
//! - Create-then-edit roundtrips through forms only

use anyhow::Result;
use notegrid_core::db::RecordStore;
use notegrid_core::forms::{FieldInput, FormBuilder, FormSession};
use notegrid_core::models::{FieldValue, PropertyDef, PropertyKind, RecordData, ValidationError};
use notegrid_core::services::{RecordService, SchemaService, ServiceError};
use std::sync::Arc;
use tempfile::TempDir;

/// Helper: full service stack over a file-backed store in a temp dir
async fn create_test_env() -> Result<(
    Arc<SchemaService>,
    Arc<RecordService>,
    FormBuilder,
    TempDir,
)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let store = Arc::new(RecordStore::new(db_path).await?);

    let schemas = Arc::new(SchemaService::new(store.clone()));
    let records = Arc::new(RecordService::new(store));
    let forms = FormBuilder::new(schemas.clone(), records.clone());

    Ok((schemas, records, forms, temp_dir))
}

/// Helper: one property of every widget-relevant kind
fn full_properties() -> Vec<PropertyDef> {
    vec![
        PropertyDef::mandatory("Title", PropertyKind::Title),
        PropertyDef::new("Estimate", PropertyKind::Number),
        PropertyDef::new(
            "Priority",
            PropertyKind::Select {
                options: vec!["Low".to_string(), "High".to_string()],
            },
        ),
        PropertyDef::new("Due", PropertyKind::Date),
        PropertyDef::new("Reviewed", PropertyKind::DateTime),
        PropertyDef::new("Done", PropertyKind::Checkbox),
    ]
}

/// Helper: a schema with a relation pointing at Task
fn project_properties() -> Vec<PropertyDef> {
    vec![
        PropertyDef::mandatory("Name", PropertyKind::Title),
        PropertyDef::new(
            "Key Task",
            PropertyKind::Relation {
                related_schema: Some("Task".to_string()),
            },
        ),
    ]
}

/// Helper: single-entry data map
fn title_data(title: &str) -> RecordData {
    let mut data = RecordData::new();
    data.insert("Title".to_string(), FieldValue::from(title));
    data
}

#[tokio::test]
async fn test_create_form_picks_widget_per_kind() -> Result<()> {
    let (schemas, _records, forms, _temp_dir) = create_test_env().await?;

    schemas.create("Task", full_properties()).await?;
    let form = forms.build(FormSession::create("Task")).await?;

    assert_eq!(form.fields.len(), 6);

    assert_eq!(form.fields[0].name, "Title");
    assert!(form.fields[0].mandatory);
    assert!(matches!(form.fields[0].input, FieldInput::Text { .. }));

    assert!(matches!(form.fields[1].input, FieldInput::Number { .. }));

    match &form.fields[2].input {
        FieldInput::Select { options, selected } => {
            assert_eq!(options, &vec!["Low".to_string(), "High".to_string()]);
            assert!(selected.is_none());
        }
        other => panic!("Expected Select widget, got {:?}", other),
    }

    assert!(matches!(form.fields[3].input, FieldInput::Date { .. }));
    assert!(matches!(form.fields[4].input, FieldInput::DateTime { .. }));
    assert!(matches!(
        form.fields[5].input,
        FieldInput::Checkbox { checked: false }
    ));

    Ok(())
}

#[tokio::test]
async fn test_build_missing_schema_fails() -> Result<()> {
    let (_schemas, _records, forms, _temp_dir) = create_test_env().await?;

    let result = forms.build(FormSession::create("Ghost")).await;
    assert!(matches!(result, Err(ServiceError::SchemaNotFound { .. })));

    Ok(())
}

#[tokio::test]
async fn test_build_edit_missing_record_fails() -> Result<()> {
    let (schemas, _records, forms, _temp_dir) = create_test_env().await?;

    schemas.create("Task", full_properties()).await?;

    let result = forms.build(FormSession::edit("Task", 404)).await;
    assert!(matches!(result, Err(ServiceError::RecordNotFound { .. })));

    Ok(())
}

#[tokio::test]
async fn test_relation_picker_lists_targets_newest_first() -> Result<()> {
    let (schemas, records, forms, _temp_dir) = create_test_env().await?;

    schemas.create("Task", full_properties()).await?;
    schemas.create("Project", project_properties()).await?;

    let first = records.create("Task", title_data("Ship spec")).await?;
    let second = records.create("Task", title_data("Write tests")).await?;

    let form = forms.build(FormSession::create("Project")).await?;
    match &form.fields[1].input {
        FieldInput::Relation { choices, selected } => {
            assert_eq!(choices.len(), 2);
            assert_eq!(choices[0].id, second);
            assert_eq!(choices[0].label, "Write tests");
            assert_eq!(choices[1].id, first);
            assert_eq!(choices[1].label, "Ship spec");
            assert!(selected.is_none());
        }
        other => panic!("Expected Relation widget, got {:?}", other),
    }

    Ok(())
}

#[tokio::test]
async fn test_edit_form_preselects_stored_relation_target() -> Result<()> {
    let (schemas, records, forms, _temp_dir) = create_test_env().await?;

    schemas.create("Task", full_properties()).await?;
    schemas.create("Project", project_properties()).await?;
    let task = records.create("Task", title_data("Ship spec")).await?;

    let mut data = RecordData::new();
    data.insert("Name".to_string(), FieldValue::from("Launch"));
    data.insert("Key Task".to_string(), FieldValue::from(task.to_string()));
    let project = records.create("Project", data).await?;

    let form = forms.build(FormSession::edit("Project", project)).await?;
    match &form.fields[1].input {
        FieldInput::Relation { selected, .. } => assert_eq!(*selected, Some(task)),
        other => panic!("Expected Relation widget, got {:?}", other),
    }

    Ok(())
}

#[tokio::test]
async fn test_edit_form_clears_preselection_when_target_deleted() -> Result<()> {
    let (schemas, records, forms, _temp_dir) = create_test_env().await?;

    schemas.create("Task", full_properties()).await?;
    schemas.create("Project", project_properties()).await?;
    let doomed = records.create("Task", title_data("Doomed")).await?;
    let survivor = records.create("Task", title_data("Survivor")).await?;

    let mut data = RecordData::new();
    data.insert("Name".to_string(), FieldValue::from("Launch"));
    data.insert("Key Task".to_string(), FieldValue::from(doomed.to_string()));
    let project = records.create("Project", data).await?;

    records.delete(doomed).await?;

    let form = forms.build(FormSession::edit("Project", project)).await?;
    match &form.fields[1].input {
        FieldInput::Relation { choices, selected } => {
            // The stored id no longer matches a choice, so nothing is
            // pre-selected
            assert!(selected.is_none());
            assert_eq!(choices.len(), 1);
            assert_eq!(choices[0].id, survivor);
        }
        other => panic!("Expected Relation widget, got {:?}", other),
    }

    Ok(())
}

#[tokio::test]
async fn test_submit_rejects_missing_mandatory_without_writing() -> Result<()> {
    let (schemas, records, forms, _temp_dir) = create_test_env().await?;

    schemas.create("Task", full_properties()).await?;

    let form = forms.build(FormSession::create("Task")).await?;
    let result = forms.submit(&form).await;

    match result {
        Err(ServiceError::Validation(ValidationError::MissingMandatoryFields { fields })) => {
            assert_eq!(fields, vec!["Title".to_string()]);
        }
        other => panic!("Expected MissingMandatoryFields, got {:?}", other),
    }

    assert!(records.list(Some("Task")).await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_submit_collects_every_field_with_checkbox_exempt() -> Result<()> {
    let (schemas, records, forms, _temp_dir) = create_test_env().await?;

    schemas.create("Task", full_properties()).await?;

    let mut form = forms.build(FormSession::create("Task")).await?;
    if let Some(input) = form.field_mut("Title") {
        input.set_text("Ship it");
    }

    // Done stays unchecked; submission must still pass and store false
    let id = forms.submit(&form).await?;
    let stored = records.get(id).await?;

    assert_eq!(stored.data.len(), 6);
    assert_eq!(stored.data.get("Title"), Some(&FieldValue::from("Ship it")));
    assert_eq!(stored.data.get("Done"), Some(&FieldValue::Bool(false)));
    assert_eq!(stored.data.get("Priority"), Some(&FieldValue::from("")));

    Ok(())
}

#[tokio::test]
async fn test_create_then_edit_roundtrip() -> Result<()> {
    let (schemas, records, forms, _temp_dir) = create_test_env().await?;

    schemas.create("Task", full_properties()).await?;

    let mut form = forms.build(FormSession::create("Task")).await?;
    if let Some(input) = form.field_mut("Title") {
        input.set_text("v1");
    }
    if let Some(input) = form.field_mut("Estimate") {
        input.set_text("3.5");
    }
    if let Some(input) = form.field_mut("Priority") {
        input.select_option(Some("High".to_string()));
    }
    if let Some(input) = form.field_mut("Done") {
        input.toggle();
    }
    let id = forms.submit(&form).await?;

    // The edit form seeds every stored value back into its widget
    let mut edit = forms.build(FormSession::edit("Task", id)).await?;
    match &edit.fields[2].input {
        FieldInput::Select { selected, .. } => {
            assert_eq!(selected, &Some("High".to_string()))
        }
        other => panic!("Expected Select widget, got {:?}", other),
    }
    assert!(matches!(
        edit.fields[5].input,
        FieldInput::Checkbox { checked: true }
    ));

    if let Some(input) = edit.field_mut("Title") {
        input.set_text("v2");
    }
    let same_id = forms.submit(&edit).await?;
    assert_eq!(same_id, id);

    let stored = records.get(id).await?;
    assert_eq!(stored.data.get("Title"), Some(&FieldValue::from("v2")));
    assert_eq!(stored.data.get("Estimate"), Some(&FieldValue::from("3.5")));

    Ok(())
}
