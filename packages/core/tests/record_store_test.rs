//! Integration tests for RecordStore
//!
//! Tests cover:
//! - Parent directory creation and reopen persistence
//! - In-memory store isolation
//! - Insert-or-replace semantics for keyed puts
//! - Row counts reported by bulk operations

use anyhow::Result;
use notegrid_core::db::RecordStore;
use notegrid_core::models::{FieldValue, PropertyDef, PropertyKind, Record, RecordData, Schema};
use tempfile::TempDir;

/// Helper: store over a fresh file in a temp dir
async fn create_test_store() -> Result<(RecordStore, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let store = RecordStore::new(db_path).await?;

    Ok((store, temp_dir))
}

/// Helper: single-entry data map
fn title_data(title: &str) -> RecordData {
    let mut data = RecordData::new();
    data.insert("Title".to_string(), FieldValue::from(title));
    data
}

#[tokio::test]
async fn test_new_creates_missing_parent_directories() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("nested").join("deep").join("test.db");

    let store = RecordStore::new(db_path.clone()).await?;

    assert!(db_path.exists());
    assert!(store.get_all_schemas().await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_reopen_persists_schemas_and_records() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("persist.db");

    {
        let store = RecordStore::new(db_path.clone()).await?;
        let schema = Schema::new(
            "Task",
            vec![PropertyDef::mandatory("Title", PropertyKind::Title)],
        )?;
        store.put_schema(&schema).await?;
        store
            .put_record(&Record::new("Task", title_data("survives")))
            .await?;
    }

    let reopened = RecordStore::new(db_path).await?;

    assert!(reopened.get_schema("Task").await?.is_some());
    let records = reopened.get_all_records().await?;
    assert_eq!(records.len(), 1);
    assert_eq!(
        records[0].data.get("Title"),
        Some(&FieldValue::from("survives"))
    );

    Ok(())
}

#[tokio::test]
async fn test_in_memory_stores_are_isolated() -> Result<()> {
    let a = RecordStore::new_in_memory().await?;
    let b = RecordStore::new_in_memory().await?;

    let schema = Schema::new(
        "OnlyInA",
        vec![PropertyDef::new("Title", PropertyKind::Title)],
    )?;
    a.put_schema(&schema).await?;

    assert!(a.get_schema("OnlyInA").await?.is_some());
    assert!(b.get_schema("OnlyInA").await?.is_none());

    Ok(())
}

#[tokio::test]
async fn test_put_schema_replaces_existing_entry() -> Result<()> {
    let (store, _temp_dir) = create_test_store().await?;

    let original = Schema::new(
        "Task",
        vec![
            PropertyDef::mandatory("Title", PropertyKind::Title),
            PropertyDef::new("Notes", PropertyKind::Text),
        ],
    )?;
    store.put_schema(&original).await?;

    let slim = Schema::new("Task", vec![PropertyDef::new("Title", PropertyKind::Title)])?;
    store.put_schema(&slim).await?;

    let loaded = store.get_schema("Task").await?.expect("schema should exist");
    assert_eq!(loaded.properties.len(), 1);

    // Still only one registry entry
    assert_eq!(store.get_all_schemas().await?.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_put_record_with_id_replaces_row() -> Result<()> {
    let (store, _temp_dir) = create_test_store().await?;

    let mut record = Record::new("Task", title_data("v1"));
    let id = store.put_record(&record).await?;
    assert!(id > 0);

    record.id = Some(id);
    record.data = title_data("v2");
    let same = store.put_record(&record).await?;
    assert_eq!(same, id);

    let loaded = store.get_record(id).await?.expect("record should exist");
    assert_eq!(loaded.data.get("Title"), Some(&FieldValue::from("v2")));
    assert_eq!(store.get_all_records().await?.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_bulk_operations_report_row_counts() -> Result<()> {
    let (store, _temp_dir) = create_test_store().await?;

    for i in 0..3 {
        store
            .put_record(&Record::new("Task", title_data(&format!("t{}", i))))
            .await?;
    }
    store
        .put_record(&Record::new("Meeting", title_data("standup")))
        .await?;

    let moved = store.rename_schema_on_records("Task", "Todo").await?;
    assert_eq!(moved, 3);
    assert!(store.get_records_by_schema("Task").await?.is_empty());
    assert_eq!(store.get_records_by_schema("Todo").await?.len(), 3);

    let removed = store.delete_records_by_schema("Todo").await?;
    assert_eq!(removed, 3);
    assert_eq!(store.get_all_records().await?.len(), 1);

    // Deleting something absent reports zero rows, not an error
    assert_eq!(store.delete_record(12345).await?, 0);
    assert_eq!(store.delete_schema("Ghost").await?, 0);

    Ok(())
}
