//! Schema Service
//!
//! Manages the registry of user-defined record types. Schemas are stored by
//! name; all lookups go through a read-through cache so table views and form
//! builds do not hit the store for every render.
//!
//! # Caching
//!
//! The full schema map is loaded on first access and kept until any write
//! invalidates it. Invalidation always runs after the store write, including
//! on error paths, so a partially applied multi-step operation can never
//! leave a stale map behind.
//!
//! # Rename ordering
//!
//! Renaming a schema must repoint its records before the registry entry
//! moves: records first (single UPDATE), then delete the old entry, then
//! store the new one. If any step fails, the old entry is still present and
//! no record points at a name that never existed.

use crate::db::{RecordStore, StoreError};
use crate::models::{PropertyDef, Schema};
use crate::services::error::ServiceError;
use crate::services::events::{ChangeEvent, CHANGE_EVENT_CHANNEL_CAPACITY};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

/// Registry of user-defined record types
pub struct SchemaService {
    store: Arc<RecordStore>,

    /// Read-through cache of all schemas, keyed by name. `None` means the
    /// cache is cold and the next read reloads it from the store.
    cache: RwLock<Option<HashMap<String, Schema>>>,

    /// Broadcast channel for change events
    event_tx: broadcast::Sender<ChangeEvent>,
}

impl SchemaService {
    /// Create a schema service on top of a shared store
    pub fn new(store: Arc<RecordStore>) -> Self {
        let (event_tx, _) = broadcast::channel(CHANGE_EVENT_CHANNEL_CAPACITY);

        Self {
            store,
            cache: RwLock::new(None),
            event_tx,
        }
    }

    /// Subscribe to schema change events
    ///
    /// Returns a broadcast receiver that receives all schema events
    /// (created, updated, renamed, deleted).
    pub fn subscribe_to_events(&self) -> broadcast::Receiver<ChangeEvent> {
        self.event_tx.subscribe()
    }

    /// Emit a change event to all subscribers
    ///
    /// Internal helper for emitting events after successful operations.
    /// Ignores errors if no subscribers (expected in some tests).
    fn emit_event(&self, event: ChangeEvent) {
        let _ = self.event_tx.send(event);
    }

    /// Drop the cached schema map; the next read reloads from the store
    async fn invalidate_cache(&self) {
        let mut cache = self.cache.write().await;
        *cache = None;
    }

    /// Return the cached schema map, loading it from the store if cold
    async fn load_cache(&self) -> Result<HashMap<String, Schema>, ServiceError> {
        {
            let cache = self.cache.read().await;
            if let Some(schemas) = cache.as_ref() {
                return Ok(schemas.clone());
            }
        }

        let schemas = self.store.get_all_schemas().await?;
        let by_name: HashMap<String, Schema> = schemas
            .into_iter()
            .map(|schema| (schema.name.clone(), schema))
            .collect();

        let mut cache = self.cache.write().await;
        *cache = Some(by_name.clone());

        Ok(by_name)
    }

    /// Register a new schema
    ///
    /// The name is trimmed and must be unique; the property list must not be
    /// empty. Emits `SchemaCreated` on success.
    ///
    /// # Errors
    ///
    /// - `Validation` if the name is blank or the property list is empty
    /// - `DuplicateSchemaName` if a schema already holds the name
    pub async fn create(
        &self,
        name: impl Into<String>,
        properties: Vec<PropertyDef>,
    ) -> Result<Schema, ServiceError> {
        let schema = Schema::new(name, properties)?;

        let existing = self.load_cache().await?;
        if existing.contains_key(&schema.name) {
            return Err(ServiceError::duplicate_schema_name(schema.name.clone()));
        }

        self.store.put_schema(&schema).await?;
        self.invalidate_cache().await;

        tracing::info!("Created schema '{}'", schema.name);
        self.emit_event(ChangeEvent::SchemaCreated {
            name: schema.name.clone(),
        });

        Ok(schema)
    }

    /// Replace a schema's definition, renaming it if the new name differs
    ///
    /// The property list replaces the stored one wholesale; properties left
    /// out are gone from the definition (values stored under them remain in
    /// record data until the record is next edited). A rename repoints every
    /// record of the schema at the new name in one statement.
    ///
    /// Emits `SchemaRenamed` when the name changed, `SchemaUpdated`
    /// otherwise.
    ///
    /// # Errors
    ///
    /// - `Validation` if the new shape is invalid
    /// - `SchemaNotFound` if `existing_name` is not registered
    /// - `DuplicateSchemaName` if renaming onto a name already in use
    pub async fn update(
        &self,
        existing_name: &str,
        new_name: impl Into<String>,
        properties: Vec<PropertyDef>,
    ) -> Result<Schema, ServiceError> {
        let schema = Schema::new(new_name, properties)?;

        let known = self.load_cache().await?;
        if !known.contains_key(existing_name) {
            return Err(ServiceError::schema_not_found(existing_name));
        }

        if schema.name != existing_name {
            if known.contains_key(&schema.name) {
                return Err(ServiceError::duplicate_schema_name(schema.name.clone()));
            }

            let renamed = self.apply_rename(existing_name, &schema).await;
            self.invalidate_cache().await;
            let records_updated = renamed?;

            tracing::info!(
                "Renamed schema '{}' to '{}' ({} records repointed)",
                existing_name,
                schema.name,
                records_updated
            );
            self.emit_event(ChangeEvent::SchemaRenamed {
                old_name: existing_name.to_string(),
                new_name: schema.name.clone(),
                records_updated,
            });
        } else {
            self.store.put_schema(&schema).await?;
            self.invalidate_cache().await;

            tracing::info!("Updated schema '{}'", schema.name);
            self.emit_event(ChangeEvent::SchemaUpdated {
                name: schema.name.clone(),
            });
        }

        Ok(schema)
    }

    /// Move records to the new name, then swap the registry entry.
    ///
    /// Records go first. If a later step fails, the old entry still exists
    /// and can be retried; records never point at a never-registered name.
    async fn apply_rename(&self, old_name: &str, schema: &Schema) -> Result<u64, StoreError> {
        let records_updated = self
            .store
            .rename_schema_on_records(old_name, &schema.name)
            .await?;
        self.store.delete_schema(old_name).await?;
        self.store.put_schema(schema).await?;

        Ok(records_updated)
    }

    /// Remove a schema from the registry
    ///
    /// With `cascade_records` set, every record of the schema is deleted in
    /// one statement before the registry entry goes. Without it, records are
    /// left behind and render under the stale schema name.
    ///
    /// Emits `SchemaDeleted` with the cascade count on success.
    pub async fn delete(&self, name: &str, cascade_records: bool) -> Result<(), ServiceError> {
        let known = self.load_cache().await?;
        if !known.contains_key(name) {
            return Err(ServiceError::schema_not_found(name));
        }

        let deleted = self.apply_delete(name, cascade_records).await;
        self.invalidate_cache().await;
        let records_deleted = deleted?;

        tracing::info!("Deleted schema '{}' ({} records removed)", name, records_deleted);
        self.emit_event(ChangeEvent::SchemaDeleted {
            name: name.to_string(),
            records_deleted,
        });

        Ok(())
    }

    async fn apply_delete(&self, name: &str, cascade_records: bool) -> Result<u64, StoreError> {
        let records_deleted = if cascade_records {
            self.store.delete_records_by_schema(name).await?
        } else {
            0
        };
        self.store.delete_schema(name).await?;

        Ok(records_deleted)
    }

    /// Fetch a schema by name, failing if it is not registered
    pub async fn get(&self, name: &str) -> Result<Schema, ServiceError> {
        self.find(name)
            .await?
            .ok_or_else(|| ServiceError::schema_not_found(name))
    }

    /// Fetch a schema by name
    pub async fn find(&self, name: &str) -> Result<Option<Schema>, ServiceError> {
        let schemas = self.load_cache().await?;
        Ok(schemas.get(name).cloned())
    }

    /// List all schemas, sorted by name
    pub async fn list(&self) -> Result<Vec<Schema>, ServiceError> {
        let schemas = self.load_cache().await?;
        let mut listed: Vec<Schema> = schemas.into_values().collect();
        listed.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(listed)
    }
}
