//! Record Service
//!
//! CRUD operations for records, with provenance stamping on every write.
//! Each service instance carries an actor name and a clock; creation stamps
//! `created_*` and `last_edited_*`, updates refresh only the edit pair.
//!
//! Updates replace the data map wholesale. Whatever the caller submits is
//! the record's entire new payload; fields left out are gone.

use crate::db::RecordStore;
use crate::models::time::SystemTimeProvider;
use crate::models::{Record, RecordData, TimeProvider};
use crate::services::error::ServiceError;
use crate::services::events::{ChangeEvent, CHANGE_EVENT_CHANNEL_CAPACITY};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Actor recorded on provenance stamps when no other is configured
pub const DEFAULT_ACTOR: &str = "local-user";

/// CRUD service for records
#[derive(Clone)]
pub struct RecordService {
    store: Arc<RecordStore>,

    /// Clock behind all provenance stamps
    clock: Arc<dyn TimeProvider>,

    /// Actor written into created_by / last_edited_by
    actor: String,

    /// Broadcast channel for change events
    event_tx: broadcast::Sender<ChangeEvent>,
}

impl RecordService {
    /// Create a record service on top of a shared store
    ///
    /// Uses the system clock and [`DEFAULT_ACTOR`]; see [`Self::with_clock`]
    /// and [`Self::with_actor`] to swap either.
    pub fn new(store: Arc<RecordStore>) -> Self {
        let (event_tx, _) = broadcast::channel(CHANGE_EVENT_CHANNEL_CAPACITY);

        Self {
            store,
            clock: Arc::new(SystemTimeProvider),
            actor: DEFAULT_ACTOR.to_string(),
            event_tx,
        }
    }

    /// Create a scoped service stamping a different actor name
    ///
    /// The clone shares the store and the event channel, so subscribers of
    /// the original service still see its events.
    pub fn with_actor(&self, actor: impl Into<String>) -> Self {
        let mut cloned = self.clone();
        cloned.actor = actor.into();
        cloned
    }

    /// Create a scoped service reading time from a different clock
    pub fn with_clock(&self, clock: Arc<dyn TimeProvider>) -> Self {
        let mut cloned = self.clone();
        cloned.clock = clock;
        cloned
    }

    /// Subscribe to record change events
    pub fn subscribe_to_events(&self) -> broadcast::Receiver<ChangeEvent> {
        self.event_tx.subscribe()
    }

    /// Emit a change event to all subscribers
    ///
    /// Ignores errors if no subscribers (expected in some tests).
    fn emit_event(&self, event: ChangeEvent) {
        let _ = self.event_tx.send(event);
    }

    /// Store a new record, returning its assigned id
    ///
    /// Stamps both provenance pairs from the service clock and actor. The
    /// schema name is not re-validated here; form submission resolves the
    /// schema before data ever reaches this point.
    pub async fn create(
        &self,
        schema_name: impl Into<String>,
        data: RecordData,
    ) -> Result<i64, ServiceError> {
        let stamp = self.clock.now_stamp();
        let record = Record {
            id: None,
            schema: schema_name.into(),
            data,
            created_at: self.clock.now_millis(),
            created_time: stamp.clone(),
            created_by: self.actor.clone(),
            last_edited_time: stamp,
            last_edited_by: self.actor.clone(),
        };

        let id = self.store.put_record(&record).await?;

        let mut stored = record;
        stored.id = Some(id);

        tracing::debug!("Created record {} in schema '{}'", id, stored.schema);
        self.emit_event(ChangeEvent::RecordCreated(stored));

        Ok(id)
    }

    /// Replace a record's data map and refresh its edit stamps
    ///
    /// The creation stamps are preserved; only `last_edited_*` move.
    /// Returns the updated record.
    pub async fn update(&self, id: i64, data: RecordData) -> Result<Record, ServiceError> {
        let mut record = self
            .store
            .get_record(id)
            .await?
            .ok_or_else(|| ServiceError::record_not_found(id))?;

        record.data = data;
        record.last_edited_time = self.clock.now_stamp();
        record.last_edited_by = self.actor.clone();

        self.store.put_record(&record).await?;

        tracing::debug!("Updated record {} in schema '{}'", id, record.schema);
        self.emit_event(ChangeEvent::RecordUpdated(record.clone()));

        Ok(record)
    }

    /// Delete a record by id
    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let deleted = self.store.delete_record(id).await?;
        if deleted == 0 {
            return Err(ServiceError::record_not_found(id));
        }

        tracing::debug!("Deleted record {}", id);
        self.emit_event(ChangeEvent::RecordDeleted { id });

        Ok(())
    }

    /// Fetch a record by id, failing if it does not exist
    pub async fn get(&self, id: i64) -> Result<Record, ServiceError> {
        self.store
            .get_record(id)
            .await?
            .ok_or_else(|| ServiceError::record_not_found(id))
    }

    /// List records, newest first, optionally filtered to one schema
    pub async fn list(&self, schema_name: Option<&str>) -> Result<Vec<Record>, ServiceError> {
        let records = match schema_name {
            Some(name) => self.store.get_records_by_schema(name).await?,
            None => self.store.get_all_records().await?,
        };

        Ok(records)
    }
}

/// Resolve a stored relation value against the target schema's records
///
/// Relation values are stored as id strings. A value that parses to the id
/// of a candidate renders as that record's display label; anything else
/// renders as a deletion marker carrying the raw value, so the user can
/// still see which record vanished.
pub fn resolve_relation_label(candidates: &[Record], target_id: &str) -> String {
    let matched = target_id
        .parse::<i64>()
        .ok()
        .and_then(|id| candidates.iter().find(|record| record.id == Some(id)));

    match matched {
        Some(record) => record.display_label(),
        None => format!("Deleted record #{}", target_id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::time::MockTimeProvider;
    use crate::models::FieldValue;
    use chrono::{TimeZone, Utc};

    fn title_data(title: &str) -> RecordData {
        let mut data = RecordData::new();
        data.insert("Title".to_string(), FieldValue::from(title));
        data
    }

    #[tokio::test]
    async fn test_create_stamps_provenance_from_clock() {
        let store = Arc::new(RecordStore::new_in_memory().await.unwrap());
        let fixed = Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 0).unwrap();
        let service =
            RecordService::new(store).with_clock(Arc::new(MockTimeProvider::with_time(fixed)));

        let id = service.create("Task", title_data("Ship it")).await.unwrap();
        let record = service.get(id).await.unwrap();

        assert_eq!(record.created_at, fixed.timestamp_millis());
        assert_eq!(record.created_time, "2025-03-14 09:26");
        assert_eq!(record.created_by, DEFAULT_ACTOR);
        assert_eq!(record.last_edited_time, "2025-03-14 09:26");
        assert_eq!(record.last_edited_by, DEFAULT_ACTOR);
    }

    #[tokio::test]
    async fn test_update_refreshes_edit_stamps_only() {
        let store = Arc::new(RecordStore::new_in_memory().await.unwrap());
        let t1 = Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).unwrap();
        let t2 = Utc.with_ymd_and_hms(2025, 1, 2, 17, 45, 0).unwrap();

        let at_t1 = RecordService::new(store)
            .with_clock(Arc::new(MockTimeProvider::with_time(t1)));
        let at_t2 = at_t1.with_clock(Arc::new(MockTimeProvider::with_time(t2)));

        let id = at_t1.create("Task", title_data("v1")).await.unwrap();
        let updated = at_t2.update(id, title_data("v2")).await.unwrap();

        assert_eq!(updated.created_at, t1.timestamp_millis());
        assert_eq!(updated.created_time, "2025-01-01 08:00");
        assert_eq!(updated.last_edited_time, "2025-01-02 17:45");
        assert_eq!(updated.data.get("Title"), Some(&FieldValue::from("v2")));
    }

    #[tokio::test]
    async fn test_with_actor_overrides_provenance_actor() {
        let store = Arc::new(RecordStore::new_in_memory().await.unwrap());
        let service = RecordService::new(store).with_actor("import-job");

        let id = service.create("Task", title_data("Imported")).await.unwrap();
        let record = service.get(id).await.unwrap();

        assert_eq!(record.created_by, "import-job");
        assert_eq!(record.last_edited_by, "import-job");
    }

    fn candidate(id: i64, title: &str) -> Record {
        let mut record = Record::new("Project", title_data(title));
        record.id = Some(id);
        record
    }

    #[test]
    fn test_resolve_relation_label_match() {
        let candidates = vec![candidate(3, "Apollo"), candidate(9, "Gemini")];
        assert_eq!(resolve_relation_label(&candidates, "9"), "Gemini");
    }

    #[test]
    fn test_resolve_relation_label_missing_target() {
        let candidates = vec![candidate(3, "Apollo")];
        assert_eq!(resolve_relation_label(&candidates, "9"), "Deleted record #9");
    }

    #[test]
    fn test_resolve_relation_label_non_numeric_value() {
        assert_eq!(
            resolve_relation_label(&[], "garbage"),
            "Deleted record #garbage"
        );
    }
}
