//! Change Events
//!
//! Domain events emitted by the schema and record services whenever stored
//! state changes. Subscribers get them over a tokio broadcast channel;
//! typical consumers are table views re-querying after a write.

use crate::models::Record;

/// Broadcast channel capacity for change events.
///
/// 128 provides sufficient headroom for burst operations (cascade deletes,
/// bulk imports) while limiting memory overhead. Subscriber lag is
/// acceptable; consumers re-read current state rather than replaying
/// missed events.
pub const CHANGE_EVENT_CHANNEL_CAPACITY: usize = 128;

/// Domain events emitted after successful writes
///
/// Events fire only once the store write has completed; a failed operation
/// emits nothing.
#[derive(Debug, Clone)]
pub enum ChangeEvent {
    /// A new schema was registered
    SchemaCreated { name: String },

    /// An existing schema's properties were replaced
    SchemaUpdated { name: String },

    /// A schema changed name; its records were repointed
    SchemaRenamed {
        old_name: String,
        new_name: String,
        records_updated: u64,
    },

    /// A schema was removed, along with any cascaded records
    SchemaDeleted { name: String, records_deleted: u64 },

    /// A new record was stored (id is populated)
    RecordCreated(Record),

    /// An existing record's data was replaced
    RecordUpdated(Record),

    /// A record was removed
    RecordDeleted { id: i64 },
}

impl ChangeEvent {
    /// Get a string representation of the event type
    pub fn event_type(&self) -> &str {
        match self {
            ChangeEvent::SchemaCreated { .. } => "schema:created",
            ChangeEvent::SchemaUpdated { .. } => "schema:updated",
            ChangeEvent::SchemaRenamed { .. } => "schema:renamed",
            ChangeEvent::SchemaDeleted { .. } => "schema:deleted",
            ChangeEvent::RecordCreated(_) => "record:created",
            ChangeEvent::RecordUpdated(_) => "record:updated",
            ChangeEvent::RecordDeleted { .. } => "record:deleted",
        }
    }
}
