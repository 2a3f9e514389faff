//! Business Services
//!
//! This module contains the core business logic services:
//!
//! - `SchemaService` - registry of user-defined record types
//! - `RecordService` - record CRUD with provenance stamping
//! - `ChangeEvent` - broadcast notifications after every write
//! - `CoreServices` - one-call bootstrap of the whole graph
//!
//! Services coordinate between the storage layer and the form/view layers,
//! implementing business rules and orchestrating multi-step operations.

mod bootstrap;
pub mod error;
pub mod events;
pub mod record_service;
pub mod schema_service;

pub use bootstrap::CoreServices;
pub use error::ServiceError;
pub use events::{ChangeEvent, CHANGE_EVENT_CHANNEL_CAPACITY};
pub use record_service::{resolve_relation_label, RecordService, DEFAULT_ACTOR};
pub use schema_service::SchemaService;
