//! Data Models
//!
//! This module contains the core data structures used throughout NoteGrid:
//!
//! - `Schema` / `PropertyDef` / `PropertyKind` - user-defined record types
//! - `Record` / `FieldValue` / `RecordData` - stored rows and their values
//! - `TimeProvider` - clock abstraction behind provenance stamps
//!
//! Schemas and record data are stored as JSON columns, so these shapes are
//! the storage format as well as the in-memory one.

mod property;
mod record;
mod schema;
pub mod time;

pub use property::{PropertyDef, PropertyKind};
pub use record::{FieldValue, Record, RecordData, TITLE_PROPERTY};
pub use schema::{Schema, ValidationError};
pub use time::{SystemTimeProvider, TimeProvider};
