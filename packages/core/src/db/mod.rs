//! Storage Layer
//!
//! This module handles all database interactions using libsql:
//!
//! - Store initialization and connection management
//! - Two tables only: `schemas` (keyed by name) and `records` (keyed by
//!   rowid), each carrying its payload as an opaque JSON column
//! - Schemaless values, so evolving a schema never requires a migration
//!
//! The store is opened once at startup and shared behind an `Arc`; services
//! never open their own connections to the file.

mod error;
mod store;

pub use error::StoreError;
pub use store::RecordStore;
