//! NoteGrid Core Record System
//!
//! This crate provides the schema-driven record database for NoteGrid: user
//! defined record types with typed properties (including cross-record
//! relations), dynamic forms over those types, and relation-aware table
//! rendering.
//!
//! # Architecture
//!
//! - **Schemaless values**: property lists and record data maps are stored as
//!   JSON columns, so new property types never require a table migration
//! - **libsql**: embedded SQLite-compatible database, opened once and shared
//! - **Edge validation**: schema-shape and mandatory-field checks run at the
//!   registry and form edges, never in storage
//! - **Read-through caching**: the schema registry caches definitions and
//!   invalidates on every mutation; views re-query on every render
//!
//! # Modules
//!
//! - [`models`] - Data structures (Schema, PropertyDef, Record, FieldValue)
//! - [`db`] - Storage layer with libsql integration
//! - [`services`] - Business services (SchemaService, RecordService)
//! - [`forms`] - Dynamic form building, editing, and submission
//! - [`views`] - Read-only table projections
//! - [`config`] - Runtime configuration and tracing setup

pub mod config;
pub mod db;
pub mod forms;
pub mod models;
pub mod services;
pub mod views;

// Re-export commonly used types
pub use config::CoreConfig;
pub use models::*;
pub use services::*;
