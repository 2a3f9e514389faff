//! Service Layer Error Types
//!
//! This module defines error types for service-layer operations, providing
//! detailed error handling for business logic failures.

use crate::db::StoreError;
use crate::models::ValidationError;
use thiserror::Error;

/// Service operation errors
///
/// Provides high-level error types for all service operations,
/// with detailed context and proper error chaining.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Schema not found by name
    #[error("Schema not found: {name}")]
    SchemaNotFound { name: String },

    /// Record not found by id
    #[error("Record not found: {id}")]
    RecordNotFound { id: i64 },

    /// Another schema already occupies the requested name
    #[error("A schema named '{name}' already exists")]
    DuplicateSchemaName { name: String },

    /// Validation failed for a schema shape or form submission
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Store operation failed
    #[error("Store operation failed: {0}")]
    Store(#[from] StoreError),
}

impl ServiceError {
    /// Create a schema not found error
    pub fn schema_not_found(name: impl Into<String>) -> Self {
        Self::SchemaNotFound { name: name.into() }
    }

    /// Create a record not found error
    pub fn record_not_found(id: i64) -> Self {
        Self::RecordNotFound { id }
    }

    /// Create a duplicate schema name error
    pub fn duplicate_schema_name(name: impl Into<String>) -> Self {
        Self::DuplicateSchemaName { name: name.into() }
    }
}
