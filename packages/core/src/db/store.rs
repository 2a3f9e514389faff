//! Record Store
//!
//! This module provides the persistent key-value backing for schemas and
//! records using libsql. Both value families live in their own table and
//! carry their payload as a JSON column, so no migrations are ever required
//! on user machines.
//!
//! # Architecture
//!
//! - **Path-agnostic**: Accepts any valid PathBuf, including `:memory:`
//! - **Schemaless values**: `properties` and `data` are opaque JSON columns
//! - **WAL mode**: Write-Ahead Logging for better concurrency
//! - **Idempotent setup**: CREATE TABLE IF NOT EXISTS on every open
//! - **Single-statement bulk ops**: cascade deletes and renames are one
//!   UPDATE/DELETE each, never a read-modify-write loop
//!
//! Always use `connect_with_timeout()` in async functions. The 5-second busy
//! timeout allows concurrent operations to wait and retry instead of failing
//! immediately with `SQLITE_BUSY` errors when the Tokio runtime moves futures
//! between threads.

use crate::db::error::StoreError;
use crate::models::{Record, RecordData, Schema};
use libsql::{Builder, Database};
use std::path::PathBuf;
use std::sync::Arc;

/// Persistent store for schemas and records
///
/// # Examples
///
/// ```no_run
/// use notegrid_core::db::RecordStore;
/// use std::path::PathBuf;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = RecordStore::new(PathBuf::from("./data/notegrid.db")).await?;
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RecordStore {
    /// libsql database handle (wrapped in Arc for sharing)
    pub db: Arc<Database>,

    /// Path to the database file
    pub db_path: PathBuf,
}

impl RecordStore {
    /// Create a new RecordStore at the specified database path
    ///
    /// This will:
    /// 1. Ensure the parent directory exists (create if needed)
    /// 2. Open/create the database file
    /// 3. Create the `schemas` and `records` tables if missing
    /// 4. Enable SQLite features (WAL mode, busy timeout, foreign keys)
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if:
    /// - Parent directory cannot be created
    /// - Database connection fails
    /// - Table initialization fails
    pub async fn new(db_path: PathBuf) -> Result<Self, StoreError> {
        // Check if the database file already exists (before we open it).
        // Only brand new databases need the WAL checkpoint at the end of setup.
        let is_new_database = !db_path.exists();

        // Ensure parent directory exists
        if let Some(parent) = db_path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    if e.kind() == std::io::ErrorKind::PermissionDenied {
                        StoreError::permission_denied(db_path.clone())
                    } else {
                        StoreError::DirectoryCreationFailed(e)
                    }
                })?;
            }
        }

        // Open database connection using Builder pattern
        let db = Builder::new_local(&db_path)
            .build()
            .await
            .map_err(|e| StoreError::connection_failed(db_path.clone(), e))?;

        let store = Self {
            db: Arc::new(db),
            db_path,
        };

        // Initialize tables (only checkpoints if is_new_database = true)
        store.initialize_tables(is_new_database).await?;

        Ok(store)
    }

    /// Create a store backed by an in-memory database
    ///
    /// The store evaporates when dropped. Used by tests and ephemeral
    /// sessions; behaves identically to a file-backed store otherwise.
    pub async fn new_in_memory() -> Result<Self, StoreError> {
        Self::new(PathBuf::from(":memory:")).await
    }

    /// Execute a PRAGMA statement
    ///
    /// PRAGMA statements return rows, so we must use query() instead of
    /// execute(). This helper method encapsulates that pattern.
    async fn execute_pragma(
        &self,
        conn: &libsql::Connection,
        pragma: &str,
    ) -> Result<(), StoreError> {
        let mut stmt = conn.prepare(pragma).await.map_err(|e| {
            StoreError::sql_execution(format!("Failed to execute '{}': {}", pragma, e))
        })?;
        let _ = stmt.query(()).await.map_err(|e| {
            StoreError::sql_execution(format!("Failed to execute '{}': {}", pragma, e))
        })?;
        Ok(())
    }

    /// Get an async connection with busy timeout configured
    ///
    /// Sets a 5-second busy timeout so concurrent operations wait and retry
    /// instead of failing immediately when the database is locked. SQLite
    /// connections have thread-affinity requirements, and the Tokio runtime
    /// moves futures between threads at `.await` points; the busy timeout
    /// ensures operations serialize gracefully instead of failing.
    pub async fn connect_with_timeout(&self) -> Result<libsql::Connection, StoreError> {
        // The synchronous connect() call is safe here because it only creates
        // the connection handle; actual SQLite operations happen later.
        let conn = self.db.connect().map_err(StoreError::LibsqlError)?;

        self.execute_pragma(&conn, "PRAGMA busy_timeout = 5000")
            .await?;

        Ok(conn)
    }

    /// Initialize store tables and SQLite configuration
    ///
    /// Creates tables and indexes using CREATE TABLE IF NOT EXISTS, ensuring
    /// idempotent initialization (safe to call multiple times).
    ///
    /// # Arguments
    ///
    /// * `is_new_database` - Whether this is a newly created database file.
    ///   If true, performs a WAL checkpoint to flush the tables to disk
    ///   (prevents race conditions in tests that reopen the file rapidly).
    ///   If false, skips the checkpoint for performance.
    async fn initialize_tables(&self, is_new_database: bool) -> Result<(), StoreError> {
        let conn = self.connect_with_timeout().await?;

        // Enable WAL mode for better concurrency
        self.execute_pragma(&conn, "PRAGMA journal_mode = WAL")
            .await?;

        // Make SQLite wait up to 5s instead of failing immediately on lock
        self.execute_pragma(&conn, "PRAGMA busy_timeout = 5000")
            .await?;

        // Enable foreign key constraints
        self.execute_pragma(&conn, "PRAGMA foreign_keys = ON")
            .await?;

        // Schema registry. The name doubles as the storage key.
        conn.execute(
            "CREATE TABLE IF NOT EXISTS schemas (
                name TEXT PRIMARY KEY,
                properties JSON NOT NULL DEFAULT '[]'
            )",
            (),
        )
        .await
        .map_err(|e| {
            StoreError::sql_execution(format!("Failed to create schemas table: {}", e))
        })?;

        // Record rows. AUTOINCREMENT keeps ids monotonic so the id of a
        // deleted record is never reissued to a later one; dangling relation
        // values must stay dangling.
        conn.execute(
            "CREATE TABLE IF NOT EXISTS records (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                schema_name TEXT NOT NULL,
                data JSON NOT NULL DEFAULT '{}',
                created_at INTEGER NOT NULL DEFAULT 0,
                created_time TEXT NOT NULL DEFAULT '',
                created_by TEXT NOT NULL DEFAULT '',
                last_edited_time TEXT NOT NULL DEFAULT '',
                last_edited_by TEXT NOT NULL DEFAULT ''
            )",
            (),
        )
        .await
        .map_err(|e| {
            StoreError::sql_execution(format!("Failed to create records table: {}", e))
        })?;

        // Index on schema_name (filtered listings and cascade operations)
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_records_schema ON records(schema_name)",
            (),
        )
        .await
        .map_err(|e| {
            StoreError::sql_execution(format!(
                "Failed to create index 'idx_records_schema': {}",
                e
            ))
        })?;

        // Index on created_at (newest-first listings)
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_records_created ON records(created_at)",
            (),
        )
        .await
        .map_err(|e| {
            StoreError::sql_execution(format!(
                "Failed to create index 'idx_records_created': {}",
                e
            ))
        })?;

        // Force WAL checkpoint only for newly created databases, so the
        // fresh tables are flushed to the main file before anyone else
        // opens it.
        if is_new_database {
            self.execute_pragma(&conn, "PRAGMA wal_checkpoint(TRUNCATE)")
                .await?;
        }

        Ok(())
    }

    //
    // SCHEMA OPERATIONS
    //

    /// Fetch all schemas, sorted by name
    pub async fn get_all_schemas(&self) -> Result<Vec<Schema>, StoreError> {
        let conn = self.connect_with_timeout().await?;

        let mut stmt = conn
            .prepare("SELECT name, properties FROM schemas ORDER BY name ASC")
            .await
            .map_err(|e| {
                StoreError::sql_execution(format!("Failed to prepare schema listing: {}", e))
            })?;

        let mut rows = stmt.query(()).await.map_err(|e| {
            StoreError::sql_execution(format!("Failed to execute schema listing: {}", e))
        })?;

        let mut schemas = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| StoreError::sql_execution(e.to_string()))?
        {
            schemas.push(schema_from_row(&row)?);
        }

        Ok(schemas)
    }

    /// Fetch a single schema by name
    pub async fn get_schema(&self, name: &str) -> Result<Option<Schema>, StoreError> {
        let conn = self.connect_with_timeout().await?;

        let mut stmt = conn
            .prepare("SELECT name, properties FROM schemas WHERE name = ?")
            .await
            .map_err(|e| {
                StoreError::sql_execution(format!("Failed to prepare schema lookup: {}", e))
            })?;

        let mut rows = stmt.query([name]).await.map_err(|e| {
            StoreError::sql_execution(format!("Failed to execute schema lookup: {}", e))
        })?;

        match rows
            .next()
            .await
            .map_err(|e| StoreError::sql_execution(e.to_string()))?
        {
            Some(row) => Ok(Some(schema_from_row(&row)?)),
            None => Ok(None),
        }
    }

    /// Insert or replace a schema under its name
    pub async fn put_schema(&self, schema: &Schema) -> Result<(), StoreError> {
        let properties = serde_json::to_string(&schema.properties).map_err(|e| {
            StoreError::serialization(format!(
                "Failed to encode properties for schema '{}': {}",
                schema.name, e
            ))
        })?;

        let conn = self.connect_with_timeout().await?;

        conn.execute(
            "INSERT OR REPLACE INTO schemas (name, properties) VALUES (?, ?)",
            (schema.name.as_str(), properties),
        )
        .await
        .map_err(|e| {
            StoreError::sql_execution(format!("Failed to store schema '{}': {}", schema.name, e))
        })?;

        Ok(())
    }

    /// Delete a schema entry; returns the number of rows removed (0 or 1)
    ///
    /// Records pointing at the schema are untouched; cascading is the
    /// caller's decision.
    pub async fn delete_schema(&self, name: &str) -> Result<u64, StoreError> {
        let conn = self.connect_with_timeout().await?;

        conn.execute("DELETE FROM schemas WHERE name = ?", [name])
            .await
            .map_err(|e| {
                StoreError::sql_execution(format!("Failed to delete schema '{}': {}", name, e))
            })
    }

    //
    // RECORD OPERATIONS
    //

    /// Fetch all records, newest first
    ///
    /// Ordered by creation timestamp with the row id as tiebreaker, so
    /// records created within the same millisecond still list in a stable
    /// newest-first order.
    pub async fn get_all_records(&self) -> Result<Vec<Record>, StoreError> {
        let conn = self.connect_with_timeout().await?;

        let mut stmt = conn
            .prepare(
                "SELECT id, schema_name, data, created_at, created_time, created_by,
                        last_edited_time, last_edited_by
                 FROM records ORDER BY created_at DESC, id DESC",
            )
            .await
            .map_err(|e| {
                StoreError::sql_execution(format!("Failed to prepare record listing: {}", e))
            })?;

        let mut rows = stmt.query(()).await.map_err(|e| {
            StoreError::sql_execution(format!("Failed to execute record listing: {}", e))
        })?;

        let mut records = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| StoreError::sql_execution(e.to_string()))?
        {
            records.push(record_from_row(&row)?);
        }

        Ok(records)
    }

    /// Fetch all records of one schema, newest first
    pub async fn get_records_by_schema(
        &self,
        schema_name: &str,
    ) -> Result<Vec<Record>, StoreError> {
        let conn = self.connect_with_timeout().await?;

        let mut stmt = conn
            .prepare(
                "SELECT id, schema_name, data, created_at, created_time, created_by,
                        last_edited_time, last_edited_by
                 FROM records WHERE schema_name = ?
                 ORDER BY created_at DESC, id DESC",
            )
            .await
            .map_err(|e| {
                StoreError::sql_execution(format!(
                    "Failed to prepare filtered record listing: {}",
                    e
                ))
            })?;

        let mut rows = stmt.query([schema_name]).await.map_err(|e| {
            StoreError::sql_execution(format!("Failed to execute filtered record listing: {}", e))
        })?;

        let mut records = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| StoreError::sql_execution(e.to_string()))?
        {
            records.push(record_from_row(&row)?);
        }

        Ok(records)
    }

    /// Fetch a single record by id
    pub async fn get_record(&self, id: i64) -> Result<Option<Record>, StoreError> {
        let conn = self.connect_with_timeout().await?;

        let mut stmt = conn
            .prepare(
                "SELECT id, schema_name, data, created_at, created_time, created_by,
                        last_edited_time, last_edited_by
                 FROM records WHERE id = ?",
            )
            .await
            .map_err(|e| {
                StoreError::sql_execution(format!("Failed to prepare record lookup: {}", e))
            })?;

        let mut rows = stmt.query([id]).await.map_err(|e| {
            StoreError::sql_execution(format!("Failed to execute record lookup: {}", e))
        })?;

        match rows
            .next()
            .await
            .map_err(|e| StoreError::sql_execution(e.to_string()))?
        {
            Some(row) => Ok(Some(record_from_row(&row)?)),
            None => Ok(None),
        }
    }

    /// Insert or replace a record, returning its id
    ///
    /// A record without an id is inserted fresh and receives the next
    /// AUTOINCREMENT id. A record with an id replaces the stored row under
    /// that id wholesale.
    pub async fn put_record(&self, record: &Record) -> Result<i64, StoreError> {
        let data = serde_json::to_string(&record.data).map_err(|e| {
            StoreError::serialization(format!(
                "Failed to encode data for record in schema '{}': {}",
                record.schema, e
            ))
        })?;

        let conn = self.connect_with_timeout().await?;

        match record.id {
            Some(id) => {
                conn.execute(
                    "INSERT OR REPLACE INTO records
                        (id, schema_name, data, created_at, created_time, created_by,
                         last_edited_time, last_edited_by)
                     VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
                    (
                        id,
                        record.schema.as_str(),
                        data,
                        record.created_at,
                        record.created_time.as_str(),
                        record.created_by.as_str(),
                        record.last_edited_time.as_str(),
                        record.last_edited_by.as_str(),
                    ),
                )
                .await
                .map_err(|e| {
                    StoreError::sql_execution(format!("Failed to store record {}: {}", id, e))
                })?;

                Ok(id)
            }
            None => {
                conn.execute(
                    "INSERT INTO records
                        (schema_name, data, created_at, created_time, created_by,
                         last_edited_time, last_edited_by)
                     VALUES (?, ?, ?, ?, ?, ?, ?)",
                    (
                        record.schema.as_str(),
                        data,
                        record.created_at,
                        record.created_time.as_str(),
                        record.created_by.as_str(),
                        record.last_edited_time.as_str(),
                        record.last_edited_by.as_str(),
                    ),
                )
                .await
                .map_err(|e| {
                    StoreError::sql_execution(format!(
                        "Failed to store record in schema '{}': {}",
                        record.schema, e
                    ))
                })?;

                Ok(conn.last_insert_rowid())
            }
        }
    }

    /// Delete a record by id; returns the number of rows removed (0 or 1)
    pub async fn delete_record(&self, id: i64) -> Result<u64, StoreError> {
        let conn = self.connect_with_timeout().await?;

        conn.execute("DELETE FROM records WHERE id = ?", [id])
            .await
            .map_err(|e| {
                StoreError::sql_execution(format!("Failed to delete record {}: {}", id, e))
            })
    }

    /// Delete every record of a schema in one statement
    ///
    /// Returns the number of records removed.
    pub async fn delete_records_by_schema(&self, schema_name: &str) -> Result<u64, StoreError> {
        let conn = self.connect_with_timeout().await?;

        conn.execute("DELETE FROM records WHERE schema_name = ?", [schema_name])
            .await
            .map_err(|e| {
                StoreError::sql_execution(format!(
                    "Failed to delete records of schema '{}': {}",
                    schema_name, e
                ))
            })
    }

    /// Repoint every record of one schema at a new schema name
    ///
    /// A single UPDATE, so a rename either moves all records or none.
    /// Returns the number of records repointed.
    pub async fn rename_schema_on_records(
        &self,
        old_name: &str,
        new_name: &str,
    ) -> Result<u64, StoreError> {
        let conn = self.connect_with_timeout().await?;

        conn.execute(
            "UPDATE records SET schema_name = ? WHERE schema_name = ?",
            (new_name, old_name),
        )
        .await
        .map_err(|e| {
            StoreError::sql_execution(format!(
                "Failed to repoint records from '{}' to '{}': {}",
                old_name, new_name, e
            ))
        })
    }
}

/// Decode a `schemas` row into a Schema
fn schema_from_row(row: &libsql::Row) -> Result<Schema, StoreError> {
    let name: String = row
        .get(0)
        .map_err(|e| StoreError::sql_execution(format!("Failed to read schema name: {}", e)))?;
    let properties_json: String = row.get(1).map_err(|e| {
        StoreError::sql_execution(format!("Failed to read schema properties: {}", e))
    })?;

    let properties = serde_json::from_str(&properties_json).map_err(|e| {
        StoreError::serialization(format!("Invalid property list for schema '{}': {}", name, e))
    })?;

    Ok(Schema { name, properties })
}

/// Decode a `records` row into a Record
fn record_from_row(row: &libsql::Row) -> Result<Record, StoreError> {
    let id: i64 = row
        .get(0)
        .map_err(|e| StoreError::sql_execution(format!("Failed to read record id: {}", e)))?;
    let schema: String = row.get(1).map_err(|e| {
        StoreError::sql_execution(format!("Failed to read record schema name: {}", e))
    })?;
    let data_json: String = row
        .get(2)
        .map_err(|e| StoreError::sql_execution(format!("Failed to read record data: {}", e)))?;
    let created_at: i64 = row.get(3).map_err(|e| {
        StoreError::sql_execution(format!("Failed to read record created_at: {}", e))
    })?;
    let created_time: String = row.get(4).map_err(|e| {
        StoreError::sql_execution(format!("Failed to read record created_time: {}", e))
    })?;
    let created_by: String = row.get(5).map_err(|e| {
        StoreError::sql_execution(format!("Failed to read record created_by: {}", e))
    })?;
    let last_edited_time: String = row.get(6).map_err(|e| {
        StoreError::sql_execution(format!("Failed to read record last_edited_time: {}", e))
    })?;
    let last_edited_by: String = row.get(7).map_err(|e| {
        StoreError::sql_execution(format!("Failed to read record last_edited_by: {}", e))
    })?;

    let data: RecordData = serde_json::from_str(&data_json).map_err(|e| {
        StoreError::serialization(format!("Invalid data map for record {}: {}", id, e))
    })?;

    Ok(Record {
        id: Some(id),
        schema,
        data,
        created_at,
        created_time,
        created_by,
        last_edited_time,
        last_edited_by,
    })
}
