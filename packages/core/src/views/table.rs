//! Table Views
//!
//! Read-only rendering of the schema list and the record list. The renderer
//! keeps no state between calls and re-queries the services on every render,
//! so a row can never show data older than the last write.
//!
//! Records whose schema has been deleted without cascade still render; their
//! stale schema name appears as plain text and every field shows raw, since
//! no property definitions remain to mark relations.

use crate::models::{PropertyKind, Record, Schema};
use crate::services::error::ServiceError;
use crate::services::record_service::{resolve_relation_label, RecordService};
use crate::services::schema_service::SchemaService;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

/// One row of the schema overview table
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaRow {
    pub name: String,
    pub property_count: usize,

    /// Leading properties as "name (type)", truncated with "..."
    pub summary: String,
}

/// One record rendered to a single display line
#[derive(Debug, Clone, PartialEq)]
pub struct RecordRow {
    pub id: i64,
    pub line: String,
}

/// Read-only renderer for schema and record tables
#[derive(Clone)]
pub struct TableRenderer {
    schemas: Arc<SchemaService>,
    records: Arc<RecordService>,
}

impl TableRenderer {
    pub fn new(schemas: Arc<SchemaService>, records: Arc<RecordService>) -> Self {
        Self { schemas, records }
    }

    /// Render the schema overview, sorted by name
    pub async fn schema_rows(&self) -> Result<Vec<SchemaRow>, ServiceError> {
        let schemas = self.schemas.list().await?;

        Ok(schemas
            .iter()
            .map(|schema| SchemaRow {
                name: schema.name.clone(),
                property_count: schema.properties.len(),
                summary: schema.property_summary(),
            })
            .collect())
    }

    /// Render record lines, newest first, optionally filtered to one schema
    ///
    /// Relation fields resolve to the display label of their target record,
    /// or to a deletion marker when the target is gone. Resolution never
    /// fails a render.
    pub async fn record_rows(
        &self,
        schema_filter: Option<&str>,
    ) -> Result<Vec<RecordRow>, ServiceError> {
        let records = self.records.list(schema_filter).await?;
        let schemas = self.schemas.list().await?;
        let by_name: HashMap<&str, &Schema> = schemas
            .iter()
            .map(|schema| (schema.name.as_str(), schema))
            .collect();

        // Relation targets are fetched once per render pass and shared
        // across rows.
        let mut relation_targets: HashMap<String, Vec<Record>> = HashMap::new();

        let mut rows = Vec::with_capacity(records.len());
        for record in &records {
            let Some(id) = record.id else { continue };

            let schema = by_name.get(record.schema.as_str()).copied();
            let line = self.render_line(record, schema, &mut relation_targets).await?;

            rows.push(RecordRow { id, line });
        }

        Ok(rows)
    }

    /// Join one record into its display line
    ///
    /// Format: schema name, then "key: value" per data entry in stored
    /// order, then provenance ("Created: {time} by {actor}", "Edited: ...")
    /// when stamped, all comma-separated.
    async fn render_line(
        &self,
        record: &Record,
        schema: Option<&Schema>,
        relation_targets: &mut HashMap<String, Vec<Record>>,
    ) -> Result<String, ServiceError> {
        let mut parts = vec![record.schema.clone()];

        for (key, value) in &record.data {
            let related = schema
                .and_then(|schema| schema.property(key))
                .and_then(|property| match &property.kind {
                    PropertyKind::Relation { related_schema } => related_schema.clone(),
                    _ => None,
                });

            let shown_value = value.display();
            let shown = match related {
                // Blank relation values stay blank; only a stored id gets
                // resolved or marked deleted.
                Some(target) if !shown_value.is_empty() => {
                    let candidates = self.relation_candidates(&target, relation_targets).await?;
                    resolve_relation_label(candidates, &shown_value)
                }
                _ => shown_value,
            };

            parts.push(format!("{}: {}", key, shown));
        }

        if !record.created_time.is_empty() {
            parts.push(format!(
                "Created: {} by {}",
                record.created_time, record.created_by
            ));
        }
        if !record.last_edited_time.is_empty() {
            parts.push(format!(
                "Edited: {} by {}",
                record.last_edited_time, record.last_edited_by
            ));
        }

        Ok(parts.join(", "))
    }

    /// Records of a relation target schema, loaded once per render pass
    async fn relation_candidates<'a>(
        &self,
        schema_name: &str,
        cache: &'a mut HashMap<String, Vec<Record>>,
    ) -> Result<&'a Vec<Record>, ServiceError> {
        match cache.entry(schema_name.to_string()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let records = self.records.list(Some(schema_name)).await?;
                Ok(entry.insert(records))
            }
        }
    }
}
