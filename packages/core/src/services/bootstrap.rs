//! Service Bootstrap
//!
//! Wires the whole service graph on top of one shared store. Embedding
//! applications call [`CoreServices::init`] once at startup and hand the
//! pieces to their UI layer.

use crate::config::CoreConfig;
use crate::db::RecordStore;
use crate::forms::FormBuilder;
use crate::services::error::ServiceError;
use crate::services::record_service::RecordService;
use crate::services::schema_service::SchemaService;
use crate::views::TableRenderer;
use std::sync::Arc;

/// The fully wired service graph
pub struct CoreServices {
    pub store: Arc<RecordStore>,
    pub schemas: Arc<SchemaService>,
    pub records: Arc<RecordService>,
    pub forms: FormBuilder,
    pub tables: TableRenderer,
}

impl CoreServices {
    /// Open the store and wire every service on top of it
    ///
    /// The store is opened (and its tables created) before any service
    /// exists, so a returned `CoreServices` is fully usable.
    pub async fn init(config: &CoreConfig) -> Result<Self, ServiceError> {
        let store = Arc::new(RecordStore::new(config.database_path.clone()).await?);
        let schemas = Arc::new(SchemaService::new(store.clone()));
        let records =
            Arc::new(RecordService::new(store.clone()).with_actor(config.actor.clone()));
        let forms = FormBuilder::new(schemas.clone(), records.clone());
        let tables = TableRenderer::new(schemas.clone(), records.clone());

        tracing::info!(
            "Core services initialized (store: {})",
            config.database_path.display()
        );

        Ok(Self {
            store,
            schemas,
            records,
            forms,
            tables,
        })
    }
}
