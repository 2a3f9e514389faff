//! Core Configuration
//!
//! Startup configuration for the record system: where the store lives and
//! who the local actor is. Built by the embedding application and handed to
//! [`crate::services::CoreServices::init`].

use crate::services::DEFAULT_ACTOR;
use std::path::PathBuf;

/// Configuration for wiring up the core services
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// Path to the store file; `:memory:` for an ephemeral store
    pub database_path: PathBuf,

    /// Actor name stamped on record provenance
    pub actor: String,
}

impl CoreConfig {
    /// Configuration with the default local actor
    pub fn new(database_path: impl Into<PathBuf>) -> Self {
        Self {
            database_path: database_path.into(),
            actor: DEFAULT_ACTOR.to_string(),
        }
    }

    /// Override the provenance actor
    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = actor.into();
        self
    }
}

/// Initialize tracing output for binaries and ad hoc debugging
///
/// Respects `RUST_LOG`, defaulting to `info`. The library itself only emits
/// events; embedding applications that already install a subscriber should
/// skip this. Calling it twice is harmless.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
