//! Application state module
//! Wires the cache store, writer and asset handler from configuration

use std::sync::Arc;
use std::time::Duration;

use super::types::Config;
use crate::cache::{CacheStore, CacheWriter, MemoryStore};
use crate::handler::AssetHandler;
use crate::http::{MimeTable, ResponseHeaders};

/// Application state shared by every connection
pub struct AppState {
    pub config: Config,
    /// Concrete store, kept for statistics
    pub store: Arc<MemoryStore>,
    pub writer: CacheWriter,
    pub assets: AssetHandler,
}

impl AppState {
    /// Build the store and resolve the header and MIME snapshots once
    pub fn new(config: &Config) -> Result<Self, config::ConfigError> {
        let headers = ResponseHeaders::from_config(&config.http).map_err(config::ConfigError::Message)?;
        let mime = MimeTable::with_overrides(&config.http.mime_types)
            .map_err(config::ConfigError::Message)?;

        let store = Arc::new(MemoryStore::from_config(&config.cache));
        let shared: Arc<dyn CacheStore> = store.clone();

        Ok(Self {
            config: config.clone(),
            writer: CacheWriter::new(Arc::clone(&shared)),
            assets: AssetHandler::new(shared, headers, mime),
            store,
        })
    }

    /// Lifetime applied to assets published without an explicit TTL
    pub const fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.config.cache.default_ttl_secs)
    }

    pub const fn access_log(&self) -> bool {
        self.config.logging.access_log
    }
}
