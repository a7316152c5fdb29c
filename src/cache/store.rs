//! Expiring key/value store for cache entries

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use moka::sync::Cache;
use moka::Expiry;
use serde::Serialize;

use super::entry::CacheEntry;
use super::error::CacheError;
use crate::config::CacheConfig;

/// Store contract used by the writer and the request handler
///
/// `put` replaces any previous value for the key atomically; `get` never
/// returns an entry whose expiry has passed.
pub trait CacheStore: Send + Sync {
    fn put(
        &self,
        key: String,
        entry: Arc<CacheEntry>,
        expires_at: DateTime<Utc>,
    ) -> Result<(), CacheError>;

    fn get(&self, key: &str) -> Result<Option<Arc<CacheEntry>>, CacheError>;
}

#[derive(Clone)]
struct StoredAsset {
    entry: Arc<CacheEntry>,
    expires_at: DateTime<Utc>,
}

impl StoredAsset {
    fn time_to_live(&self) -> Duration {
        (self.expires_at - Utc::now())
            .to_std()
            .unwrap_or(Duration::ZERO)
    }

    fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}

/// Per-entry absolute expiry for moka
struct AbsoluteExpiry;

impl Expiry<String, StoredAsset> for AbsoluteExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &StoredAsset,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.time_to_live())
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &StoredAsset,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.time_to_live())
    }
}

/// Snapshot of store occupancy
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: u64,
    pub weighted_size: u64,
}

/// Memory-backed [`CacheStore`] with size-weighted eviction
#[derive(Clone)]
pub struct MemoryStore {
    cache: Cache<String, StoredAsset>,
    max_entry_bytes: u64,
}

impl MemoryStore {
    /// Create a store holding at most `max_capacity_bytes` of payload
    pub fn new(max_capacity_bytes: u64, max_entry_bytes: u64) -> Self {
        let cache = Cache::builder()
            .weigher(|_key: &String, value: &StoredAsset| {
                u32::try_from(value.entry.len()).unwrap_or(u32::MAX)
            })
            .max_capacity(max_capacity_bytes)
            .expire_after(AbsoluteExpiry)
            .build();

        Self {
            cache,
            max_entry_bytes,
        }
    }

    /// Build a store from the `[cache]` section
    ///
    /// # Arguments
    ///
    /// * `config` - `max_capacity_bytes` bounds the total weighted size,
    ///   `max_entry_bytes` bounds a single payload
    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.max_capacity_bytes, config.max_entry_bytes)
    }

    /// Entry count and weighted size after flushing pending maintenance
    pub fn stats(&self) -> CacheStats {
        self.cache.run_pending_tasks();
        CacheStats {
            entries: self.cache.entry_count(),
            weighted_size: self.cache.weighted_size(),
        }
    }
}

impl CacheStore for MemoryStore {
    fn put(
        &self,
        key: String,
        entry: Arc<CacheEntry>,
        expires_at: DateTime<Utc>,
    ) -> Result<(), CacheError> {
        if key.is_empty() {
            return Err(CacheError::InvalidKey(key));
        }
        let size = entry.len();
        if u64::try_from(size).unwrap_or(u64::MAX) > self.max_entry_bytes {
            return Err(CacheError::TooLarge {
                key,
                size,
                max: self.max_entry_bytes,
            });
        }

        self.cache.insert(key, StoredAsset { entry, expires_at });
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<Arc<CacheEntry>>, CacheError> {
        let Some(stored) = self.cache.get(key) else {
            return Ok(None);
        };

        // moka reclaims expired entries lazily; never hand one out
        if stored.is_expired() {
            self.cache.invalidate(key);
            return Ok(None);
        }

        Ok(Some(stored.entry))
    }
}
