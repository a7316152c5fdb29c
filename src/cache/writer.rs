//! Publishing side of the cache

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Utc};
use hyper::body::Bytes;

use super::entry::CacheEntry;
use super::error::CacheError;
use super::key::path_key;
use super::store::CacheStore;
use crate::logger;

/// Inserts new assets into a shared [`CacheStore`]
///
/// Cloning is cheap; every clone publishes into the same store.
#[derive(Clone)]
pub struct CacheWriter {
    store: Arc<dyn CacheStore>,
}

impl CacheWriter {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store }
    }

    /// Publish `payload` under `path` until `expires_at`
    ///
    /// Always creates a new entry with a new validator, even when the payload
    /// is byte-identical to what is already stored. Concurrent publishes to the
    /// same path are last-write-wins.
    pub fn add_cache_file(
        &self,
        payload: impl Into<Bytes>,
        last_modified: impl Into<DateTime<FixedOffset>>,
        path: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<Arc<CacheEntry>, CacheError> {
        let key = path_key(path);
        if key.is_empty() {
            return Err(CacheError::InvalidKey(path.to_string()));
        }

        let entry = Arc::new(CacheEntry::new(payload.into(), last_modified.into()));
        let size = entry.len();
        self.store.put(key.clone(), Arc::clone(&entry), expires_at)?;

        logger::log_asset_published(&key, size, &expires_at);
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryStore;
    use chrono::TimeDelta;

    fn writer() -> (CacheWriter, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new(1 << 20, 1 << 20));
        (CacheWriter::new(store.clone()), store)
    }

    #[test]
    fn test_publish_is_visible_under_path_key() {
        let (writer, store) = writer();
        let expires = Utc::now() + TimeDelta::minutes(5);
        writer
            .add_cache_file(Bytes::from_static(b"body"), Utc::now(), "/docs/a.txt", expires)
            .unwrap();

        let found = store.get(&path_key("docs/a.txt")).unwrap().unwrap();
        assert_eq!(found.payload().as_ref(), b"body");
    }

    #[test]
    fn test_republish_replaces_with_new_validator() {
        let (writer, store) = writer();
        let expires = Utc::now() + TimeDelta::minutes(5);
        let first = writer
            .add_cache_file(Bytes::from_static(b"one"), Utc::now(), "/x.bin", expires)
            .unwrap();
        let second = writer
            .add_cache_file(Bytes::from_static(b"one"), Utc::now(), "/x.bin", expires)
            .unwrap();

        assert_ne!(first.validator(), second.validator());
        let found = store.get("x.bin").unwrap().unwrap();
        assert_eq!(found.validator(), second.validator());
    }

    #[test]
    fn test_root_path_rejected() {
        let (writer, _) = writer();
        let err = writer
            .add_cache_file(Bytes::new(), Utc::now(), "/", Utc::now())
            .unwrap_err();
        assert!(matches!(err, CacheError::InvalidKey(_)));
    }
}
