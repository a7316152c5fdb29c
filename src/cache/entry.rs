//! Cache entry record

use chrono::{DateTime, FixedOffset};
use hyper::body::Bytes;
use uuid::Uuid;

/// Immutable payload plus validation metadata
///
/// Entries are never mutated once built. Publishing new content under the same
/// key creates a new entry with a new validator.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    payload: Bytes,
    last_modified: DateTime<FixedOffset>,
    validator: String,
}

impl CacheEntry {
    /// Build an entry with a freshly generated validator
    pub fn new(payload: Bytes, last_modified: DateTime<FixedOffset>) -> Self {
        Self {
            payload,
            last_modified,
            validator: generate_validator(),
        }
    }

    /// Shared payload buffer
    ///
    /// Cloning or slicing the returned `Bytes` bumps a reference count; the
    /// underlying bytes are never copied.
    pub const fn payload(&self) -> &Bytes {
        &self.payload
    }

    /// Payload size in bytes, used for `Content-Length` and range bounds
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    pub const fn last_modified(&self) -> &DateTime<FixedOffset> {
        &self.last_modified
    }

    /// Quoted `ETag` value, e.g. `"6f1c...-..."`
    pub fn validator(&self) -> &str {
        &self.validator
    }
}

/// Generate a quoted unique validator token
///
/// Random rather than derived from content, so two uploads of identical bytes
/// still get distinct validators.
pub fn generate_validator() -> String {
    format!("\"{}\"", Uuid::new_v4())
}
