//! API types module
//! JSON bodies returned by the publishing API

use serde::Serialize;

use crate::cache::CacheEntry;
use crate::http::format_http_date;
use chrono::{DateTime, Utc};

/// Metadata of a cached asset
///
/// `expires_at` is only known at publish time; lookups omit it.
#[derive(Debug, Serialize)]
pub struct AssetInfo {
    pub path: String,
    pub etag: String,
    pub size: usize,
    pub last_modified: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
}

impl AssetInfo {
    pub fn from_entry(path: &str, entry: &CacheEntry) -> Self {
        Self {
            path: path.to_string(),
            etag: entry.validator().to_string(),
            size: entry.len(),
            last_modified: format_http_date(entry.last_modified()),
            expires_at: None,
        }
    }

    #[must_use]
    pub fn with_expiry(mut self, expires_at: &DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at.to_rfc3339());
        self
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: u16,
    pub message: String,
}

/// Envelope for every non-2xx API answer
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: &'static str,
    pub error_detail: ErrorDetail,
}
