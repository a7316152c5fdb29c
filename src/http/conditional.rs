//! HTTP conditional request module
//!
//! Decides whether a cached entry is unchanged from the client's point of
//! view, based on `If-None-Match` and `If-Modified-Since`.

use chrono::{DateTime, FixedOffset, Utc};

use crate::cache::CacheEntry;

/// `IMF-fixdate` layout used for `Last-Modified`
pub const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Outcome of validating a request against an entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    /// Answer with 304 and no payload
    pub not_modified: bool,
    /// `ETag` to send back; `None` when the client's validator matched
    pub etag: Option<String>,
    /// Canonical `Last-Modified` value
    pub last_modified: String,
}

/// Format a timestamp as an HTTP date in UTC
///
/// # Examples
/// ```
/// use chrono::DateTime;
/// use memserve::http::conditional::format_http_date;
///
/// let ts = DateTime::parse_from_rfc3339("1994-11-06T10:49:37+02:00").unwrap();
/// assert_eq!(format_http_date(&ts), "Sun, 06 Nov 1994 08:49:37 GMT");
/// ```
pub fn format_http_date(timestamp: &DateTime<FixedOffset>) -> String {
    timestamp
        .with_timezone(&Utc)
        .format(HTTP_DATE_FORMAT)
        .to_string()
}

/// Validate request headers against `entry`
///
/// The validator must match exactly; lists and `*` are not interpreted.
/// `If-Modified-Since` must equal the canonical `Last-Modified` string
/// byte for byte. Range requests are never answered with 304.
pub fn evaluate(
    entry: &CacheEntry,
    if_none_match: Option<&str>,
    if_modified_since: Option<&str>,
    is_range: bool,
) -> Validation {
    let last_modified = format_http_date(entry.last_modified());
    let matched = if_none_match.is_some_and(|v| v == entry.validator());
    let unmodified_since = if_modified_since.is_some_and(|v| v == last_modified);

    Validation {
        not_modified: !is_range && (matched || unmodified_since),
        etag: (!matched).then(|| entry.validator().to_string()),
        last_modified,
    }
}
