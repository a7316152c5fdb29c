//! Path key normalization

use std::path::MAIN_SEPARATOR;

/// Derive the cache key for a request or publish path
///
/// Both `/` and `\` become the platform separator and leading separators are
/// stripped. Case is preserved. Normalizing an existing key is a no-op.
///
/// # Examples
/// ```
/// use memserve::cache::path_key;
/// let key = path_key("/css/site.css");
/// assert_eq!(key, format!("css{}site.css", std::path::MAIN_SEPARATOR));
/// ```
pub fn path_key(path: &str) -> String {
    let normalized: String = path
        .chars()
        .map(|c| if c == '/' || c == '\\' { MAIN_SEPARATOR } else { c })
        .collect();
    normalized.trim_start_matches(MAIN_SEPARATOR).to_string()
}
