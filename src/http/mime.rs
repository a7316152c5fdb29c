//! MIME type detection module
//!
//! Maps a path key's file extension to a `Content-Type`. Unknown extensions map
//! to nothing, so the header is left unset.

use std::collections::HashMap;
use std::path::Path;

use hyper::header::HeaderValue;

/// Built-in extension table
///
/// # Examples
/// ```
/// use memserve::http::mime::builtin_content_type;
/// assert_eq!(builtin_content_type("html"), Some("text/html; charset=utf-8"));
/// assert_eq!(builtin_content_type("mp4"), Some("video/mp4"));
/// assert_eq!(builtin_content_type("xyz"), None);
/// ```
pub fn builtin_content_type(extension: &str) -> Option<&'static str> {
    let content_type = match extension {
        // Text
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css",
        "txt" | "md" => "text/plain; charset=utf-8",
        "csv" => "text/csv",
        "xml" => "application/xml",

        // Scripts and data
        "js" | "mjs" => "application/javascript",
        "json" | "map" => "application/json",
        "wasm" => "application/wasm",
        "webmanifest" => "application/manifest+json",

        // Images
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "webp" => "image/webp",
        "avif" => "image/avif",

        // Video
        "mp4" | "m4v" => "video/mp4",
        "webm" => "video/webm",
        "ogv" => "video/ogg",
        "mov" => "video/quicktime",
        "m3u8" => "application/vnd.apple.mpegurl",
        "ts" => "video/mp2t",

        // Audio
        "mp3" => "audio/mpeg",
        "ogg" | "oga" => "audio/ogg",
        "wav" => "audio/wav",
        "flac" => "audio/flac",
        "m4a" => "audio/mp4",

        // Fonts
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "otf" => "font/otf",

        // Archives and documents
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "gz" => "application/gzip",
        "tar" => "application/x-tar",

        _ => return None,
    };
    Some(content_type)
}

/// Extension lookup table: configured overrides first, then the built-ins
#[derive(Debug, Clone, Default)]
pub struct MimeTable {
    overrides: HashMap<String, HeaderValue>,
}

impl MimeTable {
    /// Build a table from `extension -> content type` overrides
    ///
    /// Extensions are matched case-insensitively and may be given with or
    /// without a leading dot.
    pub fn with_overrides(overrides: &HashMap<String, String>) -> Result<Self, String> {
        let mut table = HashMap::with_capacity(overrides.len());
        for (ext, content_type) in overrides {
            let value = HeaderValue::from_str(content_type)
                .map_err(|e| format!("Invalid MIME type '{content_type}' for '{ext}': {e}"))?;
            table.insert(ext.trim_start_matches('.').to_ascii_lowercase(), value);
        }
        Ok(Self { overrides: table })
    }

    /// Content type for a path key, `None` when the extension is unknown
    pub fn lookup(&self, key: &str) -> Option<HeaderValue> {
        let ext = Path::new(key).extension()?.to_str()?.to_ascii_lowercase();
        if let Some(value) = self.overrides.get(&ext) {
            return Some(value.clone());
        }
        builtin_content_type(&ext).map(HeaderValue::from_static)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_types() {
        let table = MimeTable::default();
        assert_eq!(table.lookup("index.html").unwrap(), "text/html; charset=utf-8");
        assert_eq!(table.lookup("app.js").unwrap(), "application/javascript");
        assert_eq!(table.lookup("logo.PNG").unwrap(), "image/png");
    }

    #[test]
    fn test_unknown_extension() {
        let table = MimeTable::default();
        assert!(table.lookup("data.xyz").is_none());
        assert!(table.lookup("LICENSE").is_none());
    }

    #[test]
    fn test_overrides_take_precedence() {
        let mut overrides = HashMap::new();
        overrides.insert(".JS".to_string(), "text/javascript".to_string());
        overrides.insert("glb".to_string(), "model/gltf-binary".to_string());
        let table = MimeTable::with_overrides(&overrides).unwrap();

        assert_eq!(table.lookup("app.js").unwrap(), "text/javascript");
        assert_eq!(table.lookup("scene.glb").unwrap(), "model/gltf-binary");
        assert_eq!(table.lookup("site.css").unwrap(), "text/css");
    }

    #[test]
    fn test_invalid_override_rejected() {
        let mut overrides = HashMap::new();
        overrides.insert("bad".to_string(), "text/plain\n".to_string());
        assert!(MimeTable::with_overrides(&overrides).is_err());
    }
}
