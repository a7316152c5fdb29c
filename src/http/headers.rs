//! Default response header snapshot
//!
//! Resolved once from configuration and shared read-only by every asset
//! response, including 304s.

use hyper::header::{HeaderValue, CACHE_CONTROL, EXPIRES, PRAGMA};
use hyper::http::response::Builder;

use crate::config::HttpConfig;

pub const DEFAULT_CACHE_CONTROL: &str = "private";

/// Validated `Cache-Control`, `Pragma` and `Expires` values
#[derive(Debug, Clone)]
pub struct ResponseHeaders {
    pub cache_control: HeaderValue,
    pub pragma: HeaderValue,
    pub expires: HeaderValue,
}

impl Default for ResponseHeaders {
    fn default() -> Self {
        Self {
            cache_control: HeaderValue::from_static(DEFAULT_CACHE_CONTROL),
            pragma: HeaderValue::from_static(""),
            expires: HeaderValue::from_static(""),
        }
    }
}

impl ResponseHeaders {
    /// Resolve configured values, falling back to `private` for an empty
    /// `Cache-Control`
    pub fn from_config(config: &HttpConfig) -> Result<Self, String> {
        let cache_control = if config.cache_control.trim().is_empty() {
            DEFAULT_CACHE_CONTROL
        } else {
            config.cache_control.as_str()
        };

        Ok(Self {
            cache_control: parse_value("cache_control", cache_control)?,
            pragma: parse_value("pragma", &config.pragma)?,
            expires: parse_value("expires", &config.expires)?,
        })
    }

    /// Add the cache-control family to a response builder
    pub fn apply(&self, builder: Builder) -> Builder {
        builder
            .header(CACHE_CONTROL, self.cache_control.clone())
            .header(PRAGMA, self.pragma.clone())
            .header(EXPIRES, self.expires.clone())
    }
}

fn parse_value(name: &str, value: &str) -> Result<HeaderValue, String> {
    HeaderValue::from_str(value).map_err(|e| format!("Invalid http.{name} value '{value}': {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::Response;

    fn http_config(cache_control: &str, pragma: &str, expires: &str) -> HttpConfig {
        HttpConfig {
            cache_control: cache_control.to_string(),
            pragma: pragma.to_string(),
            expires: expires.to_string(),
            ..HttpConfig::default()
        }
    }

    #[test]
    fn test_defaults() {
        let headers = ResponseHeaders::from_config(&HttpConfig::default()).unwrap();
        assert_eq!(headers.cache_control, "private");
        assert_eq!(headers.pragma, "");
        assert_eq!(headers.expires, "");
    }

    #[test]
    fn test_configured_values() {
        let cfg = http_config("public, max-age=600", "no-cache", "0");
        let headers = ResponseHeaders::from_config(&cfg).unwrap();
        assert_eq!(headers.cache_control, "public, max-age=600");
        assert_eq!(headers.pragma, "no-cache");
        assert_eq!(headers.expires, "0");
    }

    #[test]
    fn test_blank_cache_control_falls_back() {
        let headers = ResponseHeaders::from_config(&http_config("  ", "", "")).unwrap();
        assert_eq!(headers.cache_control, DEFAULT_CACHE_CONTROL);
    }

    #[test]
    fn test_invalid_value_rejected() {
        assert!(ResponseHeaders::from_config(&http_config("private\r\n", "", "")).is_err());
    }

    #[test]
    fn test_apply() {
        let resp = ResponseHeaders::default()
            .apply(Response::builder())
            .body(())
            .unwrap();
        assert_eq!(resp.headers()[CACHE_CONTROL], "private");
        assert_eq!(resp.headers()[PRAGMA], "");
        assert_eq!(resp.headers()[EXPIRES], "");
    }
}
