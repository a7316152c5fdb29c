//! Configuration types module
//! Defines all configuration-related data structures

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    pub cache: CacheConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub api_host: String,
    pub api_port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            api_host: "127.0.0.1".to_string(),
            api_port: 8000,
            workers: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    /// Minimum level: debug, info, warn, error
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            access_log: true,
            access_log_format: default_access_log_format(),
            access_log_file: None,
            error_log_file: None,
        }
    }
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            keep_alive_timeout: 75,
            read_timeout: 30,
            write_timeout: 30,
            max_connections: None,
        }
    }
}

/// HTTP configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HttpConfig {
    /// `Cache-Control` on asset responses (empty means `private`)
    pub cache_control: String,
    /// `Pragma` on asset responses
    #[serde(default)]
    pub pragma: String,
    /// `Expires` on asset responses
    #[serde(default)]
    pub expires: String,
    /// Extension to MIME type overrides
    #[serde(default)]
    pub mime_types: HashMap<String, String>,
    /// Largest body accepted by the publishing API
    pub max_upload_size: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            cache_control: "private".to_string(),
            pragma: String::new(),
            expires: String::new(),
            mime_types: HashMap::new(),
            max_upload_size: 64 * 1024 * 1024,
        }
    }
}

/// Cache store configuration
#[derive(Debug, Deserialize, Clone)]
pub struct CacheConfig {
    /// Total payload bytes held before eviction
    pub max_capacity_bytes: u64,
    /// Largest single payload accepted
    pub max_entry_bytes: u64,
    /// Lifetime of assets published without an explicit TTL
    pub default_ttl_secs: u64,
    /// Directory published into the cache at startup
    #[serde(default)]
    pub preload_dir: Option<String>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_capacity_bytes: 256 * 1024 * 1024,
            max_entry_bytes: 64 * 1024 * 1024,
            default_ttl_secs: 3600,
            preload_dir: None,
        }
    }
}
