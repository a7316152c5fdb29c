//! Configuration module entry point
//! Loads application configuration and holds shared runtime state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{CacheConfig, Config, HttpConfig, LoggingConfig, PerformanceConfig, ServerConfig};

impl Config {
    /// Load configuration from specified file path (without extension)
    /// A missing file is not an error; defaults and `MEMSERVE__*` variables still apply
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("MEMSERVE").separator("__"))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("server.api_host", "127.0.0.1")?
            .set_default("server.api_port", 8000)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.cache_control", "private")?
            .set_default("http.pragma", "")?
            .set_default("http.expires", "")?
            .set_default("http.max_upload_size", 67_108_864)? // 64MB
            .set_default("cache.max_capacity_bytes", 268_435_456)? // 256MB
            .set_default("cache.max_entry_bytes", 67_108_864)?
            .set_default("cache.default_ttl_secs", 3600)?
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the cache store cannot honour
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        let cache = &self.cache;
        if cache.max_capacity_bytes == 0 {
            return Err(config::ConfigError::Message(
                "cache.max_capacity_bytes must be greater than zero".to_string(),
            ));
        }
        if cache.max_entry_bytes > cache.max_capacity_bytes {
            return Err(config::ConfigError::Message(format!(
                "cache.max_entry_bytes ({}) exceeds cache.max_capacity_bytes ({})",
                cache.max_entry_bytes, cache.max_capacity_bytes
            )));
        }
        if cache.default_ttl_secs == 0 {
            return Err(config::ConfigError::Message(
                "cache.default_ttl_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }

    pub fn get_api_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.api_host, self.server.api_port)
            .parse()
            .map_err(|e| format!("Invalid API address: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let cfg = Config::load_from("definitely-missing-memserve-config").unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.server.api_port, 8000);
        assert_eq!(cfg.http.cache_control, "private");
        assert_eq!(cfg.http.pragma, "");
        assert_eq!(cfg.cache.default_ttl_secs, 3600);
        assert!(cfg.cache.preload_dir.is_none());
    }

    #[test]
    fn test_validate_rejects_oversized_entry_limit() {
        let mut cfg = Config::default();
        cfg.cache.max_entry_bytes = cfg.cache.max_capacity_bytes + 1;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_ttl() {
        let mut cfg = Config::default();
        cfg.cache.default_ttl_secs = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_socket_addrs() {
        let cfg = Config::default();
        assert_eq!(cfg.get_socket_addr().unwrap().port(), 8080);
        assert_eq!(cfg.get_api_socket_addr().unwrap().port(), 8000);

        let mut bad = Config::default();
        bad.server.host = "not an ip".to_string();
        assert!(bad.get_socket_addr().is_err());
    }
}
