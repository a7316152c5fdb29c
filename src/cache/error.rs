//! Cache error types

use thiserror::Error;

/// Failure reported by a cache store on insert or lookup
#[derive(Debug, Error)]
pub enum CacheError {
    /// Path normalized to an empty key
    #[error("invalid cache key for path '{0}'")]
    InvalidKey(String),

    /// Payload exceeds the per-entry limit of the store
    #[error("asset '{key}' is {size} bytes, exceeds per-entry limit of {max} bytes")]
    TooLarge { key: String, size: usize, max: u64 },
}
