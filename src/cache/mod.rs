//! In-memory asset cache
//!
//! Holds published payloads under normalized path keys. The store itself is
//! abstracted behind [`CacheStore`]; [`MemoryStore`] is the expiring
//! implementation used by the server.

mod entry;
mod error;
mod key;
mod preload;
mod store;
mod writer;

pub use entry::{generate_validator, CacheEntry};
pub use error::CacheError;
pub use key::path_key;
pub use preload::preload_directory;
pub use store::{CacheStats, CacheStore, MemoryStore};
pub use writer::CacheWriter;
