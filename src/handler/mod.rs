//! Request handler module
//!
//! Routes asset requests and serves them from the in-memory cache.

pub mod assets;
pub mod router;

// Re-export main entry points
pub use assets::AssetHandler;
pub use router::{handle_request, RequestContext};
