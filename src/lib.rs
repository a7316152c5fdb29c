//! In-memory static asset server
//!
//! Assets are published into a memory cache and served with ETag and
//! Last-Modified validation plus single byte-range support.

pub mod api;
pub mod cache;
pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
