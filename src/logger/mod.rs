//! Logger module
//!
//! Logging utilities for the asset server:
//! - Server lifecycle logging
//! - Access logging with multiple formats
//! - Leveled error, warning, info and debug messages
//! - File-based logging support

mod format;
pub mod writer;

pub use format::AccessLogEntry;
pub use writer::LogLevel;

use crate::config::Config;
use chrono::{DateTime, Utc};
use std::io;
use std::net::SocketAddr;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> io::Result<()> {
    let level = config
        .logging
        .level
        .parse::<LogLevel>()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    writer::init(
        level,
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

/// Route a leveled message to the writer, or to stdio before init
fn write(level: LogLevel, message: &str) {
    match writer::get() {
        Some(w) => w.write(level, message),
        None if level >= LogLevel::Warn => eprintln!("{message}"),
        None if level >= LogLevel::Info => println!("{message}"),
        None => {}
    }
}

fn write_access(message: &str) {
    match writer::get() {
        Some(w) => w.write_access(message),
        None => println!("{message}"),
    }
}

pub fn log_server_start(addr: &SocketAddr, api_addr: &SocketAddr, config: &Config) {
    let info = |m: &str| write(LogLevel::Info, m);
    info("======================================");
    info("Asset server started successfully");
    info(&format!("Serving assets on: http://{addr}"));
    info(&format!("Publishing API on: http://{api_addr}"));
    info(&format!("Log level: {}", config.logging.level));
    if let Some(workers) = config.server.workers {
        info(&format!("Worker threads: {workers}"));
    }
    info(&format!(
        "Cache capacity: {} bytes (max entry {} bytes, default TTL {}s)",
        config.cache.max_capacity_bytes, config.cache.max_entry_bytes, config.cache.default_ttl_secs
    ));
    if let Some(ref path) = config.logging.access_log_file {
        info(&format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        info(&format!("Error log: {path}"));
    }
    info("======================================");
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    write(LogLevel::Debug, &format!("[Connection] Accepted from: {peer_addr}"));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write(LogLevel::Error, &format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_client_aborted(peer_addr: &SocketAddr) {
    write(LogLevel::Debug, &format!("[Connection] Client {peer_addr} went away mid-transfer"));
}

pub fn log_error(message: &str) {
    write(LogLevel::Error, &format!("[ERROR] {message}"));
}

pub fn log_api_error(message: &str) {
    write(LogLevel::Error, &format!("[API ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write(LogLevel::Warn, &format!("[WARN] {message}"));
}

pub fn log_info(message: &str) {
    write(LogLevel::Info, &format!("[INFO] {message}"));
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    write_access(&entry.format(format));
}

pub fn log_api_request(method: &str, path: &str, status: u16) {
    write(LogLevel::Info, &format!("[API] {method} {path} - {status}"));
}

pub fn log_asset_published(key: &str, size: usize, expires_at: &DateTime<Utc>) {
    write(
        LogLevel::Debug,
        &format!("[Cache] Published '{key}' ({size} bytes, expires {})", expires_at.to_rfc3339()),
    );
}

pub fn log_preload_complete(dir: &str, count: usize) {
    write(LogLevel::Info, &format!("[Cache] Preloaded {count} files from '{dir}'"));
}
