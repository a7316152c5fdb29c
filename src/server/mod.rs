//! Server module entry point
//! Listener setup, accept loop, per-connection serving and shutdown signals

pub mod connection;
pub mod listener;
pub mod serve;
pub mod signal;

pub use connection::Role;
pub use listener::create_reusable_listener;
pub use serve::run_accept_loop;
pub use signal::wait_for_shutdown;
