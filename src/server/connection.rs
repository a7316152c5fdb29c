//! Connection handling module
//! Accepts a single TCP connection and serves it on its own task

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::TcpStream;

use crate::api;
use crate::config::AppState;
use crate::handler;
use crate::http::Transmission;
use crate::logger;

/// Which surface a listener serves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Cached assets on the public port
    Assets,
    /// Publishing API on the management port
    Api,
}

impl Role {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Assets => "assets",
            Self::Api => "api",
        }
    }
}

/// Accept and process a connection, checking limits and logging.
///
/// The counter is incremented before the limit check and rolled back on
/// rejection, so concurrent accepts never overshoot `max_connections`.
pub fn accept_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    state: &Arc<AppState>,
    conn_counter: &Arc<AtomicUsize>,
    role: Role,
) {
    let prev_count = conn_counter.fetch_add(1, Ordering::SeqCst);

    if role == Role::Assets {
        if let Some(max_conn) = state.config.performance.max_connections {
            if prev_count >= usize::try_from(max_conn).unwrap_or(usize::MAX) {
                conn_counter.fetch_sub(1, Ordering::SeqCst);
                logger::log_warning(&format!(
                    "Max connections reached: {prev_count}/{max_conn}. Connection rejected."
                ));
                drop(stream);
                return;
            }
        }
    }

    logger::log_connection_accepted(&peer_addr);

    handle_connection(
        stream,
        peer_addr,
        Arc::clone(state),
        Arc::clone(conn_counter),
        role,
    );
}

/// Handle a single connection in a spawned task.
///
/// This function:
/// 1. Wraps the TCP stream in `TokioIo`
/// 2. Configures HTTP/1.1 keep-alive from the performance settings
/// 3. Serves requests with the asset router or the publishing API per `role`
/// 4. Bounds the whole connection by the larger of the read and write timeouts
/// 5. Folds the result into a [`Transmission`], logging client aborts at debug
/// 6. Decrements the connection counter when done
///
/// # Arguments
///
/// * `stream` - The accepted TCP stream
/// * `peer_addr` - Remote address, used for logs and access entries
/// * `state` - Shared application state
/// * `conn_counter` - Active connection counter to decrement when done
/// * `role` - Which surface this listener serves
fn handle_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
    conn_counter: Arc<AtomicUsize>,
    role: Role,
) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);

        let perf = &state.config.performance;
        let keep_alive = perf.keep_alive_timeout > 0;
        let timeout_duration = Duration::from_secs(perf.read_timeout.max(perf.write_timeout));

        let mut builder = http1::Builder::new();
        builder.keep_alive(keep_alive);

        let service_state = Arc::clone(&state);
        let conn = builder.serve_connection(
            io,
            service_fn(move |req| {
                let state = Arc::clone(&service_state);
                async move {
                    match role {
                        Role::Assets => handler::handle_request(req, state, peer_addr).await,
                        Role::Api => api::handle_api_request(req, state).await,
                    }
                }
            }),
        );

        match tokio::time::timeout(timeout_duration, conn).await {
            Ok(result) => match Transmission::from(result) {
                Transmission::Completed => {}
                Transmission::ClientAborted => logger::log_client_aborted(&peer_addr),
                Transmission::Fault(err) => logger::log_connection_error(&err),
            },
            Err(_) => {
                logger::log_warning(&format!(
                    "Connection from {peer_addr} timed out after {} seconds ({})",
                    timeout_duration.as_secs(),
                    role.label()
                ));
            }
        }

        conn_counter.fetch_sub(1, Ordering::SeqCst);
    });
}
