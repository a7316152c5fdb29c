//! Accept loop module
//! Runs one listener until shutdown is requested

use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Notify;

use super::connection::{accept_connection, Role};
use crate::config::AppState;
use crate::logger;

/// Accept connections on `listener` until `shutdown` fires
///
/// Accept errors are logged and the loop keeps going. Connections already
/// handed to their own task are left to finish on their own.
pub async fn run_accept_loop(
    listener: TcpListener,
    state: Arc<AppState>,
    role: Role,
    shutdown: Arc<Notify>,
) {
    let active_connections = Arc::new(AtomicUsize::new(0));

    // Registered once so a notification sent mid-accept is not lost
    let stopped = shutdown.notified();
    tokio::pin!(stopped);
    stopped.as_mut().enable();

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &active_connections, role);
                    }
                    Err(e) if role == Role::Api => {
                        logger::log_api_error(&format!("Failed to accept connection: {e}"));
                    }
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }

            () = &mut stopped => {
                logger::log_info(&format!("Stopping {} listener", role.label()));
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use std::time::Duration;

    #[tokio::test]
    async fn test_loop_stops_on_shutdown() {
        let state = Arc::new(AppState::new(&Config::default()).unwrap());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let shutdown = Arc::new(Notify::new());

        let task = tokio::spawn(run_accept_loop(
            listener,
            state,
            Role::Assets,
            Arc::clone(&shutdown),
        ));
        tokio::task::yield_now().await;
        shutdown.notify_waiters();
        // notify_one stores a permit in case the loop was not yet waiting
        shutdown.notify_one();

        tokio::time::timeout(Duration::from_secs(5), task)
            .await
            .expect("accept loop did not stop")
            .unwrap();
    }
}
