use std::path::Path;
use std::sync::Arc;

use memserve::config::{AppState, Config};
use memserve::server::{self, Role};
use memserve::{cache, logger};
use tokio::sync::Notify;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args().nth(1).unwrap_or_else(|| "config".to_string());
    let cfg = Config::load_from(&config_path)?;
    logger::init(&cfg)?;

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let app_addr = cfg.get_socket_addr()?;
    let api_addr = cfg.get_api_socket_addr()?;

    let state = Arc::new(AppState::new(&cfg)?);

    if let Some(dir) = cfg.cache.preload_dir.as_deref() {
        let count = cache::preload_directory(&state.writer, Path::new(dir), state.default_ttl()).await?;
        logger::log_preload_complete(dir, count);
    }

    let app_listener = server::create_reusable_listener(app_addr)?;
    let api_listener = server::create_reusable_listener(api_addr)?;
    logger::log_server_start(&app_addr, &api_addr, &cfg);

    let shutdown = Arc::new(Notify::new());
    let api_task = tokio::spawn(server::run_accept_loop(
        api_listener,
        Arc::clone(&state),
        Role::Api,
        Arc::clone(&shutdown),
    ));
    let app_task = tokio::spawn(server::run_accept_loop(
        app_listener,
        state,
        Role::Assets,
        Arc::clone(&shutdown),
    ));

    let signal = server::wait_for_shutdown().await?;
    logger::log_info(&format!("{signal} received, shutting down"));
    shutdown.notify_waiters();

    let (api_result, app_result) = tokio::join!(api_task, app_task);
    api_result?;
    app_result?;
    Ok(())
}
