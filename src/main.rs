use std::sync::Arc;

mod config;
mod handler;
mod http;
mod logger;
mod server;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::Config::load()?;

    // Single-threaded runtime: the accept loop serves one connection to
    // completion at a time, so extra worker threads would sit idle.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.socket_addr()?;
    let root = std::env::current_dir()?;

    // A bind failure (port taken, no permission) propagates out of main
    // and exits non-zero; there is no fallback port.
    let listener = server::create_reusable_listener(addr)?;

    let signals = Arc::new(server::SignalHandler::new());
    server::start_signal_handler(Arc::clone(&signals));

    let ctx = Arc::new(config::ServerContext::new(cfg, root));

    logger::log_server_start(&addr, &ctx.root);

    server::run_accept_loop(listener, ctx, signals).await;

    logger::log_server_stopped();
    Ok(())
}
