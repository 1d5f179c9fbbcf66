use anyhow::{Context, Result};
use clap::Parser;
use outbreak_server::{routes, AppState, ServerArgs};

#[tokio::main]
async fn main() -> Result<()> {
    let args = ServerArgs::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(args.log_filter()))
        .init();

    let state = AppState::from_args(&args);
    let shutdown_state = state.clone();

    let (addr, server) = warp::serve(routes(state))
        .try_bind_with_graceful_shutdown(args.addr(), async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                log::error!("failed to listen for shutdown signal: {e}");
            }
        })
        .with_context(|| format!("failed to bind {}", args.addr()))?;

    log::info!(
        "outbreak server listening on http://{addr} (auto-run tick {} ms)",
        args.tick_ms
    );
    server.await;

    shutdown_state.shutdown().await;
    log::info!("server stopped");
    Ok(())
}
