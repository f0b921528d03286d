use anyhow::Context;
use clap::Parser;
use publisher::config::{Cli, PublisherConfig};
use publisher::routes;
use publisher::state::AppState;
use pubsub_model::telemetry::init_tracing;
use pubsub_model::ShutdownSignal;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing("info,publisher=debug");

    let cfg = PublisherConfig::try_from(Cli::parse())?;
    info!(
        addr = %cfg.listen_addr,
        pubsub = %cfg.pubsub_name,
        sidecar_url = %cfg.sidecar.base_url(),
        "starting publisher"
    );

    let listen_addr = cfg.listen_addr;
    let app = routes::router(AppState::new(&cfg));
    let shutdown = ShutdownSignal::install().context("failed to install signal handlers")?;
    let listener = tokio::net::TcpListener::bind(listen_addr)
        .await
        .with_context(|| format!("failed to bind {listen_addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.recv())
        .await
        .context("publisher server exited")?;
    info!("publisher stopped");
    Ok(())
}
