use anyhow::Context;
use clap::Parser;
use pubsub_model::telemetry::init_tracing;
use pubsub_model::ShutdownSignal;
use subscriber::config::{Cli, Command, SubscriberConfig};
use subscriber::{manifest, routes};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = SubscriberConfig::try_from(&cli)?;

    if let Some(Command::RenderSubscriptions { app_id }) = &cli.command {
        let rendered =
            manifest::render(&cfg, app_id).context("failed to render subscriptions")?;
        print!("{rendered}");
        return Ok(());
    }

    init_tracing("info,subscriber=debug");
    info!(
        addr = %cfg.listen_addr,
        profile = ?cli.profile,
        topics = ?cfg.topics(),
        discovery = ?cfg.discovery,
        pubsub = %cfg.pubsub_name,
        "starting subscriber"
    );

    let app = routes::router(&cfg);
    let shutdown = ShutdownSignal::install().context("failed to install signal handlers")?;
    let listener = tokio::net::TcpListener::bind(cfg.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", cfg.listen_addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.recv())
        .await
        .context("subscriber server exited")?;
    info!("subscriber stopped");
    Ok(())
}
