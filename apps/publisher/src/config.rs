use std::net::SocketAddr;

use anyhow::{bail, Context};
use clap::Parser;
use pubsub_model::sidecar::{DEFAULT_SIDECAR_HOST, DEFAULT_SIDECAR_HTTP_PORT};
use pubsub_model::{SidecarEndpoint, DEFAULT_PUBSUB_NAME};

#[derive(Debug, Parser)]
#[command(
    name = "publisher",
    author,
    version,
    about = "Relays publish requests to the local pub/sub sidecar"
)]
pub struct Cli {
    /// Address the HTTP listener binds to.
    #[arg(long, env = "PUBLISHER_LISTEN_ADDR", default_value = "0.0.0.0:8080")]
    pub listen_addr: String,

    /// Host the sidecar's HTTP API listens on.
    #[arg(long, env = "DAPR_HOST", default_value = DEFAULT_SIDECAR_HOST)]
    pub dapr_host: String,

    /// Port of the sidecar's HTTP API.
    #[arg(long, env = "DAPR_HTTP_PORT", default_value_t = DEFAULT_SIDECAR_HTTP_PORT)]
    pub dapr_http_port: u16,

    /// Name of the sidecar pub/sub component to publish through.
    #[arg(long, env = "PUBSUB_NAME", default_value = DEFAULT_PUBSUB_NAME)]
    pub pubsub_name: String,
}

/// Startup configuration; built once and shared read-only with handlers.
#[derive(Debug, Clone)]
pub struct PublisherConfig {
    pub listen_addr: SocketAddr,
    pub sidecar: SidecarEndpoint,
    pub pubsub_name: String,
}

impl PublisherConfig {
    /// Configuration for an embedded relay pointed at `sidecar`.
    pub fn for_sidecar(sidecar: SidecarEndpoint) -> Self {
        Self {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            sidecar,
            pubsub_name: DEFAULT_PUBSUB_NAME.to_string(),
        }
    }
}

impl TryFrom<Cli> for PublisherConfig {
    type Error = anyhow::Error;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        let listen_addr: SocketAddr = cli
            .listen_addr
            .parse()
            .with_context(|| format!("invalid listen address: {}", cli.listen_addr))?;
        let pubsub_name = cli.pubsub_name.trim().to_string();
        if pubsub_name.is_empty() {
            bail!("pubsub component name must not be empty");
        }
        let host = cli.dapr_host.trim();
        if host.is_empty() {
            bail!("sidecar host must not be empty");
        }
        Ok(Self {
            listen_addr,
            sidecar: SidecarEndpoint::new(host, cli.dapr_http_port),
            pubsub_name,
        })
    }
}
