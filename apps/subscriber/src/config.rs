use std::net::SocketAddr;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use pubsub_model::subscription::dedup_bindings;
use pubsub_model::{SubscriptionSet, TopicBinding, DEFAULT_PUBSUB_NAME};

#[derive(Debug, Parser)]
#[command(
    name = "subscriber",
    author,
    version,
    about = "Receives pub/sub deliveries from the sidecar, one route per topic"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Address the HTTP listener binds to.
    #[arg(long, env = "SUBSCRIBER_LISTEN_ADDR", default_value = "0.0.0.0:8081")]
    pub listen_addr: String,

    /// Deployment preset supplying the default topics and discovery mode.
    #[arg(long, env = "SUBSCRIBER_PROFILE", value_enum, default_value_t = Profile::One)]
    pub profile: Profile,

    /// Topic bindings as `topic` or `topic=route`; replaces the profile's topics.
    #[arg(long = "topic", env = "SUBSCRIBER_TOPICS", value_delimiter = ',')]
    pub topics: Vec<TopicBinding>,

    /// How the sidecar learns the subscriptions; defaults to the profile's mode.
    #[arg(long, env = "SUBSCRIBER_DISCOVERY", value_enum)]
    pub discovery: Option<DiscoveryMode>,

    /// Pub/sub component the subscriptions refer to.
    #[arg(long, env = "PUBSUB_NAME", default_value = DEFAULT_PUBSUB_NAME)]
    pub pubsub_name: String,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Serve delivery routes (the default).
    Serve,
    /// Print declarative subscription manifests for the configured topics.
    RenderSubscriptions {
        /// App id the subscriptions are scoped to.
        #[arg(long, env = "APP_ID", default_value = "subscriber")]
        app_id: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Profile {
    /// Topics A and B, advertised through `/dapr/subscribe`.
    One,
    /// Topics A and C, declared in deployment configuration.
    Two,
}

impl Profile {
    pub fn default_topics(self) -> &'static [&'static str] {
        match self {
            Profile::One => &["A", "B"],
            Profile::Two => &["A", "C"],
        }
    }

    pub fn default_discovery(self) -> DiscoveryMode {
        match self {
            Profile::One => DiscoveryMode::Programmatic,
            Profile::Two => DiscoveryMode::Declarative,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DiscoveryMode {
    /// Serve `GET /dapr/subscribe`.
    Programmatic,
    /// No discovery route; subscriptions live in external configuration.
    Declarative,
}

#[derive(Debug, Clone)]
pub struct SubscriberConfig {
    pub listen_addr: SocketAddr,
    pub pubsub_name: String,
    pub bindings: Vec<TopicBinding>,
    pub discovery: DiscoveryMode,
}

impl SubscriberConfig {
    pub fn from_profile(profile: Profile) -> anyhow::Result<Self> {
        let bindings = profile
            .default_topics()
            .iter()
            .map(|topic| TopicBinding::new(*topic))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            pubsub_name: DEFAULT_PUBSUB_NAME.to_string(),
            bindings,
            discovery: profile.default_discovery(),
        })
    }

    pub fn subscriptions(&self) -> SubscriptionSet {
        SubscriptionSet::from_bindings(&self.pubsub_name, &self.bindings)
    }

    pub fn topics(&self) -> Vec<&str> {
        self.bindings.iter().map(TopicBinding::topic).collect()
    }
}

impl TryFrom<&Cli> for SubscriberConfig {
    type Error = anyhow::Error;

    fn try_from(cli: &Cli) -> Result<Self, Self::Error> {
        let mut config = Self::from_profile(cli.profile)?;
        config.listen_addr = cli
            .listen_addr
            .parse()
            .with_context(|| format!("invalid listen address: {}", cli.listen_addr))?;
        config.pubsub_name = cli.pubsub_name.trim().to_string();
        if config.pubsub_name.is_empty() {
            bail!("pubsub component name must not be empty");
        }
        if !cli.topics.is_empty() {
            config.bindings = cli.topics.clone();
        }
        config.bindings =
            dedup_bindings(config.bindings).context("conflicting topic bindings")?;
        if let Some(discovery) = cli.discovery {
            config.discovery = discovery;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const ENV_KEYS: &[&str] = &[
        "SUBSCRIBER_PROFILE",
        "SUBSCRIBER_TOPICS",
        "SUBSCRIBER_DISCOVERY",
        "PUBSUB_NAME",
    ];

    fn parse(args: &[&str]) -> anyhow::Result<SubscriberConfig> {
        let mut argv = vec!["subscriber"];
        argv.extend_from_slice(args);
        let cli = Cli::try_parse_from(argv)?;
        SubscriberConfig::try_from(&cli)
    }

    fn clear_env() {
        for key in ENV_KEYS {
            std::env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn profile_one_is_programmatic_a_and_b() {
        clear_env();
        let cfg = parse(&[]).unwrap();
        assert_eq!(cfg.topics(), vec!["A", "B"]);
        assert_eq!(cfg.discovery, DiscoveryMode::Programmatic);
        assert_eq!(cfg.subscriptions().len(), 2);
    }

    #[test]
    #[serial]
    fn profile_two_is_declarative_a_and_c() {
        clear_env();
        let cfg = parse(&["--profile", "two"]).unwrap();
        assert_eq!(cfg.topics(), vec!["A", "C"]);
        assert_eq!(cfg.discovery, DiscoveryMode::Declarative);
    }

    #[test]
    #[serial]
    fn topics_from_env_replace_profile_topics() {
        clear_env();
        std::env::set_var("SUBSCRIBER_TOPICS", "orders=inbound/orders,audit,audit");
        let cfg = parse(&["--discovery", "declarative"]);
        clear_env();
        let cfg = cfg.unwrap();
        assert_eq!(cfg.topics(), vec!["orders", "audit"]);
        assert_eq!(cfg.bindings[0].path(), "/inbound/orders");
        assert_eq!(cfg.discovery, DiscoveryMode::Declarative);
    }

    #[test]
    #[serial]
    fn conflicting_routes_are_rejected() {
        clear_env();
        let err = parse(&["--topic", "A", "--topic", "B=A"]).unwrap_err();
        assert!(format!("{err:#}").contains("bound to both"));
    }

    #[test]
    #[serial]
    fn invalid_topic_binding_fails_to_parse() {
        clear_env();
        assert!(parse(&["--topic", "A=:id"]).is_err());
    }

    #[test]
    #[serial]
    fn render_subcommand_parses_app_id() {
        clear_env();
        std::env::remove_var("APP_ID");
        let cli = Cli::try_parse_from(["subscriber", "render-subscriptions", "--app-id", "sub-two"])
            .unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::RenderSubscriptions { ref app_id }) if app_id == "sub-two"
        ));
    }
}
