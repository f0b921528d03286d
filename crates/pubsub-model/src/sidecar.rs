use std::fmt;

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

/// Characters that would end or split a path segment if left raw.
const TOPIC_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Component name the sidecar's pub/sub component is registered under.
pub const DEFAULT_PUBSUB_NAME: &str = "pubsub";
pub const DEFAULT_SIDECAR_HOST: &str = "localhost";
pub const DEFAULT_SIDECAR_HTTP_PORT: u16 = 3500;

/// Address of the co-located sidecar's HTTP API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidecarEndpoint {
    pub host: String,
    pub port: u16,
}

impl SidecarEndpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

impl Default for SidecarEndpoint {
    fn default() -> Self {
        Self::new(DEFAULT_SIDECAR_HOST, DEFAULT_SIDECAR_HTTP_PORT)
    }
}

impl fmt::Display for SidecarEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Sidecar publish URL for `topic`. Plain topic names are appended as they
/// are; `?`, `#`, `/`, `%` and whitespace are percent-encoded so the whole
/// topic stays one path segment instead of becoming a query or fragment.
pub fn publish_url(base_url: &str, pubsub_name: &str, topic: &str) -> String {
    format!(
        "{}/v1.0/publish/{}/{}",
        base_url.trim_end_matches('/'),
        pubsub_name,
        utf8_percent_encode(topic, TOPIC_SEGMENT)
    )
}
