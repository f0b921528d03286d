use axum::{
    body::{Body, Bytes},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use pubsub_model::{publish_url, Order};
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::PublisherConfig;

const TEXT_PLAIN: &str = "text/plain";

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("sidecar request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("reading sidecar response from {url} failed: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Uncaught relay failures become a bare 500; nothing is retried.
impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        warn!(error = %self, "publish relay failed");
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    }
}

/// Sidecar answer, handed back to the original caller untouched.
#[derive(Debug, Clone)]
pub struct RelayedResponse {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

impl IntoResponse for RelayedResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        if let Some(content_type) = self.content_type {
            response
                .headers_mut()
                .insert(header::CONTENT_TYPE, content_type);
        }
        response
    }
}

/// Outbound half of the relay: posts order messages to the sidecar's
/// publish API. No timeout is set, so a hung sidecar holds the request.
#[derive(Clone)]
pub struct SidecarPublisher {
    http: Client,
    base_url: String,
    pubsub_name: String,
}

impl SidecarPublisher {
    pub fn new(config: &PublisherConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(http: Client, config: &PublisherConfig) -> Self {
        Self {
            http,
            base_url: config.sidecar.base_url(),
            pubsub_name: config.pubsub_name.clone(),
        }
    }

    pub fn topic_url(&self, topic: &str) -> String {
        publish_url(&self.base_url, &self.pubsub_name, topic)
    }

    pub async fn publish(&self, order: &Order) -> Result<RelayedResponse, RelayError> {
        let url = self.topic_url(&order.topic);
        let res = self
            .http
            .post(&url)
            .header(header::CONTENT_TYPE, TEXT_PLAIN)
            .header(header::ACCEPT, TEXT_PLAIN)
            .body(order.message.clone())
            .send()
            .await
            .map_err(|source| RelayError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = res.status();
        let content_type = res.headers().get(header::CONTENT_TYPE).cloned();
        let body = res
            .bytes()
            .await
            .map_err(|source| RelayError::Body { url: url.clone(), source })?;
        debug!(%url, status = status.as_u16(), bytes = body.len(), "sidecar answered");
        Ok(RelayedResponse {
            status,
            content_type,
            body,
        })
    }
}
