use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use pubsub_model::{Envelope, SubscriptionSet};
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use crate::config::{DiscoveryMode, SubscriberConfig};

async fn health() -> &'static str {
    "ok"
}

async fn discover(State(subscriptions): State<Arc<SubscriptionSet>>) -> Json<SubscriptionSet> {
    Json(subscriptions.as_ref().clone())
}

/// Logs the delivery and acknowledges it; there is no rejection path.
async fn deliver(topic: Arc<str>, envelope: Envelope) -> StatusCode {
    if let Some(delivered) = envelope.topic.as_deref() {
        if delivered != topic.as_ref() {
            debug!(%topic, delivered, "envelope topic differs from route topic");
        }
    }
    info!(
        %topic,
        id = envelope.id.as_deref().unwrap_or(""),
        "{}: {}",
        topic,
        envelope.data_text()
    );
    StatusCode::OK
}

pub fn router(config: &SubscriberConfig) -> Router {
    let mut router = Router::new().route("/health", get(health));

    if config.discovery == DiscoveryMode::Programmatic {
        let discovery = Router::new()
            .route("/dapr/subscribe", get(discover))
            .with_state(Arc::new(config.subscriptions()));
        router = router.merge(discovery);
    }

    for binding in &config.bindings {
        let topic: Arc<str> = Arc::from(binding.topic());
        router = router.route(
            &binding.path(),
            post(move |Json(envelope): Json<Envelope>| deliver(topic.clone(), envelope)),
        );
    }

    router.layer(TraceLayer::new_for_http())
}
