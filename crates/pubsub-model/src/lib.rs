//! Payloads shared by the publisher and subscriber services.
//!
//! Both services are thin HTTP shims in front of a pub/sub sidecar: the
//! publisher relays orders to the sidecar's publish API, and subscribers
//! receive the sidecar's envelope deliveries on one route per topic.

pub mod envelope;
pub mod order;
pub mod shutdown;
pub mod sidecar;
pub mod subscription;
pub mod telemetry;

pub use envelope::Envelope;
pub use order::Order;
pub use shutdown::ShutdownSignal;
pub use sidecar::{publish_url, SidecarEndpoint, DEFAULT_PUBSUB_NAME};
pub use subscription::{
    dedup_bindings, BindingError, Subscription, SubscriptionSet, TopicBinding,
};
