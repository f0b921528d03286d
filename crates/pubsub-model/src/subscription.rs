use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Paths the subscriber serves for itself; topic routes may not shadow them.
const RESERVED_ROUTES: &[&str] = &["dapr/subscribe", "health"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BindingError {
    #[error("topic name is empty")]
    EmptyTopic,
    #[error("route for topic {topic} is empty")]
    EmptyRoute { topic: String },
    #[error("route {route} contains unsupported character {ch:?}")]
    InvalidRoute { route: String, ch: char },
    #[error("route {route} is reserved")]
    ReservedRoute { route: String },
    #[error("route {route} is bound to both {first} and {second}")]
    DuplicateRoute {
        route: String,
        first: String,
        second: String,
    },
}

/// One topic and the inbound route its deliveries arrive on.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TopicBinding {
    topic: String,
    route: String,
}

impl TopicBinding {
    /// Binds `topic` to a route of the same name.
    pub fn new(topic: impl Into<String>) -> Result<Self, BindingError> {
        let topic = topic.into();
        let route = topic.clone();
        Self::with_route(topic, route)
    }

    pub fn with_route(
        topic: impl Into<String>,
        route: impl Into<String>,
    ) -> Result<Self, BindingError> {
        let topic = topic.into().trim().to_string();
        if topic.is_empty() {
            return Err(BindingError::EmptyTopic);
        }
        let route = route.into().trim().trim_matches('/').to_string();
        if route.is_empty() {
            return Err(BindingError::EmptyRoute { topic });
        }
        if let Some(ch) = route
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '/')))
        {
            return Err(BindingError::InvalidRoute { route, ch });
        }
        if RESERVED_ROUTES.contains(&route.as_str()) {
            return Err(BindingError::ReservedRoute { route });
        }
        Ok(Self { topic, route })
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Route name without the leading slash, as advertised to the sidecar.
    pub fn route(&self) -> &str {
        &self.route
    }

    /// Path the HTTP router mounts the delivery handler on.
    pub fn path(&self) -> String {
        format!("/{}", self.route)
    }
}

/// Accepts `topic` or `topic=route`.
impl FromStr for TopicBinding {
    type Err = BindingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((topic, route)) => Self::with_route(topic, route),
            None => Self::new(s),
        }
    }
}

impl fmt::Display for TopicBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.topic == self.route {
            f.write_str(&self.topic)
        } else {
            write!(f, "{}={}", self.topic, self.route)
        }
    }
}

/// Drops repeated bindings and rejects two topics sharing one route.
pub fn dedup_bindings(bindings: Vec<TopicBinding>) -> Result<Vec<TopicBinding>, BindingError> {
    let mut by_route: BTreeMap<String, String> = BTreeMap::new();
    let mut seen = BTreeSet::new();
    let mut out = Vec::with_capacity(bindings.len());
    for binding in bindings {
        if let Some(first) = by_route.get(&binding.route) {
            if *first != binding.topic {
                return Err(BindingError::DuplicateRoute {
                    route: binding.route.clone(),
                    first: first.clone(),
                    second: binding.topic.clone(),
                });
            }
        }
        by_route.insert(binding.route.clone(), binding.topic.clone());
        if seen.insert(binding.clone()) {
            out.push(binding);
        }
    }
    Ok(out)
}

/// Entry returned by the discovery endpoint.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Subscription {
    pub pubsubname: String,
    pub topic: String,
    pub route: String,
}

impl Subscription {
    pub fn new(
        pubsubname: impl Into<String>,
        topic: impl Into<String>,
        route: impl Into<String>,
    ) -> Self {
        Self {
            pubsubname: pubsubname.into(),
            topic: topic.into(),
            route: route.into(),
        }
    }
}

/// Value-deduplicated subscriptions, serialized as a plain JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubscriptionSet(BTreeSet<Subscription>);

impl SubscriptionSet {
    pub fn from_bindings<'a>(
        pubsub_name: &str,
        bindings: impl IntoIterator<Item = &'a TopicBinding>,
    ) -> Self {
        bindings
            .into_iter()
            .map(|b| Subscription::new(pubsub_name, b.topic(), b.route()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Subscription> {
        self.0.iter()
    }

    pub fn contains_topic(&self, topic: &str) -> bool {
        self.0.iter().any(|s| s.topic == topic)
    }
}

impl FromIterator<Subscription> for SubscriptionSet {
    fn from_iter<I: IntoIterator<Item = Subscription>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_routed_bindings() {
        let plain: TopicBinding = "A".parse().unwrap();
        assert_eq!(plain.topic(), "A");
        assert_eq!(plain.path(), "/A");

        let routed: TopicBinding = "orders=/inbound/orders".parse().unwrap();
        assert_eq!(routed.topic(), "orders");
        assert_eq!(routed.route(), "inbound/orders");
        assert_eq!(routed.to_string(), "orders=inbound/orders");
    }

    #[test]
    fn rejects_bad_bindings() {
        assert_eq!("".parse::<TopicBinding>(), Err(BindingError::EmptyTopic));
        assert!(matches!(
            "A=/".parse::<TopicBinding>(),
            Err(BindingError::EmptyRoute { .. })
        ));
        assert!(matches!(
            "A=:id".parse::<TopicBinding>(),
            Err(BindingError::InvalidRoute { ch: ':', .. })
        ));
        assert!(matches!(
            "health".parse::<TopicBinding>(),
            Err(BindingError::ReservedRoute { .. })
        ));
    }

    #[test]
    fn dedup_keeps_first_occurrence_and_rejects_shared_routes() {
        let a = TopicBinding::new("A").unwrap();
        let b = TopicBinding::new("B").unwrap();
        let deduped = dedup_bindings(vec![a.clone(), b.clone(), a.clone()]).unwrap();
        assert_eq!(deduped, vec![a.clone(), b]);

        let clash = TopicBinding::with_route("C", "A").unwrap();
        let err = dedup_bindings(vec![a, clash]).unwrap_err();
        assert!(matches!(err, BindingError::DuplicateRoute { .. }));
    }

    #[test]
    fn subscription_set_dedups_by_value() {
        let set: SubscriptionSet = [
            Subscription::new("pubsub", "A", "A"),
            Subscription::new("pubsub", "A", "A"),
            Subscription::new("pubsub", "B", "B"),
        ]
        .into_iter()
        .collect();
        assert_eq!(set.len(), 2);
        assert!(set.contains_topic("B"));
    }

    #[test]
    fn subscription_set_serializes_as_array() {
        let bindings = [TopicBinding::new("A").unwrap()];
        let set = SubscriptionSet::from_bindings("pubsub", &bindings);
        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{"pubsubname": "pubsub", "topic": "A", "route": "A"}])
        );
    }
}
