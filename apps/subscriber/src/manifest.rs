//! Declarative subscription resources for deployments that configure
//! subscriptions outside the service.
//!
//! Each topic becomes one `dapr.io/v1alpha1` `Subscription` document. The
//! documents are emitted as JSON separated by `---`, which YAML loaders and
//! `kubectl apply -f` both accept.

use serde::Serialize;

use crate::config::SubscriberConfig;

const API_VERSION: &str = "dapr.io/v1alpha1";
const KIND: &str = "Subscription";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionManifest {
    pub api_version: &'static str,
    pub kind: &'static str,
    pub metadata: ManifestMetadata,
    pub spec: ManifestSpec,
    pub scopes: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ManifestMetadata {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct ManifestSpec {
    pub topic: String,
    pub route: String,
    pub pubsubname: String,
}

pub fn manifests(config: &SubscriberConfig, app_id: &str) -> Vec<SubscriptionManifest> {
    config
        .bindings
        .iter()
        .map(|binding| SubscriptionManifest {
            api_version: API_VERSION,
            kind: KIND,
            metadata: ManifestMetadata {
                name: resource_name(app_id, binding.topic()),
            },
            spec: ManifestSpec {
                topic: binding.topic().to_string(),
                route: binding.path(),
                pubsubname: config.pubsub_name.clone(),
            },
            scopes: vec![app_id.to_string()],
        })
        .collect()
}

pub fn render(config: &SubscriberConfig, app_id: &str) -> serde_json::Result<String> {
    let docs = manifests(config, app_id)
        .iter()
        .map(serde_json::to_string_pretty)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(docs.join("\n---\n") + "\n")
}

/// Lowercase DNS-label form of `<app_id>-<topic>`.
fn resource_name(app_id: &str, topic: &str) -> String {
    let raw = format!("{app_id}-{topic}").to_ascii_lowercase();
    let mut name = String::with_capacity(raw.len());
    for ch in raw.chars() {
        let ch = if ch.is_ascii_alphanumeric() { ch } else { '-' };
        if ch == '-' && name.ends_with('-') {
            continue;
        }
        name.push(ch);
    }
    name.trim_matches('-').chars().take(63).collect()
}
