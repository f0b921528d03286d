use serde::{Deserialize, Serialize};
use serde_json::Value;

/// CloudEvents-style record the sidecar POSTs to a subscriber route.
///
/// Every field defaults when absent so any JSON object is accepted; the
/// subscriber only reads `data` (and `topic` for diagnostics).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Envelope {
    pub datacontenttype: Option<String>,
    pub source: Option<String>,
    pub topic: Option<String>,
    pub pubsubname: Option<String>,
    pub traceid: Option<String>,
    pub id: Option<String>,
    pub specversion: Option<String>,
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    pub data: Value,
}

impl Envelope {
    /// Message body as printed in delivery logs. Text data is shown raw,
    /// structured data as compact JSON.
    pub fn data_text(&self) -> String {
        match &self.data {
            Value::Null => String::new(),
            Value::String(text) => text.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_sidecar_delivery() {
        let raw = json!({
            "datacontenttype": "text/plain",
            "source": "publisher",
            "topic": "A",
            "pubsubname": "pubsub",
            "traceid": "00-abc-def-01",
            "id": "5929aaac-a5e2-4ca1-859c-edfe73f11565",
            "specversion": "1.0",
            "type": "com.dapr.event.sent",
            "data": "hello"
        });
        let envelope: Envelope = serde_json::from_value(raw).unwrap();
        assert_eq!(envelope.topic.as_deref(), Some("A"));
        assert_eq!(envelope.event_type.as_deref(), Some("com.dapr.event.sent"));
        assert_eq!(envelope.data_text(), "hello");
    }

    #[test]
    fn empty_object_is_a_valid_envelope() {
        let envelope: Envelope = serde_json::from_str("{}").unwrap();
        assert_eq!(envelope, Envelope::default());
        assert_eq!(envelope.data_text(), "");
    }

    #[test]
    fn structured_data_renders_as_json() {
        let envelope: Envelope =
            serde_json::from_value(json!({"data": {"orderId": 7}})).unwrap();
        assert_eq!(envelope.data_text(), r#"{"orderId":7}"#);
    }

    #[test]
    fn non_object_is_rejected() {
        assert!(serde_json::from_str::<Envelope>("[1,2]").is_err());
    }
}
