use serde::{Deserialize, Serialize};

/// Publish request accepted by the relay. Lives for one request only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub topic: String,
    pub message: String,
}
