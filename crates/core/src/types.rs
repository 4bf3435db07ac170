use serde::{Deserialize, Serialize};

/// Structured key-value payload attached to a tracking event.
pub type PropertyMap = serde_json::Map<String, serde_json::Value>;

/// A single emitted event as seen by a tracking service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedEvent {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<PropertyMap>,
}

impl TrackedEvent {
    pub fn new(name: impl Into<String>, properties: Option<PropertyMap>) -> Self {
        Self {
            name: name.into(),
            properties,
        }
    }

    /// Look up a single property value by key.
    pub fn property(&self, key: &str) -> Option<&serde_json::Value> {
        self.properties.as_ref().and_then(|p| p.get(key))
    }
}
