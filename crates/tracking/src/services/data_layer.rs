//! Data layer service — records every event as a Google Tag Manager style
//! `dataLayer` push, kept in memory for the embedding page or app to read.

use anyhow::{anyhow, Result};
use chrono::Utc;
use gleanster_core::config::DataLayerSettings;
use gleanster_core::{PropertyMap, TrackingService};
use parking_lot::Mutex;
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

/// In-memory `dataLayer` that tracking events are pushed onto.
pub struct DataLayerService {
    settings: DataLayerSettings,
    entries: Mutex<Vec<Value>>,
}

impl DataLayerService {
    pub fn new(settings: DataLayerSettings) -> Self {
        Self {
            settings,
            entries: Mutex::new(Vec::new()),
        }
    }

    pub fn settings(&self) -> &DataLayerSettings {
        &self.settings
    }

    /// Snapshot of every push so far.
    pub fn entries(&self) -> Vec<Value> {
        self.entries.lock().clone()
    }

    /// Take every push, leaving the layer empty.
    pub fn drain(&self) -> Vec<Value> {
        std::mem::take(&mut *self.entries.lock())
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Build the push payload. Reserved keys win over event properties.
    fn payload(&self, event_name: &str, properties: Option<&PropertyMap>) -> Value {
        let mut payload = properties.cloned().unwrap_or_default();
        payload.insert("event".into(), Value::from(event_name));
        payload.insert("gtm.uniqueEventId".into(), Value::from(Uuid::new_v4().to_string()));
        if self.settings.include_timestamp {
            payload.insert("timestamp".into(), Value::from(Utc::now().to_rfc3339()));
        }
        Value::Object(payload)
    }
}

impl Default for DataLayerService {
    fn default() -> Self {
        Self::new(DataLayerSettings::default())
    }
}

impl TrackingService for DataLayerService {
    fn name(&self) -> &str {
        &self.settings.name
    }

    fn init(&self) -> Result<()> {
        if self.settings.name.trim().is_empty() {
            return Err(anyhow!("dataLayer name must not be empty"));
        }
        Ok(())
    }

    fn emit_event(&self, event_name: &str, properties: Option<&PropertyMap>) -> Result<()> {
        let payload = self.payload(event_name, properties);
        self.entries.lock().push(payload);

        debug!(
            event_name,
            data_layer = %self.settings.name,
            "dataLayer push recorded"
        );
        Ok(())
    }
}
