//! Log service — writes every tracking event to the `tracing` pipeline.

use std::str::FromStr;

use anyhow::{anyhow, Result};
use gleanster_core::{PropertyMap, TrackingService};
use tracing::{debug, error, info, trace, warn, Level};

/// Emits each event as a `tracing` event at a fixed level.
pub struct LogService {
    level: Level,
}

impl LogService {
    pub fn new(level: Level) -> Self {
        Self { level }
    }

    /// Parse a level name such as "debug" or "INFO".
    pub fn from_level_name(name: &str) -> Result<Self> {
        Level::from_str(name)
            .map(Self::new)
            .map_err(|_| anyhow!("unknown log level '{}'", name))
    }

    pub fn level(&self) -> Level {
        self.level
    }
}

impl Default for LogService {
    fn default() -> Self {
        Self::new(Level::DEBUG)
    }
}

impl TrackingService for LogService {
    fn name(&self) -> &str {
        "log"
    }

    fn emit_event(&self, event_name: &str, properties: Option<&PropertyMap>) -> Result<()> {
        let rendered = match properties {
            Some(props) => serde_json::to_string(props)?,
            None => "{}".to_string(),
        };
        match self.level {
            Level::ERROR => error!(
                target: "gleanster::events",
                event = event_name,
                properties = %rendered,
                "tracking event"
            ),
            Level::WARN => warn!(
                target: "gleanster::events",
                event = event_name,
                properties = %rendered,
                "tracking event"
            ),
            Level::INFO => info!(
                target: "gleanster::events",
                event = event_name,
                properties = %rendered,
                "tracking event"
            ),
            Level::DEBUG => debug!(
                target: "gleanster::events",
                event = event_name,
                properties = %rendered,
                "tracking event"
            ),
            _ => trace!(
                target: "gleanster::events",
                event = event_name,
                properties = %rendered,
                "tracking event"
            ),
        }
        Ok(())
    }
}
