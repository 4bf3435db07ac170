use serde::Deserialize;
use tracing::debug;

/// Root tracking configuration. Loaded from environment variables
/// with the prefix `GLEANSTER__`.
#[derive(Debug, Clone, Deserialize)]
pub struct GleansterSettings {
    #[serde(default = "default_log_events")]
    pub log_events: bool,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub data_layer: DataLayerSettings,
}

fn default_log_events() -> bool {
    false
}
fn default_log_level() -> String {
    "debug".to_string()
}

impl Default for GleansterSettings {
    fn default() -> Self {
        Self {
            log_events: default_log_events(),
            log_level: default_log_level(),
            data_layer: DataLayerSettings::default(),
        }
    }
}

// ─── Data Layer Settings ────────────────────────────────────────────────
#[derive(Debug, Clone, Deserialize)]
pub struct DataLayerSettings {
    #[serde(default = "default_data_layer_enabled")]
    pub enabled: bool,
    #[serde(default = "default_data_layer_name")]
    pub name: String,
    #[serde(default = "default_include_timestamp")]
    pub include_timestamp: bool,
}

fn default_data_layer_enabled() -> bool {
    false
}
fn default_data_layer_name() -> String {
    "dataLayer".to_string()
}
fn default_include_timestamp() -> bool {
    true
}

impl Default for DataLayerSettings {
    fn default() -> Self {
        Self {
            enabled: default_data_layer_enabled(),
            name: default_data_layer_name(),
            include_timestamp: default_include_timestamp(),
        }
    }
}

impl GleansterSettings {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(config::Environment::with_prefix("GLEANSTER"))
    }

    fn load_from(env: config::Environment) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .add_source(env.separator("__").try_parsing(true));

        let config = builder.build()?;
        let settings: Self = config.try_deserialize()?;
        debug!(
            log_events = settings.log_events,
            data_layer = settings.data_layer.enabled,
            "tracking settings loaded"
        );
        Ok(settings)
    }
}
