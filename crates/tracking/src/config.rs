//! Tracking configuration — wrap-time defaults, per-instance overrides, and
//! the field-by-field merge that produces the effective settings for a render.

use std::fmt;
use std::sync::Arc;

use gleanster_core::{GleansterError, GleansterResult, PropertyMap};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

use crate::component::Props;

/// Prop name overriding the wrap-time event name.
pub const TRACK_EVENT_NAME: &str = "track_eventName";
/// Prop name overriding the intercepted handler.
pub const TRACK_HANDLER_TYPE: &str = "track_handlerType";
/// Prop name supplying per-instance event properties.
pub const TRACK_PROPERTIES: &str = "track_properties";
/// Prop name disabling tracking for one instance.
pub const TRACK_DISABLED: &str = "track_disabled";

/// Every override prop name. None of these ever reach the inner component.
pub const OVERRIDE_PROPS: [&str; 4] =
    [TRACK_EVENT_NAME, TRACK_HANDLER_TYPE, TRACK_PROPERTIES, TRACK_DISABLED];

/// Computes event properties from the forwarded props and the call arguments.
pub type PropertiesFn = Arc<dyn Fn(&Props, &[Value]) -> PropertyMap + Send + Sync>;

/// Properties attached to an event: a fixed object, or one computed at fire time.
#[derive(Clone)]
pub enum EventProperties {
    Static(PropertyMap),
    Computed(PropertiesFn),
}

impl EventProperties {
    pub fn computed<F>(f: F) -> Self
    where
        F: Fn(&Props, &[Value]) -> PropertyMap + Send + Sync + 'static,
    {
        EventProperties::Computed(Arc::new(f))
    }

    pub fn evaluate(&self, props: &Props, args: &[Value]) -> PropertyMap {
        match self {
            EventProperties::Static(map) => map.clone(),
            EventProperties::Computed(f) => f(props, args),
        }
    }
}

impl fmt::Debug for EventProperties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventProperties::Static(map) => f.debug_tuple("Static").field(map).finish(),
            EventProperties::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

impl From<PropertyMap> for EventProperties {
    fn from(map: PropertyMap) -> Self {
        EventProperties::Static(map)
    }
}

impl TryFrom<Value> for EventProperties {
    type Error = GleansterError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(EventProperties::Static(map)),
            Value::Null => Ok(EventProperties::Static(PropertyMap::new())),
            other => Err(GleansterError::InvalidProperties(other.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for EventProperties {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        PropertyMap::deserialize(deserializer).map(EventProperties::Static)
    }
}

/// Wrap-time tracking configuration. Captured once and never mutated.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrackingConfig {
    #[serde(default, alias = "track_eventName")]
    pub event_name: Option<String>,
    #[serde(default, alias = "track_handlerType")]
    pub handler_prop_name: Option<String>,
    #[serde(default, alias = "track_properties")]
    pub properties: Option<EventProperties>,
}

impl TrackingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from JSON, e.g. from a settings file.
    pub fn from_json(json: &str) -> GleansterResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn event_name(mut self, event_name: impl Into<String>) -> Self {
        self.event_name = Some(event_name.into());
        self
    }

    pub fn handler(mut self, handler_prop_name: impl Into<String>) -> Self {
        self.handler_prop_name = Some(handler_prop_name.into());
        self
    }

    pub fn properties(mut self, properties: impl Into<EventProperties>) -> Self {
        self.properties = Some(properties.into());
        self
    }

    pub fn computed_properties<F>(mut self, f: F) -> Self
    where
        F: Fn(&Props, &[Value]) -> PropertyMap + Send + Sync + 'static,
    {
        self.properties = Some(EventProperties::computed(f));
        self
    }
}

/// Per-instance overrides. Every field shadows its wrap-time counterpart
/// independently.
#[derive(Debug, Clone, Default)]
pub struct TrackingOverrides {
    pub event_name: Option<String>,
    pub handler_type: Option<String>,
    pub properties: Option<EventProperties>,
    pub disabled: Option<bool>,
}

impl TrackingOverrides {
    /// Remove every `track_*` prop from `props`, adopting the ones that carry
    /// a usable value for fields not already set.
    pub fn absorb(&mut self, props: &mut Props) {
        for name in OVERRIDE_PROPS {
            props.remove_handler(name);
            let Some(value) = props.remove(name) else {
                continue;
            };
            match name {
                TRACK_EVENT_NAME => adopt_string(&mut self.event_name, name, value),
                TRACK_HANDLER_TYPE => adopt_string(&mut self.handler_type, name, value),
                TRACK_DISABLED => match value {
                    Value::Bool(disabled) => {
                        self.disabled.get_or_insert(disabled);
                    }
                    Value::Null => {}
                    other => {
                        warn!(prop = name, value = %other, "ignoring non-boolean override prop")
                    }
                },
                _ => {
                    if self.properties.is_some() {
                        continue;
                    }
                    match EventProperties::try_from(value) {
                        Ok(properties) => self.properties = Some(properties),
                        Err(error) => warn!(prop = name, %error, "ignoring override prop"),
                    }
                }
            }
        }
    }
}

fn adopt_string(slot: &mut Option<String>, name: &str, value: Value) {
    match value {
        Value::String(s) => {
            slot.get_or_insert(s);
        }
        Value::Null => {}
        other => warn!(prop = name, value = %other, "ignoring non-string override prop"),
    }
}

/// The tracking settings in effect for one render.
#[derive(Debug, Clone, Default)]
pub struct EffectiveTracking {
    pub event_name: Option<String>,
    pub handler_prop_name: Option<String>,
    /// Evaluated in order; later keys win.
    pub property_sources: Vec<EventProperties>,
    pub disabled: bool,
}

impl EffectiveTracking {
    /// Merge wrap-time config with instance overrides, field by field.
    pub fn resolve(config: &TrackingConfig, overrides: TrackingOverrides) -> Self {
        let property_sources = config
            .properties
            .iter()
            .cloned()
            .chain(overrides.properties)
            .collect();

        Self {
            event_name: overrides.event_name.or_else(|| config.event_name.clone()),
            handler_prop_name: overrides
                .handler_type
                .or_else(|| config.handler_prop_name.clone())
                .filter(|name| !name.is_empty()),
            property_sources,
            disabled: overrides.disabled.unwrap_or(false),
        }
    }

    /// Event name to emit, if tracking should fire at all.
    pub fn firing_event_name(&self) -> Option<&str> {
        match (self.event_name.as_deref(), self.handler_prop_name.as_deref()) {
            (Some(event), Some(_)) if !event.is_empty() => Some(event),
            _ => None,
        }
    }

    /// Evaluate every property source and merge the results.
    pub fn merged_properties(&self, props: &Props, args: &[Value]) -> PropertyMap {
        self.property_sources
            .iter()
            .fold(PropertyMap::new(), |mut merged, source| {
                merged.extend(source.evaluate(props, args));
                merged
            })
    }
}
