//! Tracking decorator — co-opts one callback prop of a component
//! ("onClick", "onChange", "onMouseEnter", ...) and emits a tracking event
//! whenever it fires, using the config given at wrap time or the `track_*`
//! overrides given to the instance.

use std::borrow::Cow;
use std::sync::Arc;

use serde_json::Value;

use crate::component::{Component, Handler, Props};
use crate::config::{EffectiveTracking, EventProperties, TrackingConfig, TrackingOverrides};
use crate::context::use_tracking;
use crate::dispatcher::EventTracker;

/// Wrap a component so it can be configured for tracking.
pub fn with_tracking<C>(component: C) -> WithTracking<C>
where
    C: Component<Props = Props>,
{
    WithTracking {
        component: Arc::new(component),
    }
}

/// A component awaiting its wrap-time [`TrackingConfig`].
pub struct WithTracking<C> {
    component: Arc<C>,
}

impl<C> WithTracking<C>
where
    C: Component<Props = Props>,
{
    pub fn configure(&self, config: TrackingConfig) -> Tracked<C> {
        let display_name = format!("withTracking({})", self.component.display_name());
        Tracked {
            component: self.component.clone(),
            config: Arc::new(config),
            display_name,
        }
    }

    /// Configure with no wrap-time defaults; instances supply everything.
    pub fn configure_default(&self) -> Tracked<C> {
        self.configure(TrackingConfig::default())
    }
}

/// Props for a tracked component: the inner component's props plus the
/// per-instance overrides.
#[derive(Debug, Clone, Default)]
pub struct TrackedProps {
    pub props: Props,
    pub overrides: TrackingOverrides,
}

impl TrackedProps {
    pub fn new(props: Props) -> Self {
        Self {
            props,
            overrides: TrackingOverrides::default(),
        }
    }

    pub fn track_event_name(mut self, event_name: impl Into<String>) -> Self {
        self.overrides.event_name = Some(event_name.into());
        self
    }

    pub fn track_handler_type(mut self, handler_type: impl Into<String>) -> Self {
        self.overrides.handler_type = Some(handler_type.into());
        self
    }

    pub fn track_properties(mut self, properties: impl Into<EventProperties>) -> Self {
        self.overrides.properties = Some(properties.into());
        self
    }

    pub fn track_computed_properties<F>(mut self, f: F) -> Self
    where
        F: Fn(&Props, &[Value]) -> gleanster_core::PropertyMap + Send + Sync + 'static,
    {
        self.overrides.properties = Some(EventProperties::computed(f));
        self
    }

    pub fn track_disabled(mut self, disabled: bool) -> Self {
        self.overrides.disabled = Some(disabled);
        self
    }
}

impl From<Props> for TrackedProps {
    fn from(props: Props) -> Self {
        Self::new(props)
    }
}

/// A component whose configured callback prop emits tracking events.
pub struct Tracked<C> {
    component: Arc<C>,
    config: Arc<TrackingConfig>,
    display_name: String,
}

impl<C> Tracked<C> {
    pub fn config(&self) -> &TrackingConfig {
        &self.config
    }
}

impl<C> Clone for Tracked<C> {
    fn clone(&self) -> Self {
        Self {
            component: self.component.clone(),
            config: self.config.clone(),
            display_name: self.display_name.clone(),
        }
    }
}

impl<C> Component for Tracked<C>
where
    C: Component<Props = Props>,
{
    type Props = TrackedProps;
    type Output = C::Output;

    fn display_name(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.display_name)
    }

    /// Must run inside a [`TrackingProvider`](crate::context::TrackingProvider)
    /// whenever the resolved config would fire tracking.
    ///
    /// # Panics
    ///
    /// The injected callback panics when it fires with tracking enabled and
    /// no provider was in scope at render time.
    fn render(&self, input: TrackedProps) -> C::Output {
        let TrackedProps {
            mut props,
            mut overrides,
        } = input;
        overrides.absorb(&mut props);

        let effective = EffectiveTracking::resolve(&self.config, overrides);
        if !effective.disabled {
            if let Some(handler_name) = effective.handler_prop_name.clone() {
                let wrapped = tracking_handler(effective, &props, &handler_name, use_tracking());
                props.set_handler(handler_name, wrapped);
            }
        }

        self.component.render(props)
    }
}

/// Build the callback that tracks, then forwards to the original handler.
fn tracking_handler(
    effective: EffectiveTracking,
    props: &Props,
    handler_name: &str,
    event_tracker: Option<Arc<EventTracker>>,
) -> Handler {
    let forwarded = props.clone();
    let original = props.handler(handler_name).cloned();

    Arc::new(move |args: &[Value]| {
        if let Some(event_name) = effective.firing_event_name() {
            let properties = effective.merged_properties(&forwarded, args);
            event_tracker
                .as_ref()
                .expect("tracked component rendered outside of a TrackingProvider")
                .track(event_name, Some(&properties));
        }

        if let Some(original) = &original {
            original(args);
        }
    })
}
