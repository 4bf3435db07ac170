//! Gleanster — decorates UI components so their callback props emit
//! analytics events, without the components knowing about tracking.
//!
//! # Modules
//!
//! - [`dispatcher`] — Event tracker fanning events out to tracking services
//! - [`context`] — Tracking provider scoping a tracker to a component subtree
//! - [`component`] — Minimal component model (value props, callback props)
//! - [`config`] — Wrap-time config, instance overrides, and their merge
//! - [`with_tracking`] — The decorator that intercepts one callback prop
//! - [`services`] — Bundled services (log, dataLayer) and settings assembly

pub mod component;
pub mod config;
pub mod context;
pub mod dispatcher;
pub mod services;
pub mod with_tracking;

pub use component::{component_fn, Component, Handler, Props};
pub use config::{EventProperties, TrackingConfig, TrackingOverrides};
pub use context::{use_tracking, TrackingProvider};
pub use dispatcher::EventTracker;
pub use gleanster_core::{
    GleansterError, GleansterResult, GleansterSettings, PropertyMap, TrackingService,
};
pub use services::{tracker_from_settings, DataLayerService, LogService};
pub use with_tracking::{with_tracking, Tracked, TrackedProps, WithTracking};
