//! Bundled tracking services and assembly of a tracker from settings.
//!
//! Each service implements [`TrackingService`]; the embedding application
//! adds its own backends alongside these.

pub mod data_layer;
pub mod log;

use std::sync::Arc;

use gleanster_core::{GleansterSettings, TrackingService};
use tracing::info;

use crate::dispatcher::EventTracker;

pub use data_layer::DataLayerService;
pub use log::LogService;

/// Build an [`EventTracker`] from settings. Bundled services enabled in
/// `settings` come first, followed by `services` in the order given.
pub fn tracker_from_settings(
    settings: &GleansterSettings,
    services: Vec<Arc<dyn TrackingService>>,
) -> anyhow::Result<EventTracker> {
    let mut tracker = EventTracker::new(Vec::with_capacity(services.len() + 2));

    if settings.log_events {
        let log = LogService::from_level_name(&settings.log_level)?;
        tracker = tracker.with_service(Arc::new(log));
    }
    if settings.data_layer.enabled {
        let data_layer = DataLayerService::new(settings.data_layer.clone());
        tracker = tracker.with_service(Arc::new(data_layer));
    }
    for service in services {
        tracker = tracker.with_service(service);
    }

    info!(services = tracker.len(), "event tracker assembled from settings");
    Ok(tracker)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use gleanster_core::service::capture_service;

    #[test]
    fn test_default_settings_only_register_custom_services() {
        let capture = capture_service();
        let services = vec![capture.clone() as Arc<dyn TrackingService>];
        let tracker = tracker_from_settings(&GleansterSettings::default(), services).unwrap();
        assert_eq!(tracker.len(), 1);

        tracker.track("click", None);
        assert_eq!(capture.count(), 1);
    }

    #[test]
    fn test_enabled_bundled_services_come_first() {
        let mut settings = GleansterSettings::default();
        settings.log_events = true;
        settings.data_layer.enabled = true;

        let services = vec![capture_service() as Arc<dyn TrackingService>];
        let tracker = tracker_from_settings(&settings, services).unwrap();
        assert_eq!(tracker.len(), 3);
        let debug = format!("{tracker:?}");
        let log_at = debug.find("log").unwrap();
        let layer_at = debug.find("dataLayer").unwrap();
        let capture_at = debug.find("capture").unwrap();
        assert!(log_at < layer_at && layer_at < capture_at);
    }

    #[test]
    fn test_invalid_log_level_is_rejected() {
        let mut settings = GleansterSettings::default();
        settings.log_events = true;
        settings.log_level = "loud".into();
        assert!(tracker_from_settings(&settings, Vec::new()).is_err());
    }
}
