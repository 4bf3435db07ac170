//! Event tracker — fans tracking events out to every registered service and
//! runs their one-time initialization.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use gleanster_core::{GleansterError, GleansterResult, PropertyMap, TrackingService};
use tracing::{debug, info, warn};

/// Dispatches events to an ordered list of tracking services.
pub struct EventTracker {
    services: Vec<Arc<dyn TrackingService>>,
    init_complete: AtomicBool,
}

impl EventTracker {
    /// Services are called in the order given; duplicates are kept.
    pub fn new(services: Vec<Arc<dyn TrackingService>>) -> Self {
        Self {
            services,
            init_complete: AtomicBool::new(false),
        }
    }

    /// Builder: register one more service after the existing ones.
    pub fn with_service(mut self, service: Arc<dyn TrackingService>) -> Self {
        self.services.push(service);
        self
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    pub fn is_initialized(&self) -> bool {
        self.init_complete.load(Ordering::Acquire)
    }

    /// Run every service's `init` once. Later calls are no-ops.
    ///
    /// Every service is attempted even if an earlier one fails; the first
    /// failure is then returned. The tracker counts as initialized after the
    /// first attempt either way.
    pub fn init_client(&self) -> GleansterResult<()> {
        if self.init_complete.swap(true, Ordering::AcqRel) {
            return Ok(());
        }

        let mut first_error = None;
        for service in &self.services {
            if let Err(source) = guarded(service.as_ref(), "init", || service.init()) {
                warn!(service = service.name(), error = %source, "tracking service init failed");
                first_error.get_or_insert(GleansterError::ServiceInit {
                    service: service.name().to_string(),
                    source,
                });
            }
        }

        info!(services = self.services.len(), "event tracker initialized");
        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Emit an event on every service, in registration order.
    ///
    /// Failures are logged and never stop delivery to the remaining services.
    pub fn track(&self, event_name: &str, properties: Option<&PropertyMap>) {
        debug!(event = event_name, services = self.services.len(), "tracking event");
        for service in &self.services {
            if let Err(error) = guarded(service.as_ref(), event_name, || {
                service.emit_event(event_name, properties)
            }) {
                warn!(
                    service = service.name(),
                    event = event_name,
                    error = %error,
                    "tracking service failed to emit event"
                );
            }
        }
    }
}

impl std::fmt::Debug for EventTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventTracker")
            .field(
                "services",
                &self.services.iter().map(|s| s.name()).collect::<Vec<_>>(),
            )
            .field("init_complete", &self.is_initialized())
            .finish()
    }
}

/// Run a service call, turning a panic into an error.
fn guarded<F>(service: &dyn TrackingService, action: &str, call: F) -> anyhow::Result<()>
where
    F: FnOnce() -> anyhow::Result<()>,
{
    match panic::catch_unwind(AssertUnwindSafe(call)) {
        Ok(result) => result,
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            Err(anyhow::anyhow!(
                "service `{}` panicked during `{}`: {}",
                service.name(),
                action,
                message
            ))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use gleanster_core::service::capture_service;
    use serde_json::json;
    use std::sync::Mutex;

    /// Records the order in which services see events.
    struct Ordered {
        label: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl TrackingService for Ordered {
        fn name(&self) -> &str {
            self.label
        }

        fn init(&self) -> anyhow::Result<()> {
            self.log.lock().unwrap().push(format!("{}:init", self.label));
            Ok(())
        }

        fn emit_event(
            &self,
            event_name: &str,
            _properties: Option<&PropertyMap>,
        ) -> anyhow::Result<()> {
            self.log.lock().unwrap().push(format!("{}:{}", self.label, event_name));
            Ok(())
        }
    }

    struct Failing {
        panic: bool,
    }

    impl TrackingService for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn init(&self) -> anyhow::Result<()> {
            anyhow::bail!("no api key")
        }

        fn emit_event(
            &self,
            _event_name: &str,
            _properties: Option<&PropertyMap>,
        ) -> anyhow::Result<()> {
            if self.panic {
                panic!("backend exploded");
            }
            anyhow::bail!("backend unavailable")
        }
    }

    #[test]
    fn test_track_fans_out_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let a = Arc::new(Ordered {
            label: "a",
            log: log.clone(),
        });
        let b = Arc::new(Ordered {
            label: "b",
            log: log.clone(),
        });
        let tracker = EventTracker::new(Vec::new())
            .with_service(a.clone())
            .with_service(b)
            .with_service(a);

        tracker.track("click", None);
        assert_eq!(*log.lock().unwrap(), vec!["a:click", "b:click", "a:click"]);
    }

    #[test]
    fn test_track_forwards_properties() {
        let capture = capture_service();
        let tracker = EventTracker::new(Vec::new()).with_service(capture.clone());

        let mut props = PropertyMap::new();
        props.insert("type".into(), json!("global"));
        tracker.track("nav-event", Some(&props));
        tracker.track("bare", None);

        let events = capture.events();
        assert_eq!(events[0].name, "nav-event");
        assert_eq!(events[0].properties, Some(props));
        assert_eq!(events[1].properties, None);
    }

    #[test]
    fn test_init_client_runs_once() {
        let capture = capture_service();
        let tracker = EventTracker::new(Vec::new()).with_service(capture.clone());
        assert!(!tracker.is_initialized());

        for _ in 0..5 {
            tracker.init_client().unwrap();
        }

        assert!(tracker.is_initialized());
        assert_eq!(capture.init_calls(), 1);
    }

    #[test]
    fn test_init_failure_propagates_but_reaches_all_services() {
        let capture = capture_service();
        let tracker = EventTracker::new(Vec::new())
            .with_service(Arc::new(Failing { panic: false }))
            .with_service(capture.clone());

        let err = tracker.init_client().unwrap_err();
        assert!(matches!(
            err,
            GleansterError::ServiceInit { ref service, .. } if service == "failing"
        ));
        assert_eq!(capture.init_calls(), 1);

        // The flag gates retry, not success.
        assert!(tracker.is_initialized());
        assert!(tracker.init_client().is_ok());
        assert_eq!(capture.init_calls(), 1);
    }

    #[test]
    fn test_failing_service_does_not_block_others() {
        let capture = capture_service();
        let tracker = EventTracker::new(Vec::new())
            .with_service(Arc::new(Failing { panic: false }))
            .with_service(Arc::new(Failing { panic: true }))
            .with_service(capture.clone());

        tracker.track("button-clicked", None);
        tracker.track("button-clicked", None);
        assert_eq!(capture.count_named("button-clicked"), 2);
    }

    #[test]
    fn test_with_service_appends() {
        let tracker = EventTracker::new(Vec::new());
        assert!(tracker.is_empty());
        let tracker = tracker.with_service(capture_service()).with_service(capture_service());
        assert_eq!(tracker.len(), 2);
        assert!(format!("{tracker:?}").contains("capture"));
    }
}
