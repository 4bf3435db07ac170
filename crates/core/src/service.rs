//! Tracking service capability — the contract every analytics backend
//! implements to receive events from the dispatcher.
//!
//! Services are shared as `Arc<dyn TrackingService>`. Backends that perform
//! asynchronous work (network calls, buffering) spawn it themselves and
//! return immediately; nothing upstream awaits them.

use std::sync::{Arc, Mutex};

use crate::types::{PropertyMap, TrackedEvent};

/// Trait for analytics backends that consume emitted events.
pub trait TrackingService: Send + Sync {
    /// Identifier used in logs and error reports.
    fn name(&self) -> &str {
        short_type_name(std::any::type_name::<Self>())
    }

    /// One-time setup hook. Called at most once per dispatcher.
    fn init(&self) -> anyhow::Result<()> {
        Ok(())
    }

    /// Deliver a single event.
    fn emit_event(
        &self,
        event_name: &str,
        properties: Option<&PropertyMap>,
    ) -> anyhow::Result<()>;
}

/// Strip the module path from a fully qualified type name.
pub fn short_type_name(full: &str) -> &str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// No-op service for wiring that doesn't need event emission.
pub struct NoOpService;

impl TrackingService for NoOpService {
    fn name(&self) -> &str {
        "noop"
    }

    fn emit_event(
        &self,
        _event_name: &str,
        _properties: Option<&PropertyMap>,
    ) -> anyhow::Result<()> {
        Ok(())
    }
}

/// In-memory service that captures init calls and events for testing.
#[derive(Default)]
pub struct CaptureService {
    init_calls: Mutex<usize>,
    events: Mutex<Vec<TrackedEvent>>,
}

impl CaptureService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<TrackedEvent> {
        self.events.lock().expect("capture service mutex poisoned").clone()
    }

    pub fn count(&self) -> usize {
        self.events.lock().expect("capture service mutex poisoned").len()
    }

    pub fn count_named(&self, event_name: &str) -> usize {
        self.events
            .lock()
            .expect("capture service mutex poisoned")
            .iter()
            .filter(|e| e.name == event_name)
            .count()
    }

    pub fn init_calls(&self) -> usize {
        *self.init_calls.lock().expect("capture service mutex poisoned")
    }

    pub fn clear(&self) {
        self.events.lock().expect("capture service mutex poisoned").clear();
    }
}

impl TrackingService for CaptureService {
    fn name(&self) -> &str {
        "capture"
    }

    fn init(&self) -> anyhow::Result<()> {
        *self.init_calls.lock().expect("capture service mutex poisoned") += 1;
        Ok(())
    }

    fn emit_event(
        &self,
        event_name: &str,
        properties: Option<&PropertyMap>,
    ) -> anyhow::Result<()> {
        self.events
            .lock()
            .expect("capture service mutex poisoned")
            .push(TrackedEvent::new(event_name, properties.cloned()));
        Ok(())
    }
}

/// Convenience: create a no-op service.
pub fn noop_service() -> Arc<dyn TrackingService> {
    Arc::new(NoOpService)
}

/// Convenience: create a capture service for tests.
pub fn capture_service() -> Arc<CaptureService> {
    Arc::new(CaptureService::new())
}
