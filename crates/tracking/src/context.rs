//! Tracking context — exposes the active [`EventTracker`] to every component
//! rendered beneath a [`TrackingProvider`], and initializes the tracker when
//! the provider first mounts.
//!
//! Resolution is per-thread: providers push their tracker onto a thread-local
//! stack for the duration of their render, so the innermost provider wins.

use std::cell::{Cell, RefCell};
use std::sync::Arc;

use gleanster_core::GleansterResult;
use tracing::debug;

use crate::dispatcher::EventTracker;

thread_local! {
    static ACTIVE_TRACKERS: RefCell<Vec<Arc<EventTracker>>> = const { RefCell::new(Vec::new()) };
}

/// Installs an [`EventTracker`] for everything rendered inside it.
pub struct TrackingProvider {
    event_tracker: Arc<EventTracker>,
    mounted: Cell<bool>,
}

impl TrackingProvider {
    pub fn new(event_tracker: Arc<EventTracker>) -> Self {
        Self {
            event_tracker,
            mounted: Cell::new(false),
        }
    }

    pub fn event_tracker(&self) -> &Arc<EventTracker> {
        &self.event_tracker
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.get()
    }

    /// Render `children` with this provider's tracker in scope.
    ///
    /// The first render mounts the provider and calls
    /// [`EventTracker::init_client`]; an init failure is returned after the
    /// children have rendered.
    pub fn render<R>(&self, children: impl FnOnce() -> R) -> GleansterResult<R> {
        let output = {
            let _scope = ScopeGuard::enter(self.event_tracker.clone());
            children()
        };

        if !self.mounted.replace(true) {
            debug!("tracking provider mounted");
            self.event_tracker.init_client()?;
        }

        Ok(output)
    }
}

/// Returns the tracker from the innermost enclosing [`TrackingProvider`], or
/// `None` outside of any provider.
pub fn use_tracking() -> Option<Arc<EventTracker>> {
    ACTIVE_TRACKERS.with(|stack| stack.borrow().last().cloned())
}

/// Pops the scope on drop, including during unwinding.
struct ScopeGuard;

impl ScopeGuard {
    fn enter(event_tracker: Arc<EventTracker>) -> Self {
        ACTIVE_TRACKERS.with(|stack| stack.borrow_mut().push(event_tracker));
        ScopeGuard
    }
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        ACTIVE_TRACKERS.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}
