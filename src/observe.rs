//! Observer trait for pipeline state transitions.
//!
//! Inject an [`Arc<dyn PipelineObserver>`] via
//! [`crate::config::PipelineConfigBuilder::observer`] to receive every
//! state transition as it happens — the hook a host UI uses to drive its
//! spinner, error banner, and rendered output from one source of truth.
//!
//! # Why callbacks instead of channels?
//!
//! The callback approach is the least-invasive integration point: callers
//! can forward events to a Tokio broadcast channel, a WebSocket, or a
//! terminal spinner without the library knowing anything about how the host
//! application communicates. The trait is `Send + Sync` because a session
//! handle may be driven from spawned tasks.

use crate::state::PipelineState;
use std::sync::Arc;

/// Called by the session on every observable state change.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Observers receive a borrowed snapshot and must not
/// block — the session holds its state lock while notifying.
pub trait PipelineObserver: Send + Sync {
    /// Called after each state transition with the new state.
    fn on_state_change(&self, state: &PipelineState) {
        let _ = state;
    }

    /// Called when an in-flight run's response arrives after the run was
    /// superseded and is discarded without touching the state.
    fn on_run_superseded(&self) {}
}

/// A no-op implementation for callers that don't need transition events.
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}

/// Convenience alias matching the type stored in
/// [`crate::config::PipelineConfig`].
pub type ObserverCallback = Arc<dyn PipelineObserver>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Oas2DocsError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct TrackingObserver {
        changes: AtomicUsize,
        superseded: AtomicUsize,
    }

    impl PipelineObserver for TrackingObserver {
        fn on_state_change(&self, _state: &PipelineState) {
            self.changes.fetch_add(1, Ordering::SeqCst);
        }

        fn on_run_superseded(&self) {
            self.superseded.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_observer_does_not_panic() {
        let obs = NoopObserver;
        obs.on_state_change(&PipelineState::Idle);
        obs.on_state_change(&PipelineState::Failed(Oas2DocsError::NoInputSelected));
        obs.on_run_superseded();
    }

    #[test]
    fn tracking_observer_receives_events() {
        let obs = TrackingObserver {
            changes: AtomicUsize::new(0),
            superseded: AtomicUsize::new(0),
        };

        obs.on_state_change(&PipelineState::Validating);
        obs.on_state_change(&PipelineState::Converting);
        obs.on_run_superseded();

        assert_eq!(obs.changes.load(Ordering::SeqCst), 2);
        assert_eq!(obs.superseded.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn arc_dyn_observer_works() {
        let obs: ObserverCallback = Arc::new(NoopObserver);
        obs.on_state_change(&PipelineState::Idle);
    }
}
