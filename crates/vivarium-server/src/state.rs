//! Shared application state for the API server.
//!
//! [`AppState`] bundles the immutable rule table, the standard sampling
//! intervals, the engine handle, and the request deadline. It is built
//! once at startup and injected into handlers via Axum's `State`
//! extractor; everything inside is read-only after construction, so no
//! locking is needed.

use std::sync::Arc;
use std::time::Duration;

use vivarium_core::SimulationEngine;
use vivarium_rules::{IntervalMap, RuleSet, standard_intervals};

/// Default whole-request deadline for simulation work.
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Shared state for the Axum application.
#[derive(Clone)]
pub struct AppState {
    /// The immutable parameter rule table.
    pub rules: Arc<RuleSet>,
    /// Sampling intervals used by the random endpoints.
    pub intervals: Arc<IntervalMap>,
    /// The simulation engine collaborator.
    pub engine: Arc<dyn SimulationEngine>,
    /// Whole-request deadline for engine and batch work.
    pub request_timeout: Duration,
}

impl AppState {
    /// Create application state around an engine, with the standard
    /// rule table, standard intervals, and the default deadline.
    pub fn new(engine: Arc<dyn SimulationEngine>) -> Self {
        Self {
            rules: Arc::new(RuleSet::standard()),
            intervals: Arc::new(standard_intervals()),
            engine,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Replace the request deadline.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}
