//! Shared application state.
//!
//! Owns the metrics registry and the outcome source. Both are injected so
//! tests can build isolated registries and force either branch.

use std::sync::Arc;

use flakyhello_core::outcome::{OutcomeSource, RandomOutcome};

use crate::obs::metrics::HttpMetrics;

#[derive(Clone)]
pub struct AppState {
    metrics: Arc<HttpMetrics>,
    outcomes: Arc<dyn OutcomeSource>,
}

impl AppState {
    /// Production state: fresh registry, uniform random outcomes.
    pub fn new() -> Self {
        Self::with_outcome_source(Arc::new(RandomOutcome::new()))
    }

    /// Fresh registry, caller-chosen outcomes.
    pub fn with_outcome_source(outcomes: Arc<dyn OutcomeSource>) -> Self {
        Self::with_parts(Arc::new(HttpMetrics::new()), outcomes)
    }

    pub fn with_parts(metrics: Arc<HttpMetrics>, outcomes: Arc<dyn OutcomeSource>) -> Self {
        Self { metrics, outcomes }
    }

    pub fn metrics(&self) -> Arc<HttpMetrics> {
        Arc::clone(&self.metrics)
    }

    pub fn outcomes(&self) -> &dyn OutcomeSource {
        self.outcomes.as_ref()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
