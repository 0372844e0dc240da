//! Deliberation parameters: round loop control.
//!
//! [`DeliberationParams`] groups the static parameters that control the
//! round loop in [`RunDeliberationUseCase`](crate::use_cases::run_deliberation::RunDeliberationUseCase)
//! and the lookups made by
//! [`GatherInformationUseCase`](crate::use_cases::gather_information::GatherInformationUseCase).

use council_domain::DEFAULT_CONVERGENCE_THRESHOLD;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Round loop and lookup parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliberationParams {
    /// Weighted agreement required to converge, within (0, 1].
    pub threshold: f64,
    /// Round budget; the run is exhausted after this many rounds.
    pub max_rounds: usize,
    /// Upper bound on the roster, including recruited personas.
    pub max_personas: usize,
    /// Bound on each persona call.
    pub persona_timeout: Duration,
    /// Bound on each lookup attempt (one search term, one store read).
    pub lookup_timeout: Duration,
    /// Bound on each wait for a human answer; `None` waits forever.
    pub answer_timeout: Option<Duration>,
    /// Search terms tried per codebase request.
    pub max_search_terms: usize,
    /// Hits kept per successful search.
    pub max_hits: usize,
    /// Session summaries scanned per metrics request.
    pub metrics_scan_limit: usize,
    /// Directory searched for codebase requests.
    pub search_scope: String,
}

impl Default for DeliberationParams {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_CONVERGENCE_THRESHOLD,
            max_rounds: 5,
            max_personas: 8,
            persona_timeout: Duration::from_secs(120),
            lookup_timeout: Duration::from_secs(10),
            answer_timeout: Some(Duration::from_secs(300)),
            max_search_terms: 3,
            max_hits: 5,
            metrics_scan_limit: 20,
            search_scope: ".".to_string(),
        }
    }
}

impl DeliberationParams {
    // ==================== Builder Methods ====================

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_max_rounds(mut self, max: usize) -> Self {
        self.max_rounds = max;
        self
    }

    pub fn with_max_personas(mut self, max: usize) -> Self {
        self.max_personas = max;
        self
    }

    pub fn with_persona_timeout(mut self, timeout: Duration) -> Self {
        self.persona_timeout = timeout;
        self
    }

    pub fn with_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = timeout;
        self
    }

    pub fn with_answer_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.answer_timeout = timeout;
        self
    }

    pub fn with_max_hits(mut self, max: usize) -> Self {
        self.max_hits = max;
        self
    }

    pub fn with_search_scope(mut self, scope: impl Into<String>) -> Self {
        self.search_scope = scope.into();
        self
    }
}
