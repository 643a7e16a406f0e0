//! Pipeline parameters - use case behaviour control.
//!
//! [`PipelineParams`] groups the static parameters that control ticket
//! processing: retry behaviour, knowledge retrieval depth, sampling
//! temperatures and the health probe bound. These are application-layer
//! concerns, not domain policy.

use std::time::Duration;
use triage_domain::{DECISION_TEMPERATURE, RetryPolicy, SOLUTION_TEMPERATURE};

/// Ticket processing parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineParams {
    /// Retry policy applied to every stage invocation.
    pub retry: RetryPolicy,
    /// Number of similar cases retrieved by the knowledge stage.
    pub top_k: usize,
    /// Sampling temperature for decision arbitration.
    pub decision_temperature: f64,
    /// Sampling temperature for solution adaptation.
    pub solution_temperature: f64,
    /// Upper bound for each stage health probe.
    pub health_timeout: Duration,
}

impl Default for PipelineParams {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            top_k: 5,
            decision_temperature: DECISION_TEMPERATURE,
            solution_temperature: SOLUTION_TEMPERATURE,
            health_timeout: Duration::from_secs(5),
        }
    }
}

impl PipelineParams {
    // ==================== Builder Methods ====================

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_temperatures(mut self, decision: f64, solution: f64) -> Self {
        self.decision_temperature = decision;
        self.solution_temperature = solution;
        self
    }

    pub fn with_health_timeout(mut self, timeout: Duration) -> Self {
        self.health_timeout = timeout;
        self
    }
}
