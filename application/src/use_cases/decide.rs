//! Decide use case
//!
//! Ordered deterministic override rules first; model-assisted arbitration
//! only when none of them matches. Arbitration has no internal fallback:
//! a gateway failure or unparseable output fails the decision.

use crate::ports::llm_gateway::{GatewayError, LlmGateway};
use crate::ports::stage_client::StageError;
use crate::use_cases::shared::check_required;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};
use triage_domain::{
    DecisionInputs, DecisionResult, DomainError, PromptTemplate, Stage, apply_override_rules,
    from_value, heuristic_recommendation,
};

/// Errors that can occur while deciding
#[derive(Error, Debug)]
pub enum DecideError {
    #[error("Arbitration failed: {0}")]
    Arbitration(#[from] GatewayError),

    #[error("Arbitration returned unusable output: {0}")]
    Malformed(#[from] DomainError),
}

impl From<DecideError> for StageError {
    fn from(e: DecideError) -> Self {
        match e {
            DecideError::Arbitration(g) => StageError::new(Stage::Decision, g.kind(), g.to_string()),
            DecideError::Malformed(d) => StageError::from_domain(Stage::Decision, d),
        }
    }
}

/// Use case for the final auto-resolve / escalate decision
pub struct DecideUseCase {
    gateway: Arc<dyn LlmGateway>,
    temperature: f64,
}

impl DecideUseCase {
    pub fn new(gateway: Arc<dyn LlmGateway>, temperature: f64) -> Self {
        Self {
            gateway,
            temperature,
        }
    }

    pub async fn execute(&self, inputs: DecisionInputs<'_>) -> Result<DecisionResult, DecideError> {
        if let Some((rule, decision)) = apply_override_rules(&inputs) {
            info!(
                "Override rule {} matched: {}",
                rule.as_str(),
                decision.decision
            );
            return Ok(decision);
        }

        debug!(
            "No override matched; heuristic suggests {}",
            heuristic_recommendation(
                inputs.knowledge.confidence_or_zero(),
                inputs.sentiment.score
            )
        );

        let prompt = PromptTemplate::decision_prompt(&inputs);
        let schema = PromptTemplate::decision_schema();
        let value = self
            .gateway
            .generate_structured(&prompt, &schema, self.temperature)
            .await?;
        check_required(&value, &schema)?;
        let decision: DecisionResult = from_value(value)?;

        info!("Arbitration decided {}", decision.decision);
        Ok(decision)
    }
}
