//! Per-run accumulation of stage results and the final processing bundle.

use super::classification::ClassificationResult;
use super::decision::{DecisionKind, DecisionResult};
use super::knowledge::KnowledgeResult;
use super::sentiment::SentimentResult;
use crate::core::error::DomainError;
use crate::ticket::entities::TicketId;
use crate::ticket::workflow::Stage;
use serde::{Deserialize, Serialize};

/// Output of a single stage invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "stage", content = "result", rename_all = "snake_case")]
pub enum StageOutput {
    Classification(ClassificationResult),
    Knowledge(KnowledgeResult),
    Sentiment(SentimentResult),
    Decision(DecisionResult),
}

impl StageOutput {
    pub fn stage(&self) -> Stage {
        match self {
            StageOutput::Classification(_) => Stage::Classification,
            StageOutput::Knowledge(_) => Stage::Knowledge,
            StageOutput::Sentiment(_) => Stage::Sentiment,
            StageOutput::Decision(_) => Stage::Decision,
        }
    }
}

/// Borrowed view of everything the decision stage consumes.
#[derive(Debug, Clone, Copy)]
pub struct DecisionInputs<'a> {
    pub classification: &'a ClassificationResult,
    pub knowledge: &'a KnowledgeResult,
    pub sentiment: &'a SentimentResult,
}

/// Stage results of the current run, filled in pipeline order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineResults {
    pub classification: Option<ClassificationResult>,
    pub knowledge: Option<KnowledgeResult>,
    pub sentiment: Option<SentimentResult>,
    pub decision: Option<DecisionResult>,
}

impl PipelineResults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a stage output, replacing any earlier output of the same stage.
    pub fn record(&mut self, output: StageOutput) {
        match output {
            StageOutput::Classification(r) => self.classification = Some(r),
            StageOutput::Knowledge(r) => self.knowledge = Some(r),
            StageOutput::Sentiment(r) => self.sentiment = Some(r),
            StageOutput::Decision(r) => self.decision = Some(r),
        }
    }

    /// Category to filter knowledge search by, once classification has run.
    pub fn category(&self) -> Option<&str> {
        self.classification
            .as_ref()
            .and_then(ClassificationResult::category_filter)
    }

    /// Inputs for the decision stage.
    ///
    /// Fails unless classification, knowledge and sentiment all exist for this run.
    pub fn decision_inputs(&self) -> Result<DecisionInputs<'_>, DomainError> {
        let missing = |what| DomainError::MissingStageInput {
            stage: Stage::Decision.as_str(),
            missing: what,
        };
        Ok(DecisionInputs {
            classification: self
                .classification
                .as_ref()
                .ok_or_else(|| missing(Stage::Classification.as_str()))?,
            knowledge: self
                .knowledge
                .as_ref()
                .ok_or_else(|| missing(Stage::Knowledge.as_str()))?,
            sentiment: self
                .sentiment
                .as_ref()
                .ok_or_else(|| missing(Stage::Sentiment.as_str()))?,
        })
    }

    /// Freeze into a complete bundle once every stage has produced a result.
    pub fn complete(self) -> Result<WorkflowBundle, DomainError> {
        let missing = |what| DomainError::MissingStageInput {
            stage: "outcome",
            missing: what,
        };
        Ok(WorkflowBundle {
            classification: self.classification.ok_or_else(|| missing("classification"))?,
            knowledge: self.knowledge.ok_or_else(|| missing("knowledge"))?,
            sentiment: self.sentiment.ok_or_else(|| missing("sentiment"))?,
            decision: self.decision.ok_or_else(|| missing("decision"))?,
        })
    }
}

/// All four stage results of a finished run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowBundle {
    pub classification: ClassificationResult,
    pub knowledge: KnowledgeResult,
    pub sentiment: SentimentResult,
    pub decision: DecisionResult,
}

/// Result returned to callers of ticket processing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingResult {
    pub ticket_id: TicketId,
    pub decision: DecisionKind,
    pub escalated: bool,
    /// Knowledge-base solution, only present when the ticket was auto-resolved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solution: Option<String>,
    pub workflow: WorkflowBundle,
}

impl ProcessingResult {
    pub fn new(ticket_id: TicketId, workflow: WorkflowBundle) -> Self {
        let decision = workflow.decision.decision;
        let solution = if decision == DecisionKind::AutoResolve {
            workflow.knowledge.solution.clone()
        } else {
            None
        };
        Self {
            ticket_id,
            decision,
            escalated: decision.is_escalation(),
            solution,
            workflow,
        }
    }
}
