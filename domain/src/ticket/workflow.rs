//! Ticket lifecycle states and the transition table.
//!
//! The table is the single source of truth for stage order: the orchestrator
//! starts at [`WorkflowState::New`], repeatedly takes [`WorkflowState::next`]
//! and runs the [`Stage`] named by the state it enters.
//!
//! ```text
//! NEW -> ROUTING -> KNOWLEDGE_SEARCH -> SENTIMENT_ANALYSIS -> DECISION -> (none)
//! RESOLVED, ESCALATED -> (none)
//! ERROR -> NEW
//! ```

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the four sequential analysis steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Classification,
    Knowledge,
    Sentiment,
    Decision,
}

impl Stage {
    /// All stages in pipeline order.
    pub const ALL: [Stage; 4] = [
        Stage::Classification,
        Stage::Knowledge,
        Stage::Sentiment,
        Stage::Decision,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Classification => "classification",
            Stage::Knowledge => "knowledge",
            Stage::Sentiment => "sentiment",
            Stage::Decision => "decision",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Stage::Classification => "Classification",
            Stage::Knowledge => "Knowledge Search",
            Stage::Sentiment => "Sentiment Analysis",
            Stage::Decision => "Decision",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Stage {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "classification" | "router" | "routing" => Ok(Stage::Classification),
            "knowledge" => Ok(Stage::Knowledge),
            "sentiment" => Ok(Stage::Sentiment),
            "decision" => Ok(Stage::Decision),
            other => Err(DomainError::unknown("stage", other)),
        }
    }
}

/// Ticket lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkflowState {
    New,
    Routing,
    KnowledgeSearch,
    SentimentAnalysis,
    Decision,
    Resolved,
    Escalated,
    Error,
}

impl WorkflowState {
    pub fn initial() -> Self {
        WorkflowState::New
    }

    /// Transition table. Total over all states; `None` means no further
    /// pipeline step follows.
    pub fn next(&self) -> Option<WorkflowState> {
        match self {
            WorkflowState::New => Some(WorkflowState::Routing),
            WorkflowState::Routing => Some(WorkflowState::KnowledgeSearch),
            WorkflowState::KnowledgeSearch => Some(WorkflowState::SentimentAnalysis),
            WorkflowState::SentimentAnalysis => Some(WorkflowState::Decision),
            WorkflowState::Decision => None,
            WorkflowState::Resolved | WorkflowState::Escalated => None,
            // Resets to the start of the lifecycle rather than failing terminally.
            WorkflowState::Error => Some(WorkflowState::New),
        }
    }

    /// The stage that runs while the ticket is in this state.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            WorkflowState::Routing => Some(Stage::Classification),
            WorkflowState::KnowledgeSearch => Some(Stage::Knowledge),
            WorkflowState::SentimentAnalysis => Some(Stage::Sentiment),
            WorkflowState::Decision => Some(Stage::Decision),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, WorkflowState::Resolved | WorkflowState::Escalated)
    }

    /// Stages in the order the transition table visits them from `start`.
    pub fn stage_sequence(start: WorkflowState) -> Vec<Stage> {
        let mut stages = Vec::new();
        let mut state = start;
        while let Some(next) = state.next() {
            if let Some(stage) = next.stage() {
                stages.push(stage);
            }
            if next == start {
                break;
            }
            state = next;
        }
        stages
    }

    /// Value written to the ticket record. `ERROR` is not a storable ticket
    /// status and falls back to `NEW`.
    pub fn persisted(&self) -> WorkflowState {
        match self {
            WorkflowState::Error => WorkflowState::New,
            other => *other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowState::New => "NEW",
            WorkflowState::Routing => "ROUTING",
            WorkflowState::KnowledgeSearch => "KNOWLEDGE_SEARCH",
            WorkflowState::SentimentAnalysis => "SENTIMENT_ANALYSIS",
            WorkflowState::Decision => "DECISION",
            WorkflowState::Resolved => "RESOLVED",
            WorkflowState::Escalated => "ESCALATED",
            WorkflowState::Error => "ERROR",
        }
    }
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for WorkflowState {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "NEW" => Ok(WorkflowState::New),
            "ROUTING" => Ok(WorkflowState::Routing),
            "KNOWLEDGE_SEARCH" => Ok(WorkflowState::KnowledgeSearch),
            "SENTIMENT_ANALYSIS" => Ok(WorkflowState::SentimentAnalysis),
            "DECISION" => Ok(WorkflowState::Decision),
            "RESOLVED" => Ok(WorkflowState::Resolved),
            "ESCALATED" => Ok(WorkflowState::Escalated),
            "ERROR" => Ok(WorkflowState::Error),
            other => Err(DomainError::unknown("workflow state", other)),
        }
    }
}
