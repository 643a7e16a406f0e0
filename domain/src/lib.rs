//! Domain layer for ticket-triage
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Pipeline
//!
//! A ticket passes through four stages in the order given by the
//! [`WorkflowState`] transition table:
//!
//! - **Classification**: category and subcategory
//! - **Knowledge**: similar historical cases and a proposed solution
//! - **Sentiment**: mood, urgency and churn risk
//! - **Decision**: auto-resolve or escalate
//!
//! ## Decision
//!
//! Deterministic [`OverrideRule`]s are evaluated first, in order; only when
//! none matches is the decision delegated to model-assisted arbitration.

pub mod analysis;
pub mod config;
pub mod core;
pub mod decision;
pub mod prompt;
pub mod retry;
pub mod ticket;

// Re-export commonly used types
pub use analysis::{
    classification::{CATEGORY_BUG, CATEGORY_OTHER, ClassificationResult},
    decision::{DecisionKind, DecisionResult},
    knowledge::{KnowledgeResult, SimilarCase, SolutionProposal},
    pipeline::{DecisionInputs, PipelineResults, ProcessingResult, StageOutput, WorkflowBundle},
    sentiment::{SentimentLevel, SentimentResult},
};
pub use config::{ConfigIssue, ConfigIssueCode, OutputFormat, Severity};
pub use core::{
    error::DomainError,
    parsing::{extract_json, from_value},
};
pub use decision::{
    context::{EscalationContext, NotificationBundle},
    rules::{OverrideRule, apply_override_rules, heuristic_recommendation},
};
pub use prompt::{DECISION_TEMPERATURE, PromptTemplate, SOLUTION_TEMPERATURE};
pub use retry::RetryPolicy;
pub use ticket::{
    entities::{NewTicket, Priority, Ticket, TicketId},
    history::{CustomerMessage, StageRecord, latest_results},
    workflow::{Stage, WorkflowState},
};
