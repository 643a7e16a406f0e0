//! Stage results produced by one pipeline run.
//!
//! Each analysis stage yields one immutable value object:
//! - [`classification::ClassificationResult`] - category assigned by the router
//! - [`knowledge::KnowledgeResult`] - similar historical cases and a proposed solution
//! - [`sentiment::SentimentResult`] - customer mood, urgency and churn signals
//! - [`decision::DecisionResult`] - final auto-resolve / escalate outcome
//!
//! [`pipeline::PipelineResults`] accumulates them in stage order and enforces the
//! data dependency of the decision stage.

pub mod classification;
pub mod decision;
pub mod knowledge;
pub mod pipeline;
pub mod sentiment;
