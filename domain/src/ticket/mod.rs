//! Ticket aggregate and its lifecycle.
//!
//! - [`entities::Ticket`] - a submitted support ticket
//! - [`workflow::WorkflowState`] - lifecycle states and the transition table
//! - [`workflow::Stage`] - the four analysis stages the table drives
//! - [`history::StageRecord`] - append-only stage results

pub mod entities;
pub mod history;
pub mod workflow;
