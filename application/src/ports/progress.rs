//! Progress notification port
//!
//! Defines the interface for reporting progress while a ticket moves
//! through the pipeline.

use std::time::Duration;
use triage_domain::{ProcessingResult, Stage, TicketId};

/// Callback for progress updates during ticket processing
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (console spinner, plain log lines, ...)
pub trait PipelineProgress: Send + Sync {
    /// Called once the ticket has an identity
    fn on_ticket_created(&self, _ticket_id: &TicketId) {}

    /// Called when a stage starts
    fn on_stage_start(&self, stage: Stage);

    /// Called when a stage finishes, after retries
    fn on_stage_complete(&self, stage: Stage, success: bool);

    /// Called before sleeping ahead of another attempt
    fn on_retry(&self, _stage: Stage, _attempt: u32, _delay: Duration, _error: &str) {}

    /// Called after the terminal side effect has been dispatched
    fn on_outcome(&self, _result: &ProcessingResult) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl PipelineProgress for NoProgress {
    fn on_stage_start(&self, _stage: Stage) {}
    fn on_stage_complete(&self, _stage: Stage, _success: bool) {}
}
