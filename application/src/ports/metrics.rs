//! Metrics port
//!
//! Append-only recording of pipeline timings. The recorder is passed to the
//! use cases that need it, never reached through global state.

use std::time::Duration;
use triage_domain::{Stage, TicketId};

pub trait MetricsRecorder: Send + Sync {
    fn record_ticket_processing(&self, ticket_id: &TicketId, duration: Duration, success: bool);

    fn record_stage_call(&self, stage: Stage, success: bool, duration: Duration);
}

/// Recorder that discards everything
pub struct NoMetrics;

impl MetricsRecorder for NoMetrics {
    fn record_ticket_processing(&self, _ticket_id: &TicketId, _duration: Duration, _success: bool) {}
    fn record_stage_call(&self, _stage: Stage, _success: bool, _duration: Duration) {}
}
