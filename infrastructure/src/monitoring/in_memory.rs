//! Append-only in-memory metrics log.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Mutex;
use std::time::Duration;
use triage_application::MetricsRecorder;
use triage_domain::{Stage, TicketId};

/// One recorded measurement.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MetricEvent {
    TicketProcessed {
        ticket_id: TicketId,
        duration_ms: u64,
        success: bool,
        at: DateTime<Utc>,
    },
    StageCall {
        stage: Stage,
        duration_ms: u64,
        success: bool,
        at: DateTime<Utc>,
    },
}

/// Aggregate view over the recorded events.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricsSummary {
    pub tickets_processed: usize,
    pub tickets_failed: usize,
    /// `(calls, failures)` per stage
    pub stage_calls: BTreeMap<Stage, (usize, usize)>,
    pub mean_ticket_ms: Option<u64>,
}

/// [`MetricsRecorder`] that keeps every event in memory.
#[derive(Debug, Default)]
pub struct InMemoryMetrics {
    events: Mutex<Vec<MetricEvent>>,
}

impl InMemoryMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Vec<MetricEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn summary(&self) -> MetricsSummary {
        let mut summary = MetricsSummary::default();
        let mut total_ms = 0u64;

        for event in self.snapshot() {
            match event {
                MetricEvent::TicketProcessed {
                    duration_ms,
                    success,
                    ..
                } => {
                    summary.tickets_processed += 1;
                    if !success {
                        summary.tickets_failed += 1;
                    }
                    total_ms += duration_ms;
                }
                MetricEvent::StageCall { stage, success, .. } => {
                    let entry = summary.stage_calls.entry(stage).or_default();
                    entry.0 += 1;
                    if !success {
                        entry.1 += 1;
                    }
                }
            }
        }

        if summary.tickets_processed > 0 {
            summary.mean_ticket_ms = Some(total_ms / summary.tickets_processed as u64);
        }
        summary
    }

    fn push(&self, event: MetricEvent) {
        // A poisoned log only loses measurements
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl MetricsRecorder for InMemoryMetrics {
    fn record_ticket_processing(&self, ticket_id: &TicketId, duration: Duration, success: bool) {
        self.push(MetricEvent::TicketProcessed {
            ticket_id: ticket_id.clone(),
            duration_ms: duration.as_millis() as u64,
            success,
            at: Utc::now(),
        });
    }

    fn record_stage_call(&self, stage: Stage, success: bool, duration: Duration) {
        self.push(MetricEvent::StageCall {
            stage,
            duration_ms: duration.as_millis() as u64,
            success,
            at: Utc::now(),
        });
    }
}
