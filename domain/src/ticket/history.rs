//! Append-only stage history and customer-facing messages.

use super::entities::TicketId;
use crate::analysis::pipeline::{PipelineResults, StageOutput};
use crate::ticket::workflow::Stage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One stored stage result. Records are never updated; a re-run appends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageRecord {
    pub ticket_id: TicketId,
    pub output: StageOutput,
    pub created_at: DateTime<Utc>,
}

impl StageRecord {
    pub fn new(ticket_id: TicketId, output: StageOutput, created_at: DateTime<Utc>) -> Self {
        Self {
            ticket_id,
            output,
            created_at,
        }
    }

    pub fn stage(&self) -> Stage {
        self.output.stage()
    }
}

/// Fold a ticket's history into its latest results; the most recent record
/// of each stage wins.
pub fn latest_results<'a>(records: impl IntoIterator<Item = &'a StageRecord>) -> PipelineResults {
    let mut sorted: Vec<&StageRecord> = records.into_iter().collect();
    sorted.sort_by_key(|r| r.created_at);

    let mut results = PipelineResults::new();
    for record in sorted {
        results.record(record.output.clone());
    }
    results
}

/// Message queued for the customer after an auto-resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerMessage {
    pub ticket_id: TicketId,
    pub customer_id: String,
    pub subject: String,
    pub body: String,
}

impl CustomerMessage {
    pub const DEFAULT_BODY: &'static str = "Your issue has been resolved.";

    pub fn resolution(
        ticket_id: TicketId,
        customer_id: impl Into<String>,
        ticket_subject: &str,
        solution: Option<&str>,
    ) -> Self {
        Self {
            ticket_id,
            customer_id: customer_id.into(),
            subject: format!("Re: {}", ticket_subject),
            body: solution
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(Self::DEFAULT_BODY)
                .to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::classification::ClassificationResult;
    use chrono::Duration;

    #[test]
    fn test_latest_record_wins() {
        let id = TicketId::new("t-1");
        let now = Utc::now();
        let older = StageRecord::new(
            id.clone(),
            StageOutput::Classification(ClassificationResult::new("BILLING", 0.6)),
            now - Duration::minutes(5),
        );
        let newer = StageRecord::new(
            id,
            StageOutput::Classification(ClassificationResult::new("ACCOUNT", 0.9)),
            now,
        );

        // Insertion order must not matter.
        let results = latest_results([&newer, &older]);
        assert_eq!(results.classification.unwrap().category, "ACCOUNT");
        assert!(results.decision.is_none());
    }

    #[test]
    fn test_resolution_message_body() {
        let msg = CustomerMessage::resolution(TicketId::new("t-1"), "c-1", "Login", Some("Reset it"));
        assert_eq!(msg.subject, "Re: Login");
        assert_eq!(msg.body, "Reset it");

        let msg = CustomerMessage::resolution(TicketId::new("t-1"), "c-1", "Login", None);
        assert_eq!(msg.body, CustomerMessage::DEFAULT_BODY);
    }
}
