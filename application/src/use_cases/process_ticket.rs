//! Process Ticket use case
//!
//! Orchestrates one ticket through the pipeline. Stage order comes from the
//! [`WorkflowState`] transition table: starting at `NEW`, each state entered
//! names the stage to run. Every stage call is wrapped in the retry policy;
//! persistence and notifications are best effort and never abort a run.

use crate::ports::metrics::MetricsRecorder;
use crate::ports::notifier::{CustomerMessenger, EscalationNotifier};
use crate::ports::progress::{NoProgress, PipelineProgress};
use crate::ports::stage_client::{StageError, StageRequest};
use crate::ports::ticket_repository::TicketRepository;
use crate::retry::retry_with_backoff_observed;
use crate::use_cases::shared::best_effort;
use crate::use_cases::stages::StageRegistry;
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{error, info, warn};
use triage_domain::{
    CustomerMessage, DecisionKind, DomainError, EscalationContext, NewTicket, PipelineResults,
    ProcessingResult, RetryPolicy, Stage, StageOutput, StageRecord, TicketId, WorkflowBundle,
    WorkflowState,
};
use uuid::Uuid;

/// Errors that can occur while processing a ticket
#[derive(Error, Debug)]
pub enum ProcessTicketError {
    #[error("Invalid ticket: {0}")]
    InvalidInput(#[source] DomainError),

    #[error("No client registered for the {0} stage")]
    MissingStage(Stage),

    #[error("Ticket {ticket_id} failed at the {stage} stage: {source}")]
    Stage {
        ticket_id: TicketId,
        stage: Stage,
        #[source]
        source: StageError,
    },

    #[error("Pipeline finished without a complete result: {0}")]
    Incomplete(#[source] DomainError),
}

impl ProcessTicketError {
    /// The stage that aborted the run, if any.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            ProcessTicketError::Stage { stage, .. } => Some(*stage),
            ProcessTicketError::MissingStage(stage) => Some(*stage),
            _ => None,
        }
    }
}

/// Input for the ProcessTicket use case
#[derive(Debug, Clone)]
pub struct ProcessTicketInput {
    pub customer_id: String,
    pub subject: String,
    pub body: String,
}

impl ProcessTicketInput {
    pub fn new(
        customer_id: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            customer_id: customer_id.into(),
            subject: subject.into(),
            body: body.into(),
        }
    }
}

/// Use case for processing a ticket end to end
pub struct ProcessTicketUseCase {
    stages: StageRegistry,
    repository: Arc<dyn TicketRepository>,
    notifier: Arc<dyn EscalationNotifier>,
    messenger: Arc<dyn CustomerMessenger>,
    metrics: Arc<dyn MetricsRecorder>,
    retry: RetryPolicy,
}

impl ProcessTicketUseCase {
    pub fn new(
        stages: StageRegistry,
        repository: Arc<dyn TicketRepository>,
        notifier: Arc<dyn EscalationNotifier>,
        messenger: Arc<dyn CustomerMessenger>,
        metrics: Arc<dyn MetricsRecorder>,
    ) -> Self {
        Self {
            stages,
            repository,
            notifier,
            messenger,
            metrics,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(
        &self,
        input: ProcessTicketInput,
    ) -> Result<ProcessingResult, ProcessTicketError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: ProcessTicketInput,
        progress: &dyn PipelineProgress,
    ) -> Result<ProcessingResult, ProcessTicketError> {
        let started = Instant::now();
        let submission = NewTicket::new(input.customer_id, input.subject, input.body)
            .map_err(ProcessTicketError::InvalidInput)?;

        if let Some(stage) = self.stages.missing().first() {
            return Err(ProcessTicketError::MissingStage(*stage));
        }

        let ticket_id = self.create_ticket(&submission).await;
        progress.on_ticket_created(&ticket_id);
        info!("Processing ticket {}", ticket_id);

        let text = submission.text();
        let mut results = PipelineResults::new();
        let mut state = WorkflowState::initial();

        while let Some(next) = state.next() {
            let Some(stage) = next.stage() else {
                break;
            };

            match self
                .run_stage(stage, &ticket_id, &text, &results, progress)
                .await
            {
                Ok(output) => {
                    results.record(output.clone());
                    best_effort(
                        "storing stage result",
                        self.repository
                            .append_result(StageRecord::new(ticket_id.clone(), output, Utc::now()))
                            .await,
                    );
                    best_effort(
                        "updating ticket status",
                        self.repository.update_status(&ticket_id, next).await,
                    );
                }
                Err(source) => {
                    return Err(self.fail(ticket_id, stage, source, started).await);
                }
            }
            state = next;
        }

        let workflow = results.complete().map_err(ProcessTicketError::Incomplete)?;
        self.dispatch(&ticket_id, &submission, &workflow).await;

        self.metrics
            .record_ticket_processing(&ticket_id, started.elapsed(), true);
        let result = ProcessingResult::new(ticket_id, workflow);
        progress.on_outcome(&result);
        Ok(result)
    }

    /// Persist the ticket, or mint a temporary identity if the store is down.
    async fn create_ticket(&self, submission: &NewTicket) -> TicketId {
        match self.repository.create(submission.clone()).await {
            Ok(ticket) => ticket.id,
            Err(e) => {
                let id = TicketId::temporary(&Uuid::new_v4().simple().to_string());
                warn!("Datastore unavailable, using temporary ticket ID {}: {}", id, e);
                id
            }
        }
    }

    async fn run_stage(
        &self,
        stage: Stage,
        ticket_id: &TicketId,
        text: &str,
        results: &PipelineResults,
        progress: &dyn PipelineProgress,
    ) -> Result<StageOutput, StageError> {
        let client = self
            .stages
            .get(stage)
            .ok_or_else(|| StageError::permanent(stage, "no client registered"))?;

        info!("Starting {} stage for ticket {}", stage, ticket_id);
        progress.on_stage_start(stage);
        let call_started = Instant::now();

        let request = StageRequest::new(ticket_id.clone(), text, results.clone());
        let outcome = retry_with_backoff_observed(
            &self.retry,
            stage.as_str(),
            |attempt, e: &StageError, delay| progress.on_retry(stage, attempt, delay, &e.to_string()),
            || client.invoke(&request),
        )
        .await
        .and_then(|output| {
            if output.stage() == stage {
                Ok(output)
            } else {
                Err(StageError::permanent(
                    stage,
                    format!("client returned a {} result", output.stage()),
                ))
            }
        });

        let success = outcome.is_ok();
        self.metrics
            .record_stage_call(stage, success, call_started.elapsed());
        progress.on_stage_complete(stage, success);
        outcome
    }

    /// Reset the ticket and classify the failure by stage.
    async fn fail(
        &self,
        ticket_id: TicketId,
        stage: Stage,
        source: StageError,
        started: Instant,
    ) -> ProcessTicketError {
        error!("Ticket {} processing failed at {}: {}", ticket_id, stage, source);
        best_effort(
            "resetting ticket status",
            self.repository
                .update_status(&ticket_id, WorkflowState::Error.persisted())
                .await,
        );
        self.metrics
            .record_ticket_processing(&ticket_id, started.elapsed(), false);
        ProcessTicketError::Stage {
            ticket_id,
            stage,
            source,
        }
    }

    /// Exactly one terminal side effect per run.
    async fn dispatch(&self, ticket_id: &TicketId, submission: &NewTicket, workflow: &WorkflowBundle) {
        let decision = &workflow.decision;
        best_effort(
            "updating ticket priority",
            self.repository.update_priority(ticket_id, decision.priority).await,
        );

        if decision.decision == DecisionKind::AutoResolve {
            best_effort(
                "marking ticket resolved",
                self.repository
                    .update_status(ticket_id, WorkflowState::Resolved)
                    .await,
            );
            let message = CustomerMessage::resolution(
                ticket_id.clone(),
                submission.customer_id.clone(),
                &submission.subject,
                workflow.knowledge.solution.as_deref(),
            );
            best_effort("queueing customer message", self.messenger.send(message).await);
            info!("Ticket {} auto-resolved", ticket_id);
        } else {
            best_effort(
                "marking ticket escalated",
                self.repository
                    .update_status(ticket_id, WorkflowState::Escalated)
                    .await,
            );
            let context = EscalationContext::build(ticket_id, workflow);
            best_effort(
                "sending escalation notification",
                self.notifier.notify(&context).await,
            );
            info!(
                "Ticket {} escalated ({}, priority {})",
                ticket_id, decision.decision, decision.priority
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::stage_client::ErrorKind;
    use crate::use_cases::test_support::*;
    use std::collections::HashSet;
    use std::time::Duration;
    use triage_domain::{
        ClassificationResult, DecisionResult, KnowledgeResult, Priority, SentimentLevel,
        SentimentResult,
    };

    struct Harness {
        classification: Arc<MockStage>,
        knowledge: Arc<MockStage>,
        sentiment: Arc<MockStage>,
        decision: Arc<MockStage>,
        repository: Arc<MockRepository>,
        notifier: Arc<MockNotifier>,
        messenger: Arc<MockMessenger>,
        metrics: Arc<RecordingMetrics>,
    }

    impl Harness {
        fn new(decision: DecisionResult) -> Self {
            Self {
                classification: Arc::new(MockStage::new(
                    Stage::Classification,
                    vec![Ok(StageOutput::Classification(
                        ClassificationResult::new("BILLING", 0.9).with_subcategory("REFUND"),
                    ))],
                )),
                knowledge: Arc::new(MockStage::new(
                    Stage::Knowledge,
                    vec![Ok(StageOutput::Knowledge(KnowledgeResult {
                        solution: Some("Refund the duplicate charge".to_string()),
                        confidence: Some(0.9),
                        solvable_without_escalation: true,
                        ..KnowledgeResult::no_matches()
                    }))],
                )),
                sentiment: Arc::new(MockStage::new(
                    Stage::Sentiment,
                    vec![Ok(StageOutput::Sentiment(SentimentResult::new(
                        0.2,
                        SentimentLevel::Calm,
                    )))],
                )),
                decision: Arc::new(MockStage::new(
                    Stage::Decision,
                    vec![Ok(StageOutput::Decision(decision))],
                )),
                repository: Arc::new(MockRepository::new()),
                notifier: Arc::new(MockNotifier::new()),
                messenger: Arc::new(MockMessenger::new()),
                metrics: Arc::new(RecordingMetrics::default()),
            }
        }

        fn use_case(&self) -> ProcessTicketUseCase {
            let stages = StageRegistry::new()
                .register(self.classification.clone())
                .register(self.knowledge.clone())
                .register(self.sentiment.clone())
                .register(self.decision.clone());
            ProcessTicketUseCase::new(
                stages,
                self.repository.clone(),
                self.notifier.clone(),
                self.messenger.clone(),
                self.metrics.clone(),
            )
            .with_retry_policy(RetryPolicy::new(3, Duration::from_secs(1), 2.0))
        }
    }

    fn auto_resolve() -> DecisionResult {
        DecisionResult::new(DecisionKind::AutoResolve, 0.9, Priority::Low).with_sla(60)
    }

    fn input() -> ProcessTicketInput {
        ProcessTicketInput::new("cust-1", "Charged twice", "I was billed twice for March")
    }

    #[tokio::test]
    async fn test_auto_resolve_run() {
        let h = Harness::new(auto_resolve());
        let progress = RecordingProgress::default();

        let result = h
            .use_case()
            .execute_with_progress(input(), &progress)
            .await
            .unwrap();

        assert_eq!(result.decision, DecisionKind::AutoResolve);
        assert!(!result.escalated);
        assert_eq!(result.solution.as_deref(), Some("Refund the duplicate charge"));
        assert_eq!(result.workflow.classification.category, "BILLING");

        let statuses = h.repository.statuses(&result.ticket_id);
        assert_eq!(
            statuses,
            vec![
                WorkflowState::Routing,
                WorkflowState::KnowledgeSearch,
                WorkflowState::SentimentAnalysis,
                WorkflowState::Decision,
                WorkflowState::Resolved,
            ]
        );
        assert_eq!(h.repository.records(&result.ticket_id), 4);

        let sent = h.messenger.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].body, "Refund the duplicate charge");
        assert!(h.notifier.sent.lock().unwrap().is_empty());

        assert_eq!(
            *progress.started.lock().unwrap(),
            vec![
                Stage::Classification,
                Stage::Knowledge,
                Stage::Sentiment,
                Stage::Decision
            ]
        );
        assert_eq!(h.metrics.tickets.lock().unwrap()[0].1, true);
    }

    #[tokio::test]
    async fn test_stages_see_prior_results() {
        let h = Harness::new(auto_resolve());
        h.use_case().execute(input()).await.unwrap();

        let knowledge_requests = h.knowledge.requests.lock().unwrap();
        assert_eq!(knowledge_requests[0].category.as_deref(), Some("BILLING"));
        assert_eq!(
            knowledge_requests[0].text,
            "Charged twice\n\nI was billed twice for March"
        );

        let decision_requests = h.decision.requests.lock().unwrap();
        assert!(decision_requests[0].prior.decision_inputs().is_ok());
    }

    #[tokio::test]
    async fn test_escalation_notifies_with_context() {
        let decision = DecisionResult::new(DecisionKind::EscalateToManager, 0.9, Priority::Urgent)
            .with_reasoning("Churn risk")
            .with_sla(2);
        let h = Harness::new(decision);

        let result = h.use_case().execute(input()).await.unwrap();

        assert!(result.escalated);
        assert_eq!(result.solution, None);
        assert_eq!(
            h.repository.statuses(&result.ticket_id).last(),
            Some(&WorkflowState::Escalated)
        );
        assert_eq!(h.repository.priority(&result.ticket_id), Some(Priority::Urgent));

        let sent = h.notifier.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].priority, Priority::Urgent);
        assert_eq!(sent[0].sla_minutes, 2);
        assert_eq!(sent[0].issue_summary, "BILLING - REFUND");
        assert!(h.messenger.sent.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_failure_is_retried() {
        let h = Harness::new(auto_resolve());
        h.sentiment.push_front(Err(StageError::transient(Stage::Sentiment, "503")));
        let progress = RecordingProgress::default();

        let result = h
            .use_case()
            .execute_with_progress(input(), &progress)
            .await
            .unwrap();

        assert_eq!(result.decision, DecisionKind::AutoResolve);
        assert_eq!(h.sentiment.requests.lock().unwrap().len(), 2);
        assert_eq!(
            *progress.retries.lock().unwrap(),
            vec![(Stage::Sentiment, 1)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_stage_fails_run_and_resets_status() {
        let h = Harness::new(auto_resolve());
        for _ in 0..3 {
            h.knowledge
                .push_front(Err(StageError::transient(Stage::Knowledge, "timeout")));
        }

        let err = h.use_case().execute(input()).await.unwrap_err();

        assert_eq!(err.stage(), Some(Stage::Knowledge));
        match &err {
            ProcessTicketError::Stage { source, ticket_id, .. } => {
                assert_eq!(source.kind, ErrorKind::Transient);
                assert_eq!(
                    h.repository.statuses(ticket_id),
                    vec![WorkflowState::Routing, WorkflowState::New]
                );
            }
            other => panic!("unexpected error {:?}", other),
        }
        // Sentiment and decision never ran.
        assert!(h.sentiment.requests.lock().unwrap().is_empty());
        assert!(h.decision.requests.lock().unwrap().is_empty());
        assert!(h.notifier.sent.lock().unwrap().is_empty());
        assert_eq!(h.metrics.tickets.lock().unwrap()[0].1, false);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_runs_on_one_use_case() {
        const RUNS: usize = 5;
        let latency = Duration::from_millis(100);
        let h = Harness::new(auto_resolve());
        for stage in [&h.classification, &h.knowledge, &h.sentiment, &h.decision] {
            stage.repeat_next(RUNS - 1);
            stage.set_latency(latency);
        }
        let uc = h.use_case();
        let started = tokio::time::Instant::now();

        let results = futures::future::join_all((0..RUNS).map(|i| {
            uc.execute(ProcessTicketInput::new(
                format!("cust-{}", i),
                "Charged twice",
                "I was billed twice for March",
            ))
        }))
        .await;

        // Runs overlap: one run's worth of stage latency, not RUNS of them.
        assert!(started.elapsed() < latency * 4 * 2);

        let ids: HashSet<TicketId> = results
            .into_iter()
            .map(|r| r.unwrap().ticket_id)
            .collect();
        assert_eq!(ids.len(), RUNS);
        for id in &ids {
            assert_eq!(h.repository.records(id), 4);
            assert_eq!(
                h.repository.statuses(id).last(),
                Some(&WorkflowState::Resolved)
            );
        }
        assert_eq!(h.repository.total_records(), 4 * RUNS);

        let tickets = h.metrics.tickets.lock().unwrap();
        assert_eq!(tickets.len(), RUNS);
        assert!(tickets.iter().all(|(_, success)| *success));
        assert_eq!(h.metrics.stages.lock().unwrap().len(), 4 * RUNS);
        assert_eq!(h.messenger.sent.lock().unwrap().len(), RUNS);
    }

    #[tokio::test]
    async fn test_permanent_failure_is_not_retried() {
        let h = Harness::new(auto_resolve());
        h.classification
            .push_front(Err(StageError::permanent(Stage::Classification, "422")));

        let err = h.use_case().execute(input()).await.unwrap_err();

        assert_eq!(err.stage(), Some(Stage::Classification));
        assert_eq!(h.classification.requests.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_datastore_outage_uses_temporary_id() {
        let h = Harness::new(auto_resolve());
        h.repository.set_unavailable(true);

        let result = h.use_case().execute(input()).await.unwrap();

        assert!(result.ticket_id.is_temporary());
        assert_eq!(result.ticket_id.as_str().len(), "TEMP_".len() + 8);
        assert_eq!(result.decision, DecisionKind::AutoResolve);
        // Side effects still dispatched.
        assert_eq!(h.messenger.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_side_effect_failures_are_swallowed() {
        let decision = DecisionResult::new(DecisionKind::EscalateToHuman, 0.7, Priority::Medium);
        let h = Harness::new(decision);
        h.notifier.fail.store(true, std::sync::atomic::Ordering::SeqCst);

        let result = h.use_case().execute(input()).await.unwrap();
        assert!(result.escalated);
    }

    #[tokio::test]
    async fn test_invalid_input_is_rejected_before_any_stage() {
        let h = Harness::new(auto_resolve());
        let err = h
            .use_case()
            .execute(ProcessTicketInput::new("cust-1", "", "body"))
            .await
            .unwrap_err();

        assert!(matches!(err, ProcessTicketError::InvalidInput(_)));
        assert!(h.classification.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_stage_client() {
        let h = Harness::new(auto_resolve());
        let stages = StageRegistry::new().register(h.classification.clone());
        let uc = ProcessTicketUseCase::new(
            stages,
            h.repository.clone(),
            h.notifier.clone(),
            h.messenger.clone(),
            h.metrics.clone(),
        );

        let err = uc.execute(input()).await.unwrap_err();
        assert!(matches!(err, ProcessTicketError::MissingStage(Stage::Knowledge)));
    }

    #[tokio::test]
    async fn test_mismatched_stage_output_is_rejected() {
        let h = Harness::new(auto_resolve());
        h.sentiment.push_front(Ok(StageOutput::Knowledge(KnowledgeResult::no_matches())));

        let err = h.use_case().execute(input()).await.unwrap_err();
        match err {
            ProcessTicketError::Stage { stage, source, .. } => {
                assert_eq!(stage, Stage::Sentiment);
                assert_eq!(source.kind, ErrorKind::Permanent);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }
}
