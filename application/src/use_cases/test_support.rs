//! Hand-written port doubles shared by the use case tests.

use crate::ports::llm_gateway::{GatewayError, LlmGateway};
use crate::ports::metrics::MetricsRecorder;
use crate::ports::notifier::{CustomerMessenger, EscalationNotifier, NotifyError};
use crate::ports::progress::PipelineProgress;
use crate::ports::stage_client::{HealthStatus, StageClient, StageError, StageRequest};
use crate::ports::ticket_repository::{RepositoryError, TicketRepository};
use crate::ports::vector_store::{MetadataFilter, VectorStore, VectorStoreError};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;
use triage_domain::{
    CustomerMessage, EscalationContext, NewTicket, PipelineResults, Priority, SimilarCase, Stage,
    StageOutput, StageRecord, Ticket, TicketId, WorkflowState, latest_results,
};

pub fn billing_case(id: &str, similarity: f64) -> SimilarCase {
    SimilarCase::new(id, "I was charged twice this month", similarity)
        .with_metadata("category", "BILLING")
        .with_metadata("resolution", "Refund the duplicate charge")
}

// ==================== Gateway ====================

pub struct GatewayCall {
    pub prompt: String,
    pub temperature: f64,
}

pub struct MockGateway {
    responses: Mutex<VecDeque<Result<Value, GatewayError>>>,
    calls: Mutex<Vec<GatewayCall>>,
}

impl MockGateway {
    pub fn new(responses: Vec<Result<Value, GatewayError>>) -> Self {
        Self {
            responses: Mutex::new(VecDeque::from(responses)),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls(&self) -> std::sync::MutexGuard<'_, Vec<GatewayCall>> {
        self.calls.lock().unwrap()
    }
}

#[async_trait]
impl LlmGateway for MockGateway {
    async fn generate_structured(
        &self,
        prompt: &str,
        _schema: &Value,
        temperature: f64,
    ) -> Result<Value, GatewayError> {
        self.calls.lock().unwrap().push(GatewayCall {
            prompt: prompt.to_string(),
            temperature,
        });
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GatewayError::Transport("No more responses".to_string())))
    }
}

// ==================== Vector store ====================

pub struct MockVectorStore {
    cases: Vec<SimilarCase>,
    unavailable: bool,
    pub filters: Mutex<Vec<Option<MetadataFilter>>>,
    pub top_ks: Mutex<Vec<usize>>,
}

impl MockVectorStore {
    pub fn new(cases: Vec<SimilarCase>) -> Self {
        Self {
            cases,
            unavailable: false,
            filters: Mutex::new(Vec::new()),
            top_ks: Mutex::new(Vec::new()),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::new(vec![])
        }
    }
}

#[async_trait]
impl VectorStore for MockVectorStore {
    async fn search(
        &self,
        _query: &str,
        top_k: usize,
        filter: Option<&MetadataFilter>,
    ) -> Result<Vec<SimilarCase>, VectorStoreError> {
        self.filters.lock().unwrap().push(filter.cloned());
        self.top_ks.lock().unwrap().push(top_k);
        if self.unavailable {
            return Err(VectorStoreError::Unavailable("connection refused".to_string()));
        }
        Ok(self.cases.iter().take(top_k).cloned().collect())
    }

    async fn add(
        &self,
        _id: &str,
        _text: &str,
        _metadata: BTreeMap<String, Value>,
    ) -> Result<(), VectorStoreError> {
        Ok(())
    }

    async fn count(&self) -> Result<usize, VectorStoreError> {
        Ok(self.cases.len())
    }
}

// ==================== Stages ====================

pub struct MockStage {
    stage: Stage,
    responses: Mutex<VecDeque<Result<StageOutput, StageError>>>,
    health: HealthStatus,
    health_delay: Duration,
    latency_ms: AtomicU64,
    pub requests: Mutex<Vec<StageRequest>>,
}

impl MockStage {
    pub fn new(stage: Stage, responses: Vec<Result<StageOutput, StageError>>) -> Self {
        Self {
            stage,
            responses: Mutex::new(VecDeque::from(responses)),
            health: HealthStatus::Healthy,
            health_delay: Duration::ZERO,
            latency_ms: AtomicU64::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_health(mut self, health: HealthStatus) -> Self {
        self.health = health;
        self
    }

    pub fn with_health_delay(mut self, delay: Duration) -> Self {
        self.health_delay = delay;
        self
    }

    /// Every invocation sleeps this long before answering.
    pub fn set_latency(&self, latency: Duration) {
        self.latency_ms
            .store(latency.as_millis() as u64, Ordering::SeqCst);
    }

    /// Queue `times` more copies of the next scripted response.
    pub fn repeat_next(&self, times: usize) {
        let mut responses = self.responses.lock().unwrap();
        if let Some(next) = responses.front().cloned() {
            for _ in 0..times {
                responses.push_front(next.clone());
            }
        }
    }

    /// Script a response ahead of the ones already queued.
    pub fn push_front(&self, response: Result<StageOutput, StageError>) {
        self.responses.lock().unwrap().push_front(response);
    }
}

#[async_trait]
impl StageClient for MockStage {
    fn stage(&self) -> Stage {
        self.stage
    }

    async fn invoke(&self, request: &StageRequest) -> Result<StageOutput, StageError> {
        self.requests.lock().unwrap().push(request.clone());
        let latency = self.latency_ms.load(Ordering::SeqCst);
        if latency > 0 {
            tokio::time::sleep(Duration::from_millis(latency)).await;
        }
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(StageError::permanent(self.stage, "No more responses")))
    }

    async fn health_check(&self) -> HealthStatus {
        if !self.health_delay.is_zero() {
            tokio::time::sleep(self.health_delay).await;
        }
        self.health.clone()
    }
}

// ==================== Repository ====================

#[derive(Default)]
struct RepoState {
    tickets: HashMap<TicketId, Ticket>,
    records: Vec<StageRecord>,
    status_log: Vec<(TicketId, WorkflowState)>,
}

pub struct MockRepository {
    state: Mutex<RepoState>,
    unavailable: AtomicBool,
    next_id: AtomicU64,
    pub list_limits: Mutex<Vec<usize>>,
}

impl MockRepository {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(RepoState::default()),
            unavailable: AtomicBool::new(false),
            next_id: AtomicU64::new(1),
            list_limits: Mutex::new(Vec::new()),
        }
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Every status written for `id`, in order.
    pub fn statuses(&self, id: &TicketId) -> Vec<WorkflowState> {
        self.state
            .lock()
            .unwrap()
            .status_log
            .iter()
            .filter(|(t, _)| t == id)
            .map(|(_, s)| *s)
            .collect()
    }

    pub fn records(&self, id: &TicketId) -> usize {
        self.state
            .lock()
            .unwrap()
            .records
            .iter()
            .filter(|r| &r.ticket_id == id)
            .count()
    }

    pub fn total_records(&self) -> usize {
        self.state.lock().unwrap().records.len()
    }

    pub fn priority(&self, id: &TicketId) -> Option<Priority> {
        self.state.lock().unwrap().tickets.get(id).map(|t| t.priority)
    }

    fn check(&self) -> Result<(), RepositoryError> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(RepositoryError::Unavailable("connection refused".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl TicketRepository for MockRepository {
    async fn create(&self, ticket: NewTicket) -> Result<Ticket, RepositoryError> {
        self.check()?;
        let id = TicketId::new(format!("t-{}", self.next_id.fetch_add(1, Ordering::SeqCst)));
        let ticket = Ticket::open(id.clone(), ticket, Utc::now());
        self.state.lock().unwrap().tickets.insert(id, ticket.clone());
        Ok(ticket)
    }

    async fn get(&self, id: &TicketId) -> Result<Ticket, RepositoryError> {
        self.check()?;
        self.state
            .lock()
            .unwrap()
            .tickets
            .get(id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(id.clone()))
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<Ticket>, RepositoryError> {
        self.check()?;
        self.list_limits.lock().unwrap().push(limit);
        Ok(self.state.lock().unwrap().tickets.values().take(limit).cloned().collect())
    }

    async fn update_status(
        &self,
        id: &TicketId,
        status: WorkflowState,
    ) -> Result<(), RepositoryError> {
        self.check()?;
        let mut state = self.state.lock().unwrap();
        let ticket = state
            .tickets
            .get_mut(id)
            .ok_or_else(|| RepositoryError::NotFound(id.clone()))?;
        ticket.status = status;
        state.status_log.push((id.clone(), status));
        Ok(())
    }

    async fn update_priority(
        &self,
        id: &TicketId,
        priority: Priority,
    ) -> Result<(), RepositoryError> {
        self.check()?;
        let mut state = self.state.lock().unwrap();
        let ticket = state
            .tickets
            .get_mut(id)
            .ok_or_else(|| RepositoryError::NotFound(id.clone()))?;
        ticket.priority = priority;
        Ok(())
    }

    async fn append_result(&self, record: StageRecord) -> Result<(), RepositoryError> {
        self.check()?;
        self.state.lock().unwrap().records.push(record);
        Ok(())
    }

    async fn latest_results(&self, id: &TicketId) -> Result<PipelineResults, RepositoryError> {
        self.check()?;
        let state = self.state.lock().unwrap();
        Ok(latest_results(state.records.iter().filter(|r| &r.ticket_id == id)))
    }
}

// ==================== Notifications ====================

pub struct MockNotifier {
    pub sent: Mutex<Vec<EscalationContext>>,
    pub fail: AtomicBool,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl EscalationNotifier for MockNotifier {
    async fn notify(&self, context: &EscalationContext) -> Result<(), NotifyError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(NotifyError::Rejected(500));
        }
        self.sent.lock().unwrap().push(context.clone());
        Ok(())
    }
}

pub struct MockMessenger {
    pub sent: Mutex<Vec<CustomerMessage>>,
}

impl MockMessenger {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl CustomerMessenger for MockMessenger {
    async fn send(&self, message: CustomerMessage) -> Result<(), NotifyError> {
        self.sent.lock().unwrap().push(message);
        Ok(())
    }
}

// ==================== Metrics / progress ====================

#[derive(Default)]
pub struct RecordingMetrics {
    pub tickets: Mutex<Vec<(TicketId, bool)>>,
    pub stages: Mutex<Vec<(Stage, bool)>>,
}

impl MetricsRecorder for RecordingMetrics {
    fn record_ticket_processing(&self, ticket_id: &TicketId, _duration: Duration, success: bool) {
        self.tickets.lock().unwrap().push((ticket_id.clone(), success));
    }

    fn record_stage_call(&self, stage: Stage, success: bool, _duration: Duration) {
        self.stages.lock().unwrap().push((stage, success));
    }
}

#[derive(Default)]
pub struct RecordingProgress {
    pub started: Mutex<Vec<Stage>>,
    pub retries: Mutex<Vec<(Stage, u32)>>,
}

impl PipelineProgress for RecordingProgress {
    fn on_stage_start(&self, stage: Stage) {
        self.started.lock().unwrap().push(stage);
    }

    fn on_stage_complete(&self, _stage: Stage, _success: bool) {}

    fn on_retry(&self, stage: Stage, attempt: u32, _delay: Duration, _error: &str) {
        self.retries.lock().unwrap().push((stage, attempt));
    }
}
