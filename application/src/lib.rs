//! Application layer for ticket-triage
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod retry;
pub mod use_cases;

// Re-export commonly used types
pub use config::PipelineParams;
pub use ports::{
    llm_gateway::{GatewayError, LlmGateway},
    metrics::{MetricsRecorder, NoMetrics},
    notifier::{CustomerMessenger, EscalationNotifier, NotifyError},
    progress::{NoProgress, PipelineProgress},
    stage_client::{ErrorKind, HealthStatus, StageClient, StageError, StageRequest},
    ticket_repository::{RepositoryError, TicketRepository},
    vector_store::{MetadataFilter, VectorStore, VectorStoreError},
};
pub use retry::{Retryable, retry_with_backoff, retry_with_backoff_observed};
pub use use_cases::decide::{DecideError, DecideUseCase};
pub use use_cases::health_check::{HealthCheckUseCase, HealthReport};
pub use use_cases::process_ticket::{ProcessTicketError, ProcessTicketInput, ProcessTicketUseCase};
pub use use_cases::resolve_knowledge::{
    ResolveKnowledgeError, ResolveKnowledgeInput, ResolveKnowledgeUseCase,
};
pub use use_cases::stages::{DecisionStage, KnowledgeStage, StageRegistry};
pub use use_cases::ticket_query::{DEFAULT_LIST_LIMIT, TicketDetails, TicketQueryUseCase};
