//! Infrastructure layer for ticket-triage
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod knowledge;
pub mod monitoring;
pub mod notifications;
pub mod persistence;
pub mod providers;
pub mod stages;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use config::{
    ConfigLoader, FileBatchConfig, FileConfig, FileKnowledgeConfig, FileLlmConfig,
    FileLoggingConfig, FileNotificationsConfig, FileOutputConfig, FileRetryConfig,
    FileStagesConfig,
};
pub use knowledge::{InMemoryVectorStore, SeedCase, SeedError, load_seed_file, seed_store};
pub use monitoring::{InMemoryMetrics, MetricEvent, MetricsSummary};
pub use notifications::{LogNotifier, OutboxMessenger, SlackWebhookNotifier};
pub use persistence::InMemoryTicketRepository;
pub use providers::OpenAiCompatibleGateway;
pub use stages::HttpStageClient;
