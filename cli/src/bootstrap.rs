//! Dependency injection: builds every adapter from the loaded configuration.

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};
use triage_application::{
    CustomerMessenger, DecideUseCase, DecisionStage, EscalationNotifier, HealthCheckUseCase,
    KnowledgeStage, LlmGateway, PipelineParams, ProcessTicketUseCase, ResolveKnowledgeUseCase,
    StageClient, StageRegistry, TicketQueryUseCase, TicketRepository, VectorStore,
};
use triage_domain::Stage;
use triage_infrastructure::{
    FileConfig, HttpStageClient, InMemoryMetrics, InMemoryTicketRepository, InMemoryVectorStore,
    LogNotifier, OpenAiCompatibleGateway, OutboxMessenger, SlackWebhookNotifier, load_seed_file,
    seed_store,
};

/// Fully wired use cases for one process lifetime.
pub struct App {
    pub process: ProcessTicketUseCase,
    pub query: TicketQueryUseCase,
    pub health: HealthCheckUseCase,
    pub metrics: Arc<InMemoryMetrics>,
    pub outbox: Arc<OutboxMessenger>,
}

pub async fn build(config: &FileConfig) -> Result<App> {
    let params = config.pipeline_params();

    // === Model gateway ===
    let api_key = config.llm.api_key();
    if api_key.is_none() {
        warn!(
            "{} is not set; model-assisted decisions and solutions are unavailable",
            config.llm.api_key_env
        );
    }
    let gateway: Arc<dyn LlmGateway> = Arc::new(
        OpenAiCompatibleGateway::new(
            &config.llm.base_url,
            &config.llm.model,
            api_key,
            std::time::Duration::from_secs(config.llm.timeout_secs),
        )
        .context("failed to build model gateway client")?,
    );

    // === Knowledge base ===
    let store = Arc::new(InMemoryVectorStore::new());
    if let Some(path) = &config.knowledge.seed_file {
        let cases = load_seed_file(path)?;
        seed_store(store.as_ref(), &cases).await?;
    }
    let store: Arc<dyn VectorStore> = store;

    // === Stages ===
    let stages = build_stages(config, &params, store, gateway)?;

    // === Side effects ===
    let repository: Arc<dyn TicketRepository> = Arc::new(InMemoryTicketRepository::new());
    let notifier: Arc<dyn EscalationNotifier> = match config.notifications.slack_webhook_url() {
        Some(url) => {
            info!("Escalations are posted to Slack");
            Arc::new(
                SlackWebhookNotifier::new(url)
                    .context("failed to build Slack webhook client")?
                    .with_channel(config.notifications.slack_channel.clone()),
            )
        }
        None => Arc::new(LogNotifier),
    };
    let outbox = Arc::new(OutboxMessenger::new());
    let messenger: Arc<dyn CustomerMessenger> = outbox.clone();
    let metrics = Arc::new(InMemoryMetrics::new());

    let process = ProcessTicketUseCase::new(
        stages.clone(),
        repository.clone(),
        notifier,
        messenger,
        metrics.clone(),
    )
    .with_retry_policy(params.retry);

    Ok(App {
        process,
        query: TicketQueryUseCase::new(repository),
        health: HealthCheckUseCase::new(stages, params.health_timeout),
        metrics,
        outbox,
    })
}

fn build_stages(
    config: &FileConfig,
    params: &PipelineParams,
    store: Arc<dyn VectorStore>,
    gateway: Arc<dyn LlmGateway>,
) -> Result<StageRegistry> {
    let mut registry = StageRegistry::new();

    for stage in Stage::ALL {
        let client: Arc<dyn StageClient> = match (stage, config.stages.remote_url(stage)) {
            (_, Some(url)) => {
                info!("{} stage: remote service at {}", stage.display_name(), url);
                Arc::new(
                    HttpStageClient::new(stage, url, config.stages.timeout())
                        .with_context(|| format!("failed to build {} stage client", stage))?,
                )
            }
            (Stage::Knowledge, None) => {
                info!("Knowledge Search stage: in-process");
                let resolver = ResolveKnowledgeUseCase::new(
                    store.clone(),
                    gateway.clone(),
                    params.solution_temperature,
                );
                Arc::new(KnowledgeStage::new(resolver, params.top_k))
            }
            (Stage::Decision, None) => {
                info!("Decision stage: in-process");
                let engine = DecideUseCase::new(gateway.clone(), params.decision_temperature);
                Arc::new(DecisionStage::new(engine))
            }
            // Classification and sentiment always have a URL
            (Stage::Classification | Stage::Sentiment, None) => continue,
        };
        registry = registry.register(client);
    }

    Ok(registry)
}
