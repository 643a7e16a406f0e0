//! In-process stage clients and the stage registry.
//!
//! Knowledge and decision run in process by default, wrapping their use
//! cases behind the same [`StageClient`] port the remote services use.

use crate::ports::stage_client::{StageClient, StageError, StageRequest};
use crate::ports::vector_store::VectorStoreError;
use crate::use_cases::decide::DecideUseCase;
use crate::use_cases::resolve_knowledge::{
    ResolveKnowledgeError, ResolveKnowledgeInput, ResolveKnowledgeUseCase,
};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use triage_domain::{Stage, StageOutput, WorkflowState};

impl From<ResolveKnowledgeError> for StageError {
    fn from(e: ResolveKnowledgeError) -> Self {
        match e {
            ResolveKnowledgeError::Search(VectorStoreError::InvalidCase(msg)) => {
                StageError::permanent(Stage::Knowledge, msg)
            }
            ResolveKnowledgeError::Search(err) => {
                StageError::transient(Stage::Knowledge, err.to_string())
            }
        }
    }
}

/// Knowledge stage backed by [`ResolveKnowledgeUseCase`]
pub struct KnowledgeStage {
    resolver: ResolveKnowledgeUseCase,
    top_k: usize,
}

impl KnowledgeStage {
    pub fn new(resolver: ResolveKnowledgeUseCase, top_k: usize) -> Self {
        Self { resolver, top_k }
    }
}

#[async_trait]
impl StageClient for KnowledgeStage {
    fn stage(&self) -> Stage {
        Stage::Knowledge
    }

    async fn invoke(&self, request: &StageRequest) -> Result<StageOutput, StageError> {
        let input = ResolveKnowledgeInput::new(request.text.clone())
            .with_category(request.category.clone())
            .with_top_k(self.top_k);
        let result = self.resolver.execute(input).await?;
        Ok(StageOutput::Knowledge(result))
    }
}

/// Decision stage backed by [`DecideUseCase`]
pub struct DecisionStage {
    engine: DecideUseCase,
}

impl DecisionStage {
    pub fn new(engine: DecideUseCase) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl StageClient for DecisionStage {
    fn stage(&self) -> Stage {
        Stage::Decision
    }

    async fn invoke(&self, request: &StageRequest) -> Result<StageOutput, StageError> {
        let inputs = request
            .prior
            .decision_inputs()
            .map_err(|e| StageError::from_domain(Stage::Decision, e))?;
        let result = self.engine.execute(inputs).await?;
        Ok(StageOutput::Decision(result))
    }
}

/// One client per stage.
#[derive(Clone, Default)]
pub struct StageRegistry {
    clients: BTreeMap<Stage, Arc<dyn StageClient>>,
}

impl StageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a client under the stage it reports; replaces any earlier one.
    pub fn register(mut self, client: Arc<dyn StageClient>) -> Self {
        self.clients.insert(client.stage(), client);
        self
    }

    pub fn get(&self, stage: Stage) -> Option<&Arc<dyn StageClient>> {
        self.clients.get(&stage)
    }

    /// Stages the transition table visits that have no registered client.
    pub fn missing(&self) -> Vec<Stage> {
        WorkflowState::stage_sequence(WorkflowState::initial())
            .into_iter()
            .filter(|s| !self.clients.contains_key(s))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Stage, &Arc<dyn StageClient>)> {
        self.clients.iter().map(|(stage, client)| (*stage, client))
    }
}
