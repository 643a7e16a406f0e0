//! Ticket repository port
//!
//! Ticket records plus one append-only result log per stage.

use async_trait::async_trait;
use thiserror::Error;
use triage_domain::{
    NewTicket, PipelineResults, Priority, StageRecord, Ticket, TicketId, WorkflowState,
};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RepositoryError {
    #[error("Datastore unavailable: {0}")]
    Unavailable(String),

    #[error("Ticket not found: {0}")]
    NotFound(TicketId),
}

#[async_trait]
pub trait TicketRepository: Send + Sync {
    /// Store a new ticket in the initial lifecycle state and assign its identity.
    async fn create(&self, ticket: NewTicket) -> Result<Ticket, RepositoryError>;

    async fn get(&self, id: &TicketId) -> Result<Ticket, RepositoryError>;

    /// Most recently created first.
    async fn list_recent(&self, limit: usize) -> Result<Vec<Ticket>, RepositoryError>;

    async fn update_status(
        &self,
        id: &TicketId,
        status: WorkflowState,
    ) -> Result<(), RepositoryError>;

    async fn update_priority(&self, id: &TicketId, priority: Priority)
    -> Result<(), RepositoryError>;

    /// Append a stage result; earlier records are never modified.
    async fn append_result(&self, record: StageRecord) -> Result<(), RepositoryError>;

    /// Most recent result of each stage.
    async fn latest_results(&self, id: &TicketId) -> Result<PipelineResults, RepositoryError>;
}
