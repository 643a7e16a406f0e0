//! Ticket query use case
//!
//! Read side of the ticket store: a single ticket with its latest stage
//! results, or the most recent tickets.

use crate::ports::ticket_repository::{RepositoryError, TicketRepository};
use serde::Serialize;
use std::sync::Arc;
use triage_domain::{DecisionKind, PipelineResults, Ticket, TicketId};

/// Default page size for [`TicketQueryUseCase::list`].
pub const DEFAULT_LIST_LIMIT: usize = 100;

/// A ticket together with what the pipeline concluded about it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TicketDetails {
    pub ticket: Ticket,
    pub workflow: PipelineResults,
    pub decision: Option<DecisionKind>,
    /// Knowledge solution, only when the ticket was auto-resolved.
    pub solution: Option<String>,
    /// The ticket reached RESOLVED or ESCALATED.
    pub closed: bool,
}

impl TicketDetails {
    fn new(ticket: Ticket, workflow: PipelineResults) -> Self {
        let decision = workflow.decision.as_ref().map(|d| d.decision);
        let solution = match decision {
            Some(DecisionKind::AutoResolve) => workflow
                .knowledge
                .as_ref()
                .and_then(|k| k.solution.clone()),
            _ => None,
        };
        Self {
            closed: ticket.status.is_terminal(),
            ticket,
            workflow,
            decision,
            solution,
        }
    }
}

pub struct TicketQueryUseCase {
    repository: Arc<dyn TicketRepository>,
}

impl TicketQueryUseCase {
    pub fn new(repository: Arc<dyn TicketRepository>) -> Self {
        Self { repository }
    }

    pub async fn get(&self, id: &TicketId) -> Result<TicketDetails, RepositoryError> {
        let ticket = self.repository.get(id).await?;
        let workflow = self.repository.latest_results(id).await?;
        Ok(TicketDetails::new(ticket, workflow))
    }

    pub async fn list(&self, limit: Option<usize>) -> Result<Vec<Ticket>, RepositoryError> {
        self.repository
            .list_recent(limit.unwrap_or(DEFAULT_LIST_LIMIT))
            .await
    }
}
