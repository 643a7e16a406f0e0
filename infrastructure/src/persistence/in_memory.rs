//! Process-local ticket store.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;
use triage_application::{RepositoryError, TicketRepository};
use triage_domain::{
    NewTicket, PipelineResults, Priority, StageRecord, Ticket, TicketId, WorkflowState,
    latest_results,
};
use uuid::Uuid;

#[derive(Default)]
struct Store {
    /// Insertion order doubles as creation order
    tickets: Vec<Ticket>,
    records: Vec<StageRecord>,
}

impl Store {
    fn ticket_mut(&mut self, id: &TicketId) -> Result<&mut Ticket, RepositoryError> {
        self.tickets
            .iter_mut()
            .find(|t| &t.id == id)
            .ok_or_else(|| RepositoryError::NotFound(id.clone()))
    }
}

/// [`TicketRepository`] kept in memory for the lifetime of the process.
///
/// Can be switched to unavailable to exercise degraded processing.
#[derive(Default)]
pub struct InMemoryTicketRepository {
    store: RwLock<Store>,
    unavailable: AtomicBool,
}

impl InMemoryTicketRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Full result history of a ticket, oldest first.
    pub fn history(&self, id: &TicketId) -> Result<Vec<StageRecord>, RepositoryError> {
        Ok(self
            .read()?
            .records
            .iter()
            .filter(|r| &r.ticket_id == id)
            .cloned()
            .collect())
    }

    fn check(&self) -> Result<(), RepositoryError> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(RepositoryError::Unavailable("datastore is offline".to_string()))
        } else {
            Ok(())
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Store>, RepositoryError> {
        self.check()?;
        self.store
            .read()
            .map_err(|_| RepositoryError::Unavailable("store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Store>, RepositoryError> {
        self.check()?;
        self.store
            .write()
            .map_err(|_| RepositoryError::Unavailable("store lock poisoned".to_string()))
    }
}

#[async_trait]
impl TicketRepository for InMemoryTicketRepository {
    async fn create(&self, ticket: NewTicket) -> Result<Ticket, RepositoryError> {
        let id = TicketId::new(Uuid::new_v4().to_string());
        let ticket = Ticket::open(id, ticket, Utc::now());
        self.write()?.tickets.push(ticket.clone());
        debug!("Created ticket {}", ticket.id);
        Ok(ticket)
    }

    async fn get(&self, id: &TicketId) -> Result<Ticket, RepositoryError> {
        self.read()?
            .tickets
            .iter()
            .find(|t| &t.id == id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(id.clone()))
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<Ticket>, RepositoryError> {
        let store = self.read()?;
        let mut tickets: Vec<Ticket> = store.tickets.iter().rev().cloned().collect();
        // Stable sort keeps newer insertions first when timestamps tie
        tickets.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        tickets.truncate(limit);
        Ok(tickets)
    }

    async fn update_status(
        &self,
        id: &TicketId,
        status: WorkflowState,
    ) -> Result<(), RepositoryError> {
        let mut store = self.write()?;
        let ticket = store.ticket_mut(id)?;
        ticket.status = status;
        ticket.updated_at = Utc::now();
        Ok(())
    }

    async fn update_priority(
        &self,
        id: &TicketId,
        priority: Priority,
    ) -> Result<(), RepositoryError> {
        let mut store = self.write()?;
        let ticket = store.ticket_mut(id)?;
        ticket.priority = priority;
        ticket.updated_at = Utc::now();
        Ok(())
    }

    async fn append_result(&self, record: StageRecord) -> Result<(), RepositoryError> {
        let mut store = self.write()?;
        store.ticket_mut(&record.ticket_id)?;
        store.records.push(record);
        Ok(())
    }

    async fn latest_results(&self, id: &TicketId) -> Result<PipelineResults, RepositoryError> {
        let store = self.read()?;
        if !store.tickets.iter().any(|t| &t.id == id) {
            return Err(RepositoryError::NotFound(id.clone()));
        }
        Ok(latest_results(store.records.iter().filter(|r| &r.ticket_id == id)))
    }
}
