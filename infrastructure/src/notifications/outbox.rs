//! In-memory customer message outbox.

use async_trait::async_trait;
use std::sync::Mutex;
use tracing::info;
use triage_application::{CustomerMessenger, NotifyError};
use triage_domain::CustomerMessage;

/// Queues resolution messages for later delivery.
#[derive(Debug, Default)]
pub struct OutboxMessenger {
    queue: Mutex<Vec<CustomerMessage>>,
}

impl OutboxMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every queued message, oldest first.
    pub fn queued(&self) -> Vec<CustomerMessage> {
        self.queue.lock().map(|q| q.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl CustomerMessenger for OutboxMessenger {
    async fn send(&self, message: CustomerMessage) -> Result<(), NotifyError> {
        info!(
            "Queued resolution for customer {} (ticket {})",
            message.customer_id, message.ticket_id
        );
        self.queue
            .lock()
            .map_err(|_| NotifyError::Delivery("outbox lock poisoned".to_string()))?
            .push(message);
        Ok(())
    }
}
