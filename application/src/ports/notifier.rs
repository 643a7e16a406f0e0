//! Notification ports
//!
//! Outbound side effects of a finished pipeline run. Callers treat every
//! failure here as fire-and-forget: it is logged, never raised.

use async_trait::async_trait;
use thiserror::Error;
use triage_domain::{CustomerMessage, EscalationContext};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum NotifyError {
    #[error("Delivery failed: {0}")]
    Delivery(String),

    #[error("Channel rejected message with HTTP {0}")]
    Rejected(u16),
}

/// Alerts the support team about an escalated ticket.
#[async_trait]
pub trait EscalationNotifier: Send + Sync {
    async fn notify(&self, context: &EscalationContext) -> Result<(), NotifyError>;
}

/// Delivers a resolution to the customer.
#[async_trait]
pub trait CustomerMessenger: Send + Sync {
    async fn send(&self, message: CustomerMessage) -> Result<(), NotifyError>;
}
