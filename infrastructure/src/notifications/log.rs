//! Notifier that only writes to the log.

use async_trait::async_trait;
use tracing::warn;
use triage_application::{EscalationNotifier, NotifyError};
use triage_domain::EscalationContext;

/// Fallback [`EscalationNotifier`] used when no chat webhook is configured.
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl EscalationNotifier for LogNotifier {
    async fn notify(&self, context: &EscalationContext) -> Result<(), NotifyError> {
        let bundle = context.flatten();
        warn!(
            ticket_id = %bundle.ticket_id,
            priority = %bundle.priority,
            decision = %context.decision,
            sla_minutes = bundle.sla_minutes,
            "Ticket escalated: {}",
            bundle.recommended_action
        );
        Ok(())
    }
}
