//! Notification adapters
//!
//! Escalation alerts go to Slack when a webhook is configured and to the
//! log otherwise. Customer resolutions are queued in an outbox.

mod log;
mod outbox;
mod slack;

pub use log::LogNotifier;
pub use outbox::OutboxMessenger;
pub use slack::SlackWebhookNotifier;
