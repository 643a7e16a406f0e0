//! Slack incoming-webhook notifier.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::info;
use triage_application::{EscalationNotifier, NotifyError};
use triage_domain::{EscalationContext, NotificationBundle, Priority};

const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(10);

/// Posts escalation alerts to a Slack incoming webhook.
pub struct SlackWebhookNotifier {
    client: Client,
    webhook_url: String,
    channel: Option<String>,
}

impl SlackWebhookNotifier {
    pub fn new(webhook_url: impl Into<String>) -> reqwest::Result<Self> {
        let client = Client::builder().timeout(WEBHOOK_TIMEOUT).build()?;
        Ok(Self {
            client,
            webhook_url: webhook_url.into(),
            channel: None,
        })
    }

    pub fn with_channel(mut self, channel: Option<String>) -> Self {
        self.channel = channel;
        self
    }

    fn payload(&self, bundle: &NotificationBundle) -> Value {
        let context_text = bundle
            .fields()
            .into_iter()
            .map(|(label, value)| format!("*{}:* {}", label, value))
            .collect::<Vec<_>>()
            .join("\n");

        let mut payload = json!({
            "blocks": [
                {
                    "type": "header",
                    "text": {
                        "type": "plain_text",
                        "text": format!("Support Ticket Alert ({})", bundle.priority),
                    }
                },
                {
                    "type": "section",
                    "text": {
                        "type": "mrkdwn",
                        "text": format!("Ticket {} requires attention", bundle.ticket_id),
                    }
                },
                {
                    "type": "section",
                    "text": {
                        "type": "mrkdwn",
                        "text": format!("*Context:*\n{}", context_text),
                    }
                }
            ],
            "attachments": [
                {
                    "color": priority_color(bundle.priority),
                    "footer": "Customer Support System",
                }
            ],
        });
        if let Some(channel) = &self.channel {
            payload["channel"] = json!(channel);
        }
        payload
    }
}

fn priority_color(priority: Priority) -> &'static str {
    match priority {
        Priority::Low => "#36a64f",
        Priority::Medium => "#ffa500",
        Priority::High => "#ff0000",
        Priority::Urgent => "#8b0000",
    }
}

#[async_trait]
impl EscalationNotifier for SlackWebhookNotifier {
    async fn notify(&self, context: &EscalationContext) -> Result<(), NotifyError> {
        let payload = self.payload(&context.flatten());
        let response = self
            .client
            .post(&self.webhook_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| NotifyError::Delivery(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Rejected(status.as_u16()));
        }
        info!("Slack alert sent for ticket {}", context.ticket_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{request_body, serve_once};
    use triage_domain::{
        ClassificationResult, DecisionKind, DecisionResult, KnowledgeResult, SentimentLevel,
        SentimentResult, TicketId, WorkflowBundle,
    };

    fn bundle(priority: Priority) -> NotificationBundle {
        NotificationBundle {
            ticket_id: TicketId::new("t-9"),
            priority,
            category: "BILLING".to_string(),
            sentiment_summary: "ANGRY (0.90)".to_string(),
            solution: None,
            recommended_action: "Call customer immediately.".to_string(),
            reasoning: Some("High churn risk".to_string()),
            sla_minutes: 15,
        }
    }

    #[test]
    fn test_payload_layout() {
        let notifier = SlackWebhookNotifier::new("http://hooks.invalid")
            .unwrap()
            .with_channel(Some("#support".to_string()));
        let payload = notifier.payload(&bundle(Priority::Urgent));

        assert_eq!(payload["blocks"][0]["text"]["text"], "Support Ticket Alert (URGENT)");
        assert_eq!(payload["blocks"][1]["text"]["text"], "Ticket t-9 requires attention");
        let context = payload["blocks"][2]["text"]["text"].as_str().unwrap();
        assert!(context.contains("*Category:* BILLING"));
        assert!(context.contains("*SLA:* 15 min"));
        assert!(!context.contains("*Solution:*"));
        assert_eq!(payload["attachments"][0]["color"], "#8b0000");
        assert_eq!(payload["channel"], "#support");
    }

    #[test]
    fn test_priority_colors() {
        assert_eq!(priority_color(Priority::Low), "#36a64f");
        assert_eq!(priority_color(Priority::Medium), "#ffa500");
        assert_eq!(priority_color(Priority::High), "#ff0000");
    }

    fn escalation() -> EscalationContext {
        let workflow = WorkflowBundle {
            classification: ClassificationResult::new("BILLING", 0.9),
            knowledge: KnowledgeResult::no_matches(),
            sentiment: SentimentResult::new(0.9, SentimentLevel::Angry).with_churn_risk(true),
            decision: DecisionResult::new(DecisionKind::EscalateToManager, 0.95, Priority::High),
        };
        EscalationContext::build(&TicketId::new("t-9"), &workflow)
    }

    #[tokio::test]
    async fn test_notify_posts_payload() {
        let (url, server) = serve_once(200, "ok").await;
        SlackWebhookNotifier::new(url)
            .unwrap()
            .notify(&escalation())
            .await
            .unwrap();

        let body = request_body(&server.await.unwrap());
        assert_eq!(body["blocks"][0]["text"]["text"], "Support Ticket Alert (HIGH)");
        assert_eq!(body["attachments"][0]["color"], "#ff0000");
    }

    #[tokio::test]
    async fn test_rejected_webhook() {
        let (url, _server) = serve_once(403, "invalid_token").await;
        let err = SlackWebhookNotifier::new(url)
            .unwrap()
            .notify(&escalation())
            .await
            .unwrap_err();
        assert_eq!(err, NotifyError::Rejected(403));
    }
}
