//! Escalation context for human handlers.
//!
//! Built once a decision exists; carries everything a support agent needs
//! to pick the ticket up without re-running analysis.

use crate::analysis::decision::DecisionKind;
use crate::analysis::pipeline::WorkflowBundle;
use crate::analysis::sentiment::SentimentLevel;
use crate::ticket::entities::{Priority, TicketId};
use serde::{Deserialize, Serialize};

/// SLA reported when the decision carries none.
pub const DEFAULT_SLA_MINUTES: u32 = 60;

/// Sentiment section of the escalation context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentSummary {
    pub score: f64,
    pub level: SentimentLevel,
    pub urgency: Option<String>,
    pub churn_risk: bool,
    /// Human readable one-liner, e.g. `ANGRY (0.91), churn risk`.
    pub summary: String,
}

/// Solution section of the escalation context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolutionSummary {
    pub found: bool,
    pub text: Option<String>,
    pub confidence: Option<f64>,
    pub similar_cases_found: usize,
    pub top_match_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EscalationContext {
    pub ticket_id: TicketId,
    pub decision: DecisionKind,
    pub category: String,
    pub subcategory: Option<String>,
    pub issue_summary: String,
    pub sentiment: SentimentSummary,
    pub solution: SolutionSummary,
    pub recommended_action: String,
    pub priority: Priority,
    pub sla_minutes: u32,
    pub reasoning: Option<String>,
}

impl EscalationContext {
    pub fn build(ticket_id: &TicketId, workflow: &WorkflowBundle) -> Self {
        let classification = &workflow.classification;
        let knowledge = &workflow.knowledge;
        let sentiment = &workflow.sentiment;
        let decision = &workflow.decision;

        Self {
            ticket_id: ticket_id.clone(),
            decision: decision.decision,
            category: classification.category.clone(),
            subcategory: classification.subcategory.clone(),
            issue_summary: format!(
                "{} - {}",
                classification.category,
                classification.subcategory.as_deref().unwrap_or("N/A")
            ),
            sentiment: SentimentSummary {
                score: sentiment.score,
                level: sentiment.level,
                urgency: sentiment.urgency.clone(),
                churn_risk: sentiment.churn_risk,
                summary: sentiment.summary(),
            },
            solution: SolutionSummary {
                found: knowledge.solution.is_some(),
                text: knowledge.solution.clone(),
                confidence: knowledge.confidence,
                similar_cases_found: knowledge.similar_cases_found,
                top_match_id: knowledge.top_match_id.clone(),
            },
            recommended_action: recommended_action(decision.decision, knowledge.solution.as_deref()),
            priority: decision.priority,
            sla_minutes: decision.sla_minutes.unwrap_or(DEFAULT_SLA_MINUTES),
            reasoning: decision.reasoning.clone(),
        }
    }

    /// Flat bundle handed to notification channels.
    pub fn flatten(&self) -> NotificationBundle {
        NotificationBundle {
            ticket_id: self.ticket_id.clone(),
            priority: self.priority,
            category: self.category.clone(),
            sentiment_summary: self.sentiment.summary.clone(),
            solution: self.solution.text.clone(),
            recommended_action: self.recommended_action.clone(),
            reasoning: self.reasoning.clone(),
            sla_minutes: self.sla_minutes,
        }
    }
}

/// Flat context bundle consumed by chat and email notifiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationBundle {
    pub ticket_id: TicketId,
    pub priority: Priority,
    pub category: String,
    pub sentiment_summary: String,
    pub solution: Option<String>,
    pub recommended_action: String,
    pub reasoning: Option<String>,
    pub sla_minutes: u32,
}

impl NotificationBundle {
    /// Ordered `(label, value)` pairs for rendering.
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("Ticket", self.ticket_id.to_string()),
            ("Priority", self.priority.to_string()),
            ("Category", self.category.clone()),
            ("Sentiment", self.sentiment_summary.clone()),
            ("SLA", format!("{} min", self.sla_minutes)),
            ("Recommended action", self.recommended_action.clone()),
        ];
        if let Some(solution) = &self.solution {
            fields.push(("Solution", solution.clone()));
        }
        if let Some(reasoning) = &self.reasoning {
            fields.push(("Reasoning", reasoning.clone()));
        }
        fields
    }
}

/// Guidance for the human who picks up the ticket.
pub fn recommended_action(decision: DecisionKind, solution: Option<&str>) -> String {
    match decision {
        DecisionKind::AutoResolve => solution
            .unwrap_or("Auto-resolve with provided solution")
            .to_string(),
        DecisionKind::EscalateToManager => {
            "Call customer immediately. High churn risk. Offer retention incentives.".to_string()
        }
        DecisionKind::EscalateToHuman => match solution {
            Some(solution) => format!(
                "Customer needs empathy. Suggested solution: {}. Call or chat within SLA.",
                solution
            ),
            None => "Customer needs human assistance. No automated solution found. Investigate and respond."
                .to_string(),
        },
    }
}
