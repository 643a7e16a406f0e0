//! Deterministic override rules.
//!
//! Rules are evaluated in order and the first match wins. When none
//! matches, the decision is delegated to model-assisted arbitration, which
//! receives [`HEURISTIC_GUIDANCE`] as documented thresholds.
//!
//! | # | Condition | Decision | Confidence | Priority | SLA |
//! |---|-----------|----------|------------|----------|-----|
//! | 1 | `sentiment.score >= 0.85` | ESCALATE_TO_HUMAN | 0.95 | HIGH | 5 |
//! | 2 | `sentiment.churn_risk` | ESCALATE_TO_MANAGER | 0.90 | URGENT | 2 |
//! | 3 | `category == "BUG"` | ESCALATE_TO_HUMAN | 0.85 | HIGH | 15 |

use crate::analysis::decision::{DecisionKind, DecisionResult};
use crate::analysis::pipeline::DecisionInputs;
use crate::ticket::entities::Priority;

/// Sentiment score at or above which a human always takes over.
pub const SENTIMENT_ESCALATION_THRESHOLD: f64 = 0.85;

/// A deterministic rule that short-circuits arbitration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverrideRule {
    HighSentiment,
    ChurnRisk,
    BugReport,
}

impl OverrideRule {
    /// Rules in evaluation order.
    pub const ORDERED: [OverrideRule; 3] = [
        OverrideRule::HighSentiment,
        OverrideRule::ChurnRisk,
        OverrideRule::BugReport,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OverrideRule::HighSentiment => "high_sentiment",
            OverrideRule::ChurnRisk => "churn_risk",
            OverrideRule::BugReport => "bug_report",
        }
    }

    pub fn matches(&self, inputs: &DecisionInputs<'_>) -> bool {
        match self {
            OverrideRule::HighSentiment => {
                inputs.sentiment.score >= SENTIMENT_ESCALATION_THRESHOLD
            }
            OverrideRule::ChurnRisk => inputs.sentiment.churn_risk,
            OverrideRule::BugReport => inputs.classification.is_bug(),
        }
    }

    pub fn decision(&self, inputs: &DecisionInputs<'_>) -> DecisionResult {
        match self {
            OverrideRule::HighSentiment => {
                DecisionResult::new(DecisionKind::EscalateToHuman, 0.95, Priority::High)
                    .with_reasoning(format!(
                        "Sentiment score {:.2} exceeds threshold ({:.2}). Customer needs human empathy.",
                        inputs.sentiment.score, SENTIMENT_ESCALATION_THRESHOLD
                    ))
                    .with_sla(5)
            }
            OverrideRule::ChurnRisk => {
                DecisionResult::new(DecisionKind::EscalateToManager, 0.90, Priority::Urgent)
                    .with_reasoning("Customer at risk of churn. Requires manager attention.")
                    .with_sla(2)
            }
            OverrideRule::BugReport => {
                DecisionResult::new(DecisionKind::EscalateToHuman, 0.85, Priority::High)
                    .with_reasoning("Bug reports require engineering team review.")
                    .with_sla(15)
            }
        }
    }
}

/// Evaluate the override rules in order; `None` means arbitration must decide.
pub fn apply_override_rules(inputs: &DecisionInputs<'_>) -> Option<(OverrideRule, DecisionResult)> {
    OverrideRule::ORDERED
        .iter()
        .find(|rule| rule.matches(inputs))
        .map(|rule| (*rule, rule.decision(inputs)))
}

/// A documented auto-resolve threshold handed to arbitration as guidance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeuristicThreshold {
    /// Knowledge confidence must be at least this...
    pub min_knowledge_confidence: f64,
    /// ...and the sentiment score strictly below this.
    pub max_sentiment: f64,
}

/// Auto-resolve thresholds; anything else escalates to a human.
pub const HEURISTIC_GUIDANCE: [HeuristicThreshold; 2] = [
    HeuristicThreshold {
        min_knowledge_confidence: 0.85,
        max_sentiment: 0.7,
    },
    HeuristicThreshold {
        min_knowledge_confidence: 0.7,
        max_sentiment: 0.5,
    },
];

/// What the documented heuristic recommends for these inputs.
///
/// This is guidance for the arbitration collaborator, not a substitute for it.
pub fn heuristic_recommendation(knowledge_confidence: f64, sentiment_score: f64) -> DecisionKind {
    let auto = HEURISTIC_GUIDANCE.iter().any(|t| {
        knowledge_confidence >= t.min_knowledge_confidence && sentiment_score < t.max_sentiment
    });
    if auto {
        DecisionKind::AutoResolve
    } else {
        DecisionKind::EscalateToHuman
    }
}
