//! Decision stage result

use crate::core::error::DomainError;
use crate::ticket::entities::Priority;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Final outcome of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DecisionKind {
    AutoResolve,
    EscalateToHuman,
    EscalateToManager,
}

impl DecisionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionKind::AutoResolve => "AUTO_RESOLVE",
            DecisionKind::EscalateToHuman => "ESCALATE_TO_HUMAN",
            DecisionKind::EscalateToManager => "ESCALATE_TO_MANAGER",
        }
    }

    pub fn is_escalation(&self) -> bool {
        !matches!(self, DecisionKind::AutoResolve)
    }
}

impl Default for DecisionKind {
    fn default() -> Self {
        DecisionKind::EscalateToHuman
    }
}

impl fmt::Display for DecisionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DecisionKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "AUTO_RESOLVE" => Ok(DecisionKind::AutoResolve),
            "ESCALATE_TO_HUMAN" => Ok(DecisionKind::EscalateToHuman),
            "ESCALATE_TO_MANAGER" => Ok(DecisionKind::EscalateToManager),
            other => Err(DomainError::unknown("decision", other)),
        }
    }
}

/// Result of the decision stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionResult {
    #[serde(default)]
    pub decision: DecisionKind,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub reasoning: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    /// Response-time target in minutes; zero or negative values mean "none".
    #[serde(default, deserialize_with = "positive_minutes")]
    pub sla_minutes: Option<u32>,
}

impl DecisionResult {
    pub fn new(decision: DecisionKind, confidence: f64, priority: Priority) -> Self {
        Self {
            decision,
            confidence,
            reasoning: None,
            priority,
            sla_minutes: None,
        }
    }

    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        self.reasoning = Some(reasoning.into());
        self
    }

    pub fn with_sla(mut self, minutes: u32) -> Self {
        self.sla_minutes = (minutes > 0).then_some(minutes);
        self
    }

    pub fn is_auto_resolve(&self) -> bool {
        self.decision == DecisionKind::AutoResolve
    }
}

fn positive_minutes<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<f64>::deserialize(deserializer)?;
    Ok(raw
        .filter(|m| m.is_finite() && *m >= 1.0)
        .map(|m| m.min(u32::MAX as f64) as u32))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full() {
        let result: DecisionResult = serde_json::from_str(
            r#"{"decision":"AUTO_RESOLVE","confidence":0.9,"reasoning":"clear fix","priority":"LOW","sla_minutes":60}"#,
        )
        .unwrap();
        assert_eq!(result.decision, DecisionKind::AutoResolve);
        assert_eq!(result.priority, Priority::Low);
        assert_eq!(result.sla_minutes, Some(60));
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let result: DecisionResult = serde_json::from_str("{}").unwrap();
        assert_eq!(result.decision, DecisionKind::EscalateToHuman);
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.priority, Priority::Medium);
        assert_eq!(result.sla_minutes, None);
    }

    #[test]
    fn test_zero_sla_means_absent() {
        let result: DecisionResult =
            serde_json::from_str(r#"{"decision":"ESCALATE_TO_HUMAN","sla_minutes":0}"#).unwrap();
        assert_eq!(result.sla_minutes, None);
        assert_eq!(
            DecisionResult::new(DecisionKind::AutoResolve, 0.8, Priority::Low)
                .with_sla(0)
                .sla_minutes,
            None
        );
    }

    #[test]
    fn test_unknown_decision_is_rejected() {
        assert!(serde_json::from_str::<DecisionResult>(r#"{"decision":"IGNORE"}"#).is_err());
        assert!(DecisionKind::EscalateToManager.is_escalation());
        assert!(!DecisionKind::AutoResolve.is_escalation());
    }
}
