//! Sentiment stage result

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Coarse mood bucket reported with the sentiment score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SentimentLevel {
    Calm,
    #[default]
    Neutral,
    Upset,
    Angry,
}

impl SentimentLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLevel::Calm => "CALM",
            SentimentLevel::Neutral => "NEUTRAL",
            SentimentLevel::Upset => "UPSET",
            SentimentLevel::Angry => "ANGRY",
        }
    }
}

impl fmt::Display for SentimentLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SentimentLevel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "CALM" => Ok(SentimentLevel::Calm),
            "NEUTRAL" => Ok(SentimentLevel::Neutral),
            "UPSET" => Ok(SentimentLevel::Upset),
            "ANGRY" => Ok(SentimentLevel::Angry),
            other => Err(DomainError::unknown("sentiment level", other)),
        }
    }
}

/// Customer sentiment as reported by the sentiment stage.
///
/// `score` is in [0, 1], higher meaning more negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    #[serde(default = "default_score")]
    pub score: f64,
    #[serde(default)]
    pub level: SentimentLevel,
    #[serde(default)]
    pub urgency: Option<String>,
    #[serde(default)]
    pub churn_risk: bool,
    #[serde(default)]
    pub requires_human: bool,
    #[serde(default)]
    pub recommended_handler: Option<String>,
}

fn default_score() -> f64 {
    0.5
}

impl Default for SentimentResult {
    fn default() -> Self {
        Self {
            score: default_score(),
            level: SentimentLevel::Neutral,
            urgency: None,
            churn_risk: false,
            requires_human: false,
            recommended_handler: None,
        }
    }
}

impl SentimentResult {
    pub fn new(score: f64, level: SentimentLevel) -> Self {
        Self {
            score,
            level,
            ..Default::default()
        }
    }

    pub fn with_churn_risk(mut self, churn_risk: bool) -> Self {
        self.churn_risk = churn_risk;
        self
    }

    pub fn with_urgency(mut self, urgency: impl Into<String>) -> Self {
        self.urgency = Some(urgency.into());
        self
    }

    /// One-line summary used in escalation notifications.
    pub fn summary(&self) -> String {
        let mut summary = format!("{} ({:.2})", self.level, self.score);
        if let Some(urgency) = &self.urgency {
            summary.push_str(&format!(", urgency {}", urgency));
        }
        if self.churn_risk {
            summary.push_str(", churn risk");
        }
        summary
    }
}
