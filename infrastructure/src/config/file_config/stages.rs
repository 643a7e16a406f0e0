//! Stage service configuration from TOML (`[stages]` section)

use serde::{Deserialize, Serialize};
use std::time::Duration;
use triage_domain::Stage;

/// Where each pipeline stage runs.
///
/// Classification and sentiment are always remote services. Knowledge and
/// decision run in-process unless a URL is configured for them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStagesConfig {
    pub classification_url: String,
    pub sentiment_url: String,
    pub knowledge_url: Option<String>,
    pub decision_url: Option<String>,
    /// Per-request timeout for stage services
    pub timeout_secs: u64,
    /// Upper bound for each health probe
    pub health_timeout_secs: u64,
}

impl Default for FileStagesConfig {
    fn default() -> Self {
        Self {
            classification_url: "http://localhost:8001".to_string(),
            sentiment_url: "http://localhost:8003".to_string(),
            knowledge_url: None,
            decision_url: None,
            timeout_secs: 30,
            health_timeout_secs: 5,
        }
    }
}

impl FileStagesConfig {
    /// Remote base URL for `stage`, or `None` when it runs in-process.
    pub fn remote_url(&self, stage: Stage) -> Option<&str> {
        match stage {
            Stage::Classification => Some(&self.classification_url),
            Stage::Sentiment => Some(&self.sentiment_url),
            Stage::Knowledge => self.knowledge_url.as_deref(),
            Stage::Decision => self.decision_url.as_deref(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn health_timeout(&self) -> Duration {
        Duration::from_secs(self.health_timeout_secs)
    }
}
