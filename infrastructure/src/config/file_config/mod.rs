//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Every section is `#[serde(default)]`, so a partial file only overrides
//! the keys it names.

mod batch;
mod knowledge;
mod llm;
mod logging;
mod notifications;
mod output;
mod retry;
mod stages;

pub use batch::FileBatchConfig;
pub use knowledge::FileKnowledgeConfig;
pub use llm::FileLlmConfig;
pub use logging::FileLoggingConfig;
pub use notifications::FileNotificationsConfig;
pub use output::FileOutputConfig;
pub use retry::FileRetryConfig;
pub use stages::FileStagesConfig;

use serde::{Deserialize, Serialize};
use triage_application::PipelineParams;
use triage_domain::{ConfigIssue, ConfigIssueCode, Stage};

/// Complete configuration file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub stages: FileStagesConfig,
    pub retry: FileRetryConfig,
    pub llm: FileLlmConfig,
    pub knowledge: FileKnowledgeConfig,
    pub notifications: FileNotificationsConfig,
    pub logging: FileLoggingConfig,
    pub output: FileOutputConfig,
    pub batch: FileBatchConfig,
}

impl FileConfig {
    /// Validate the configuration and return every issue found.
    ///
    /// Errors make the pipeline unusable; warnings are reported and ignored.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        // 1. Stage and gateway URLs
        for stage in Stage::ALL {
            if let Some(url) = self.stages.remote_url(stage)
                && url.trim().is_empty()
            {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::EmptyUrl,
                    format!("stages.{}_url cannot be empty", stage.as_str()),
                ));
            }
        }
        if self.llm.base_url.trim().is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::EmptyUrl,
                "llm.base_url cannot be empty",
            ));
        }

        // 2. Knowledge retrieval depth
        if self.knowledge.top_k == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroTopK,
                "knowledge.top_k must be at least 1",
            ));
        }

        // 3. Retry policy
        let factor = self.retry.backoff_factor;
        if !factor.is_finite() || factor < 0.0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::InvalidBackoff,
                format!("retry.backoff_factor must be a finite number >= 0, got {}", factor),
            ));
        } else if factor < 1.0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::ShrinkingBackoff,
                format!(
                    "retry.backoff_factor {} is below 1.0; delays will shrink",
                    factor
                ),
            ));
        }
        if self.retry.max_retries <= 1 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::RetriesDisabled,
                "retry.max_retries <= 1: stage calls are attempted once",
            ));
        }

        // 4. Batch runs
        if self.batch.concurrency == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroConcurrency,
                "batch.concurrency must be at least 1",
            ));
        }

        // 5. Sampling temperatures
        for (field, value) in [
            ("llm.decision_temperature", self.llm.decision_temperature),
            ("llm.solution_temperature", self.llm.solution_temperature),
        ] {
            if !(0.0..=1.0).contains(&value) {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::TemperatureOutOfRange,
                    format!("{} must be within [0, 1], got {}", field, value),
                ));
            }
        }

        issues
    }

    /// Parameters for the ticket processing use cases.
    pub fn pipeline_params(&self) -> PipelineParams {
        PipelineParams::default()
            .with_retry(self.retry.to_policy())
            .with_top_k(self.knowledge.top_k)
            .with_temperatures(
                self.llm.decision_temperature,
                self.llm.solution_temperature,
            )
            .with_health_timeout(self.stages.health_timeout())
    }
}
