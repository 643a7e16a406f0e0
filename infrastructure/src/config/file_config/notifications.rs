//! Notification configuration from TOML (`[notifications]` section)

use serde::{Deserialize, Serialize};

/// Raw notification configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileNotificationsConfig {
    /// Environment variable holding the Slack incoming-webhook URL
    pub slack_webhook_env: String,
    /// Optional channel override sent with every alert
    pub slack_channel: Option<String>,
}

impl Default for FileNotificationsConfig {
    fn default() -> Self {
        Self {
            slack_webhook_env: "SLACK_WEBHOOK_URL".to_string(),
            slack_channel: None,
        }
    }
}

impl FileNotificationsConfig {
    pub fn slack_webhook_url(&self) -> Option<String> {
        std::env::var(&self.slack_webhook_env)
            .ok()
            .filter(|url| !url.trim().is_empty())
    }
}
