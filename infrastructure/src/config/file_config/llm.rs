//! Model gateway configuration from TOML (`[llm]` section)

use serde::{Deserialize, Serialize};
use triage_domain::{DECISION_TEMPERATURE, SOLUTION_TEMPERATURE};

/// Raw configuration for the OpenAI-compatible model endpoint.
///
/// The API key itself never lives in the file; `api_key_env` names the
/// environment variable that holds it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLlmConfig {
    pub base_url: String,
    pub model: String,
    pub api_key_env: String,
    pub timeout_secs: u64,
    pub decision_temperature: f64,
    pub solution_temperature: f64,
}

impl Default for FileLlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.deepseek.com".to_string(),
            model: "deepseek-chat".to_string(),
            api_key_env: "DEEPSEEK_API_KEY".to_string(),
            timeout_secs: 60,
            decision_temperature: DECISION_TEMPERATURE,
            solution_temperature: SOLUTION_TEMPERATURE,
        }
    }
}

impl FileLlmConfig {
    /// Read the API key from the configured environment variable.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}
