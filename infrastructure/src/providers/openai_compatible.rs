//! Structured generation over an OpenAI-compatible chat completions API.
//!
//! Works with any provider that speaks `POST /v1/chat/completions` and
//! honours `response_format: {"type": "json_object"}`.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::debug;
use triage_application::{GatewayError, LlmGateway};
use triage_domain::core::string::truncate;
use triage_domain::extract_json;

const JSON_INSTRUCTION: &str =
    "Please respond with valid JSON only. Do not include any text before or after the JSON.";

/// [`LlmGateway`] backed by an OpenAI-compatible endpoint.
pub struct OpenAiCompatibleGateway {
    client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiCompatibleGateway {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> reqwest::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key,
        })
    }

    fn request_body(&self, prompt: &str, schema: &Value, temperature: f64) -> Value {
        let schema_text = serde_json::to_string_pretty(schema).unwrap_or_else(|_| schema.to_string());
        let content = format!(
            "{}\n\n{}\n\nExpected JSON schema: {}",
            prompt, JSON_INSTRUCTION, schema_text
        );
        json!({
            "model": self.model,
            "messages": [{"role": "user", "content": content}],
            "temperature": temperature,
            "response_format": {"type": "json_object"},
        })
    }
}

#[async_trait]
impl LlmGateway for OpenAiCompatibleGateway {
    async fn generate_structured(
        &self,
        prompt: &str,
        schema: &Value,
        temperature: f64,
    ) -> Result<Value, GatewayError> {
        let Some(api_key) = &self.api_key else {
            return Err(GatewayError::NotConfigured("API key is not set".to_string()));
        };

        let url = format!("{}/v1/chat/completions", self.base_url);
        debug!("Requesting structured output from {} ({})", url, self.model);

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&self.request_body(prompt, schema, temperature))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GatewayError::Timeout
                } else {
                    GatewayError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Http {
                status: status.as_u16(),
                body: truncate(&body, 200),
            });
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Malformed(format!("unexpected response body: {}", e)))?;

        let content = chat
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| GatewayError::Malformed("response has no message content".to_string()))?;

        extract_json(&content).map_err(|e| GatewayError::Malformed(e.to_string()))
    }
}
