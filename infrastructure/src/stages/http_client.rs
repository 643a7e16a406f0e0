//! HTTP adapter for remotely deployed stage services.
//!
//! Every stage service exposes `POST /api/process` and `GET /api/health`.
//! Responses are normalized: absent or `null` fields take the documented
//! defaults, while values of the wrong type or unknown enum strings are
//! reported as malformed output.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Map, Value, json};
use std::time::Duration;
use tracing::debug;
use triage_application::{ErrorKind, HealthStatus, StageClient, StageError, StageRequest};
use triage_domain::core::string::truncate;
use triage_domain::{DomainError, Stage, StageOutput, from_value};

/// [`StageClient`] that calls a stage service over HTTP.
pub struct HttpStageClient {
    stage: Stage,
    base_url: String,
    client: Client,
}

impl HttpStageClient {
    pub fn new(stage: Stage, base_url: impl Into<String>, timeout: Duration) -> reqwest::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            stage,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Request body for this client's stage.
    fn payload(&self, request: &StageRequest) -> Result<Value, StageError> {
        let payload = match self.stage {
            Stage::Classification | Stage::Sentiment => json!({
                "ticket_id": request.ticket_id,
                "text": request.text,
            }),
            Stage::Knowledge => {
                let mut body = json!({
                    "ticket_id": request.ticket_id,
                    "text": request.text,
                });
                if let Some(category) = &request.category {
                    body["category"] = json!(category);
                }
                body
            }
            Stage::Decision => {
                let inputs = request
                    .prior
                    .decision_inputs()
                    .map_err(|e| StageError::from_domain(self.stage, e))?;
                json!({
                    "ticket_id": request.ticket_id,
                    "router_result": inputs.classification,
                    "knowledge_result": inputs.knowledge,
                    "sentiment_result": inputs.sentiment,
                })
            }
        };
        Ok(payload)
    }

    fn transport_error(&self, e: reqwest::Error) -> StageError {
        let message = if e.is_timeout() {
            format!("request to {} timed out", self.base_url)
        } else {
            format!("request to {} failed: {}", self.base_url, e)
        };
        StageError::transient(self.stage, message)
    }
}

/// Decode a stage service response into the typed stage output.
fn normalize(stage: Stage, body: Value) -> Result<StageOutput, DomainError> {
    let Value::Object(fields) = body else {
        return Err(DomainError::MalformedOutput(format!(
            "expected a JSON object from the {} stage",
            stage
        )));
    };
    let fields: Map<String, Value> = fields.into_iter().filter(|(_, v)| !v.is_null()).collect();
    let value = Value::Object(fields);

    Ok(match stage {
        Stage::Classification => StageOutput::Classification(from_value(value)?),
        Stage::Knowledge => StageOutput::Knowledge(from_value(value)?),
        Stage::Sentiment => StageOutput::Sentiment(from_value(value)?),
        Stage::Decision => StageOutput::Decision(from_value(value)?),
    })
}

#[async_trait]
impl StageClient for HttpStageClient {
    fn stage(&self) -> Stage {
        self.stage
    }

    async fn invoke(&self, request: &StageRequest) -> Result<StageOutput, StageError> {
        let url = format!("{}/api/process", self.base_url);
        let payload = self.payload(request)?;
        debug!("POST {} for ticket {}", url, request.ticket_id);

        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StageError::new(
                self.stage,
                ErrorKind::from_status(status.as_u16()),
                format!("HTTP {}: {}", status.as_u16(), truncate(&body, 200)),
            ));
        }

        let body: Value = response.json().await.map_err(|e| {
            if e.is_timeout() {
                self.transport_error(e)
            } else {
                StageError::malformed(self.stage, format!("response is not JSON: {}", e))
            }
        })?;

        normalize(self.stage, body).map_err(|e| StageError::from_domain(self.stage, e))
    }

    async fn health_check(&self) -> HealthStatus {
        let url = format!("{}/api/health", self.base_url);
        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => return HealthStatus::Unreachable(e.to_string()),
        };

        if !response.status().is_success() {
            return HealthStatus::Unhealthy;
        }

        match response.json::<Value>().await {
            Ok(body) if body.get("status").and_then(Value::as_str) == Some("healthy") => {
                HealthStatus::Healthy
            }
            _ => HealthStatus::Unhealthy,
        }
    }
}
