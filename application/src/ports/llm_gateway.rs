//! LLM Gateway port
//!
//! Defines the interface for structured generation with a model provider.

use crate::ports::stage_client::ErrorKind;
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur during LLM gateway operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    Transport(String),

    #[error("Provider returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Timeout")]
    Timeout,

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("Gateway not configured: {0}")]
    NotConfigured(String),
}

impl GatewayError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GatewayError::Transport(_) | GatewayError::Timeout => ErrorKind::Transient,
            GatewayError::Http { status, .. } => ErrorKind::from_status(*status),
            GatewayError::Malformed(_) => ErrorKind::MalformedOutput,
            GatewayError::NotConfigured(_) => ErrorKind::Permanent,
        }
    }
}

/// Gateway for structured model output
///
/// This port defines how the application layer asks a model provider for
/// JSON matching a schema. Implementations (adapters) live in the
/// infrastructure layer.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Generate a JSON value matching `schema`.
    ///
    /// Fails on transport errors and when the response cannot be parsed as JSON.
    async fn generate_structured(
        &self,
        prompt: &str,
        schema: &Value,
        temperature: f64,
    ) -> Result<Value, GatewayError>;
}
