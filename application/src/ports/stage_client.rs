//! Stage client port
//!
//! Defines how the orchestrator invokes one of the four analysis stages,
//! whether it runs as a remote service or in process.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use triage_domain::{DomainError, PipelineResults, Stage, StageOutput, TicketId};

/// Whether a failure is worth another attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Network failure, timeout, 5xx or 429; retried.
    Transient,
    /// Output did not match the expected shape; retried.
    MalformedOutput,
    /// Bad input or a non-retryable client error; fails immediately.
    Permanent,
}

impl ErrorKind {
    pub fn is_retryable(&self) -> bool {
        !matches!(self, ErrorKind::Permanent)
    }

    /// Classify an HTTP status code returned by a remote collaborator.
    pub fn from_status(status: u16) -> Self {
        match status {
            408 | 429 => ErrorKind::Transient,
            400..=499 => ErrorKind::Permanent,
            _ => ErrorKind::Transient,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::Transient => "transient",
            ErrorKind::MalformedOutput => "malformed output",
            ErrorKind::Permanent => "permanent",
        };
        write!(f, "{}", s)
    }
}

/// A failed stage invocation, tagged with its origin and retryability.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{stage} stage failed ({kind}): {message}")]
pub struct StageError {
    pub stage: Stage,
    pub kind: ErrorKind,
    pub message: String,
}

impl StageError {
    pub fn new(stage: Stage, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            stage,
            kind,
            message: message.into(),
        }
    }

    pub fn transient(stage: Stage, message: impl Into<String>) -> Self {
        Self::new(stage, ErrorKind::Transient, message)
    }

    pub fn malformed(stage: Stage, message: impl Into<String>) -> Self {
        Self::new(stage, ErrorKind::MalformedOutput, message)
    }

    pub fn permanent(stage: Stage, message: impl Into<String>) -> Self {
        Self::new(stage, ErrorKind::Permanent, message)
    }

    /// Map a domain error raised while running `stage`.
    pub fn from_domain(stage: Stage, error: DomainError) -> Self {
        let kind = if error.is_malformed_output() {
            ErrorKind::MalformedOutput
        } else {
            ErrorKind::Permanent
        };
        Self::new(stage, kind, error.to_string())
    }

    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}

/// Everything a stage may consume for one invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct StageRequest {
    pub ticket_id: TicketId,
    /// `"{subject}\n\n{body}"`
    pub text: String,
    /// Classification category, once known.
    pub category: Option<String>,
    /// Results produced earlier in the current run.
    pub prior: PipelineResults,
}

impl StageRequest {
    pub fn new(ticket_id: TicketId, text: impl Into<String>, prior: PipelineResults) -> Self {
        let category = prior.category().map(str::to_string);
        Self {
            ticket_id,
            text: text.into(),
            category,
            prior,
        }
    }
}

/// Reachability of a stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "error", rename_all = "snake_case")]
pub enum HealthStatus {
    Healthy,
    /// Reachable but reporting a problem (non-2xx or non-healthy body).
    Unhealthy,
    /// Could not be reached at all.
    Unreachable(String),
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthStatus::Healthy)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "healthy",
            HealthStatus::Unhealthy => "unhealthy",
            HealthStatus::Unreachable(_) => "unreachable",
        }
    }
}

/// Client for a single analysis stage.
///
/// Implementations live in the infrastructure layer (remote services) or
/// wrap an in-process use case.
#[async_trait]
pub trait StageClient: Send + Sync {
    /// The stage this client serves
    fn stage(&self) -> Stage;

    /// Run the stage for one ticket
    async fn invoke(&self, request: &StageRequest) -> Result<StageOutput, StageError>;

    /// Report reachability; in-process stages are always healthy
    async fn health_check(&self) -> HealthStatus {
        HealthStatus::Healthy
    }
}
