//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Invalid ticket: {0}")]
    InvalidTicket(String),

    #[error("Unknown {kind} value: {value}")]
    UnknownValue { kind: &'static str, value: String },

    #[error("Stage {stage} requires the {missing} result of the current run")]
    MissingStageInput {
        stage: &'static str,
        missing: &'static str,
    },

    #[error("Malformed structured output: {0}")]
    MalformedOutput(String),
}

impl DomainError {
    pub fn unknown(kind: &'static str, value: impl Into<String>) -> Self {
        DomainError::UnknownValue {
            kind,
            value: value.into(),
        }
    }

    /// Check if this error describes output a collaborator failed to shape correctly
    pub fn is_malformed_output(&self) -> bool {
        matches!(
            self,
            DomainError::MalformedOutput(_) | DomainError::UnknownValue { .. }
        )
    }
}
