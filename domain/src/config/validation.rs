//! Structured configuration issues.
//!
//! Configuration loaders check their values and report problems as
//! [`ConfigIssue`]s instead of failing outright, so the caller decides
//! whether a warning is acceptable.

use std::fmt;

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the pipeline cannot run with this configuration.
    Error,
    /// Non-fatal: the pipeline runs but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// A stage or gateway URL is blank.
    EmptyUrl,
    /// Knowledge search would never return a case.
    ZeroTopK,
    /// A batch run would never start a ticket.
    ZeroConcurrency,
    /// Backoff factor below 1.0 shrinks delays between retries.
    ShrinkingBackoff,
    /// Backoff factor is negative, infinite or NaN.
    InvalidBackoff,
    /// Sampling temperature outside [0, 1].
    TemperatureOutOfRange,
    /// No retries configured; transient failures abort the run.
    RetriesDisabled,
}

/// A detected issue in the loaded configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {}", level, self.message)
    }
}
