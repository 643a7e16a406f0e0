//! Shared utilities for use cases.

use serde_json::Value;
use std::fmt::Display;
use tracing::warn;
use triage_domain::{DomainError, prompt::missing_required_fields};

/// Reject structured output that lacks a field the schema requires.
pub(crate) fn check_required(value: &Value, schema: &Value) -> Result<(), DomainError> {
    let missing = missing_required_fields(value, schema);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(DomainError::MalformedOutput(format!(
            "missing required fields: {}",
            missing.join(", ")
        )))
    }
}

/// Log and swallow the failure of a best-effort side effect.
pub(crate) fn best_effort<E: Display>(what: &str, result: Result<(), E>) {
    if let Err(e) = result {
        warn!("{} failed (ignored): {}", what, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_check_required() {
        let schema = json!({"required": ["decision", "confidence"]});
        assert!(check_required(&json!({"decision": "AUTO_RESOLVE", "confidence": 1.0}), &schema).is_ok());

        let err = check_required(&json!({"decision": "AUTO_RESOLVE"}), &schema).unwrap_err();
        assert_eq!(
            err,
            DomainError::MalformedOutput("missing required fields: confidence".to_string())
        );
    }
}
