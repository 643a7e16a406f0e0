//! Output format value object

use serde::{Deserialize, Serialize};

/// How a processing result is rendered for the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Every stage result plus the outcome
    Full,
    /// Outcome line with decision, priority and solution (default)
    Summary,
    /// JSON output
    Json,
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::Summary
    }
}
