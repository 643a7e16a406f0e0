//! Classification (routing) stage result

use serde::{Deserialize, Serialize};

/// Category used when the classifier gives none.
pub const CATEGORY_OTHER: &str = "OTHER";

/// Category that always requires engineering review.
pub const CATEGORY_BUG: &str = "BUG";

/// Category assigned to a ticket by the classification stage.
///
/// `category` is an enum-like upper-case string (`BILLING`, `ACCOUNT`, `BUG`, ...);
/// the set is owned by the classification service, not by the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub subcategory: Option<String>,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub reason: Option<String>,
}

fn default_category() -> String {
    CATEGORY_OTHER.to_string()
}

impl ClassificationResult {
    pub fn new(category: impl Into<String>, confidence: f64) -> Self {
        Self {
            category: category.into(),
            subcategory: None,
            confidence,
            reason: None,
        }
    }

    pub fn with_subcategory(mut self, subcategory: impl Into<String>) -> Self {
        self.subcategory = Some(subcategory.into());
        self
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn is_bug(&self) -> bool {
        self.category == CATEGORY_BUG
    }

    /// Category to use as a knowledge-search filter, if it is meaningful.
    pub fn category_filter(&self) -> Option<&str> {
        let category = self.category.trim();
        if category.is_empty() {
            None
        } else {
            Some(category)
        }
    }
}
