//! Knowledge stage result and its deterministic fallback.
//!
//! The knowledge stage retrieves similar historical cases and proposes a
//! solution. When model-assisted synthesis is unavailable the result is
//! derived from the top-ranked case alone (see [`KnowledgeResult::fallback`]).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Confidence of a fallback solution is the top similarity scaled by this factor...
pub const FALLBACK_SIMILARITY_FACTOR: f64 = 0.9;
/// ...and never exceeds this cap.
pub const FALLBACK_CONFIDENCE_CAP: f64 = 0.85;
/// Confidence reported when the top case carries no resolution text.
pub const UNRESOLVED_CONFIDENCE: f64 = 0.5;
/// Solution text reported when the top case carries no resolution text.
pub const NEEDS_HUMAN_REVIEW: &str =
    "Similar cases found but unable to generate solution. Requires human review.";

/// A historical case returned by similarity search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarCase {
    pub id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub metadata: BTreeMap<String, Value>,
    /// Normalized closeness to the query, `1 - distance`.
    #[serde(default)]
    pub similarity: f64,
}

impl SimilarCase {
    pub fn new(id: impl Into<String>, text: impl Into<String>, similarity: f64) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            metadata: BTreeMap::new(),
            similarity,
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Stored resolution text, if any non-blank one exists.
    pub fn resolution(&self) -> Option<&str> {
        self.metadata
            .get("resolution")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn category(&self) -> Option<&str> {
        self.metadata.get("category").and_then(Value::as_str)
    }
}

/// Structured output expected from model-assisted solution synthesis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolutionProposal {
    pub solution: String,
    pub confidence: f64,
    pub solvable_without_escalation: bool,
    #[serde(default)]
    pub reasoning: Option<String>,
}

/// Result of the knowledge stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeResult {
    #[serde(default)]
    pub similar_cases_found: usize,
    #[serde(default, alias = "top_match_case_id")]
    pub top_match_id: Option<String>,
    #[serde(default)]
    pub similarity_score: Option<f64>,
    #[serde(default)]
    pub solution: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub solvable_without_escalation: bool,
    /// Retrieved cases, ranked descending by similarity.
    #[serde(default)]
    pub similar_cases: Vec<SimilarCase>,
}

impl KnowledgeResult {
    /// Result when retrieval found nothing.
    pub fn no_matches() -> Self {
        Self {
            similar_cases_found: 0,
            top_match_id: None,
            similarity_score: None,
            solution: None,
            confidence: Some(0.0),
            solvable_without_escalation: false,
            similar_cases: Vec::new(),
        }
    }

    /// Result built from a synthesized solution over `cases`.
    pub fn synthesized(cases: Vec<SimilarCase>, proposal: SolutionProposal) -> Self {
        Self::with_cases(
            cases,
            Some(proposal.solution),
            proposal.confidence,
            proposal.solvable_without_escalation,
        )
    }

    /// Deterministic result when synthesis failed.
    ///
    /// Uses the top-ranked case: its resolution text with confidence
    /// `min(similarity * 0.9, 0.85)` if it has one, otherwise a
    /// "needs human review" message with confidence 0.5.
    pub fn fallback(cases: Vec<SimilarCase>) -> Self {
        let Some(top) = cases.first() else {
            return Self::no_matches();
        };

        match top.resolution() {
            Some(resolution) => {
                let confidence =
                    (top.similarity * FALLBACK_SIMILARITY_FACTOR).min(FALLBACK_CONFIDENCE_CAP);
                let solution = resolution.to_string();
                Self::with_cases(cases, Some(solution), confidence, true)
            }
            None => Self::with_cases(
                cases,
                Some(NEEDS_HUMAN_REVIEW.to_string()),
                UNRESOLVED_CONFIDENCE,
                false,
            ),
        }
    }

    fn with_cases(
        cases: Vec<SimilarCase>,
        solution: Option<String>,
        confidence: f64,
        solvable_without_escalation: bool,
    ) -> Self {
        let top = cases.first();
        Self {
            similar_cases_found: cases.len(),
            top_match_id: top.map(|c| c.id.clone()),
            similarity_score: top.map(|c| c.similarity),
            solution,
            confidence: Some(confidence),
            solvable_without_escalation,
            similar_cases: cases,
        }
    }

    pub fn has_solution(&self) -> bool {
        self.solution.as_deref().is_some_and(|s| !s.trim().is_empty())
    }

    pub fn confidence_or_zero(&self) -> f64 {
        self.confidence.unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolved_case(id: &str, similarity: f64) -> SimilarCase {
        SimilarCase::new(id, "I was charged twice", similarity)
            .with_metadata("category", "BILLING")
            .with_metadata("resolution", "Refund the duplicate charge")
    }

    #[test]
    fn test_no_matches() {
        let result = KnowledgeResult::no_matches();
        assert_eq!(result.similar_cases_found, 0);
        assert_eq!(result.solution, None);
        assert_eq!(result.confidence, Some(0.0));
        assert!(!result.solvable_without_escalation);
    }

    #[test]
    fn test_fallback_uses_top_resolution() {
        let cases = vec![resolved_case("case-1", 0.8), resolved_case("case-2", 0.6)];
        let result = KnowledgeResult::fallback(cases);

        assert_eq!(result.solution.as_deref(), Some("Refund the duplicate charge"));
        assert!((result.confidence.unwrap() - 0.72).abs() < 1e-9);
        assert!(result.solvable_without_escalation);
        assert_eq!(result.similar_cases_found, 2);
        assert_eq!(result.top_match_id.as_deref(), Some("case-1"));
        assert_eq!(result.similarity_score, Some(0.8));
    }

    #[test]
    fn test_fallback_confidence_is_capped() {
        let result = KnowledgeResult::fallback(vec![resolved_case("case-1", 0.99)]);
        assert_eq!(result.confidence, Some(FALLBACK_CONFIDENCE_CAP));
    }

    #[test]
    fn test_fallback_without_resolution_needs_review() {
        let case = SimilarCase::new("case-9", "Strange noise from device", 0.7)
            .with_metadata("resolution", "   ");
        let result = KnowledgeResult::fallback(vec![case]);

        assert_eq!(result.solution.as_deref(), Some(NEEDS_HUMAN_REVIEW));
        assert_eq!(result.confidence, Some(UNRESOLVED_CONFIDENCE));
        assert!(!result.solvable_without_escalation);
    }

    #[test]
    fn test_wire_alias_for_top_match() {
        let result: KnowledgeResult =
            serde_json::from_str(r#"{"top_match_case_id": "kb-7", "similar_cases_found": 3}"#)
                .unwrap();
        assert_eq!(result.top_match_id.as_deref(), Some("kb-7"));
        assert_eq!(result.similar_cases_found, 3);
        assert!(!result.solvable_without_escalation);
    }
}
