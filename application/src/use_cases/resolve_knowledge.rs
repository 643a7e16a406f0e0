//! Resolve Knowledge use case
//!
//! Retrieves similar historical cases and proposes a solution. Solution
//! synthesis is best effort: any gateway or shape failure degrades to the
//! deterministic [`KnowledgeResult::fallback`] instead of failing the stage.

use crate::ports::llm_gateway::{GatewayError, LlmGateway};
use crate::ports::vector_store::{VectorStore, VectorStoreError, category_filter};
use crate::use_cases::shared::check_required;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};
use triage_domain::{
    DomainError, KnowledgeResult, PromptTemplate, SimilarCase, SolutionProposal, from_value,
};

/// Errors that can occur while resolving knowledge
///
/// Only retrieval failures surface; synthesis failures never do.
#[derive(Error, Debug)]
pub enum ResolveKnowledgeError {
    #[error("Similarity search failed: {0}")]
    Search(#[from] VectorStoreError),
}

/// Why synthesis fell back to the top-ranked case
#[derive(Error, Debug)]
enum SynthesisError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Shape(#[from] DomainError),
}

/// Input for the ResolveKnowledge use case
#[derive(Debug, Clone)]
pub struct ResolveKnowledgeInput {
    pub ticket_text: String,
    pub category: Option<String>,
    pub top_k: usize,
}

impl ResolveKnowledgeInput {
    pub fn new(ticket_text: impl Into<String>) -> Self {
        Self {
            ticket_text: ticket_text.into(),
            category: None,
            top_k: 5,
        }
    }

    pub fn with_category(mut self, category: Option<impl Into<String>>) -> Self {
        self.category = category.map(Into::into);
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }
}

/// Use case for finding a knowledge-base solution
pub struct ResolveKnowledgeUseCase {
    store: Arc<dyn VectorStore>,
    gateway: Arc<dyn LlmGateway>,
    temperature: f64,
}

impl ResolveKnowledgeUseCase {
    pub fn new(store: Arc<dyn VectorStore>, gateway: Arc<dyn LlmGateway>, temperature: f64) -> Self {
        Self {
            store,
            gateway,
            temperature,
        }
    }

    pub async fn execute(
        &self,
        input: ResolveKnowledgeInput,
    ) -> Result<KnowledgeResult, ResolveKnowledgeError> {
        let filter = input.category.as_deref().map(category_filter);
        let cases = self
            .store
            .search(&input.ticket_text, input.top_k, filter.as_ref())
            .await?;

        if cases.is_empty() {
            info!("No similar cases found");
            return Ok(KnowledgeResult::no_matches());
        }
        debug!("Found {} similar cases", cases.len());

        match self
            .synthesize(&input.ticket_text, &cases, input.category.as_deref())
            .await
        {
            Ok(proposal) => Ok(KnowledgeResult::synthesized(cases, proposal)),
            Err(e) => {
                warn!(
                    "Solution adaptation failed: {}. Using top match resolution as fallback.",
                    e
                );
                Ok(KnowledgeResult::fallback(cases))
            }
        }
    }

    async fn synthesize(
        &self,
        ticket_text: &str,
        cases: &[SimilarCase],
        category: Option<&str>,
    ) -> Result<SolutionProposal, SynthesisError> {
        let prompt = PromptTemplate::solution_prompt(ticket_text, cases, category);
        let schema = PromptTemplate::solution_schema();

        let value = self
            .gateway
            .generate_structured(&prompt, &schema, self.temperature)
            .await?;
        check_required(&value, &schema)?;
        Ok(from_value(value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::{MockGateway, MockVectorStore, billing_case};
    use serde_json::json;

    fn use_case(store: MockVectorStore, gateway: MockGateway) -> ResolveKnowledgeUseCase {
        ResolveKnowledgeUseCase::new(Arc::new(store), Arc::new(gateway), 0.3)
    }

    #[tokio::test]
    async fn test_no_cases_returns_empty_result() {
        let gateway = MockGateway::new(vec![]);
        let uc = use_case(MockVectorStore::new(vec![]), gateway);

        let result = uc
            .execute(ResolveKnowledgeInput::new("Where is my invoice?"))
            .await
            .unwrap();

        assert_eq!(result.solution, None);
        assert_eq!(result.confidence, Some(0.0));
        assert!(!result.solvable_without_escalation);
    }

    #[tokio::test]
    async fn test_synthesized_solution() {
        let gateway = MockGateway::new(vec![Ok(json!({
            "solution": "Refund the duplicate charge and apologise",
            "confidence": 0.88,
            "solvable_without_escalation": true,
            "reasoning": "Matches a common case"
        }))]);
        let uc = ResolveKnowledgeUseCase::new(
            Arc::new(MockVectorStore::new(vec![billing_case("kb-1", 0.9)])),
            Arc::new(gateway),
            0.3,
        );

        let result = uc
            .execute(ResolveKnowledgeInput::new("Charged twice").with_category(Some("BILLING")))
            .await
            .unwrap();

        assert_eq!(
            result.solution.as_deref(),
            Some("Refund the duplicate charge and apologise")
        );
        assert_eq!(result.confidence, Some(0.88));
        assert_eq!(result.top_match_id.as_deref(), Some("kb-1"));
        assert_eq!(result.similar_cases_found, 1);
    }

    #[tokio::test]
    async fn test_gateway_failure_falls_back_to_top_case() {
        let gateway = MockGateway::new(vec![Err(GatewayError::Timeout)]);
        let uc = use_case(
            MockVectorStore::new(vec![billing_case("kb-1", 0.8), billing_case("kb-2", 0.4)]),
            gateway,
        );

        let result = uc.execute(ResolveKnowledgeInput::new("Charged twice")).await.unwrap();

        assert_eq!(result.solution.as_deref(), Some("Refund the duplicate charge"));
        assert!((result.confidence.unwrap() - 0.72).abs() < 1e-9);
        assert!(result.solvable_without_escalation);
    }

    #[tokio::test]
    async fn test_malformed_synthesis_falls_back() {
        let gateway = MockGateway::new(vec![Ok(json!({"solution": "Try again"}))]);
        let uc = use_case(MockVectorStore::new(vec![billing_case("kb-1", 0.99)]), gateway);

        let result = uc.execute(ResolveKnowledgeInput::new("Charged twice")).await.unwrap();

        assert_eq!(result.solution.as_deref(), Some("Refund the duplicate charge"));
        assert_eq!(result.confidence, Some(0.85));
    }

    #[tokio::test]
    async fn test_category_is_passed_as_filter() {
        let store = Arc::new(MockVectorStore::new(vec![]));
        let uc = ResolveKnowledgeUseCase::new(store.clone(), Arc::new(MockGateway::new(vec![])), 0.3);

        uc.execute(ResolveKnowledgeInput::new("text").with_category(Some("ACCOUNT")))
            .await
            .unwrap();

        let filters = store.filters.lock().unwrap();
        assert_eq!(
            filters[0].as_ref().and_then(|f| f.get("category")).map(String::as_str),
            Some("ACCOUNT")
        );
    }

    #[tokio::test]
    async fn test_search_failure_propagates() {
        let uc = use_case(MockVectorStore::unavailable(), MockGateway::new(vec![]));
        let err = uc.execute(ResolveKnowledgeInput::new("text")).await.unwrap_err();
        assert!(matches!(err, ResolveKnowledgeError::Search(_)));
    }
}
