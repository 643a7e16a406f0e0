//! Token-frequency cosine similarity over an in-memory case list.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;
use triage_application::{MetadataFilter, VectorStore, VectorStoreError};
use triage_domain::SimilarCase;

struct StoredCase {
    id: String,
    text: String,
    metadata: BTreeMap<String, Value>,
    terms: HashMap<String, f64>,
}

/// Bag-of-words vector store.
///
/// Similarity is `1 - cosine distance` between term-frequency vectors, so it
/// lies in `[0, 1]`. Cases with equal similarity keep insertion order.
#[derive(Default)]
pub struct InMemoryVectorStore {
    cases: RwLock<Vec<StoredCase>>,
}

impl InMemoryVectorStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Vec<StoredCase>>, VectorStoreError> {
        self.cases
            .read()
            .map_err(|_| VectorStoreError::Unavailable("case index lock poisoned".to_string()))
    }
}

fn term_frequencies(text: &str) -> HashMap<String, f64> {
    let mut terms = HashMap::new();
    for token in text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
    {
        *terms.entry(token.to_lowercase()).or_insert(0.0) += 1.0;
    }
    terms
}

fn cosine(a: &HashMap<String, f64>, b: &HashMap<String, f64>) -> f64 {
    let dot: f64 = a
        .iter()
        .filter_map(|(term, x)| b.get(term).map(|y| x * y))
        .sum();
    let norm = |v: &HashMap<String, f64>| v.values().map(|x| x * x).sum::<f64>().sqrt();
    let denom = norm(a) * norm(b);
    if denom == 0.0 { 0.0 } else { (dot / denom).clamp(0.0, 1.0) }
}

fn matches_filter(metadata: &BTreeMap<String, Value>, filter: &MetadataFilter) -> bool {
    filter.iter().all(|(key, expected)| match metadata.get(key) {
        Some(Value::String(actual)) => actual == expected,
        Some(other) => other.to_string() == *expected,
        None => false,
    })
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn search(
        &self,
        query: &str,
        top_k: usize,
        filter: Option<&MetadataFilter>,
    ) -> Result<Vec<SimilarCase>, VectorStoreError> {
        let query_terms = term_frequencies(query);
        let cases = self.read()?;

        let mut ranked: Vec<(f64, &StoredCase)> = cases
            .iter()
            .filter(|case| filter.is_none_or(|f| matches_filter(&case.metadata, f)))
            .map(|case| {
                let distance = 1.0 - cosine(&query_terms, &case.terms);
                (1.0 - distance, case)
            })
            .collect();
        ranked.sort_by(|a, b| b.0.total_cmp(&a.0));

        Ok(ranked
            .into_iter()
            .take(top_k)
            .map(|(similarity, case)| SimilarCase {
                id: case.id.clone(),
                text: case.text.clone(),
                metadata: case.metadata.clone(),
                similarity,
            })
            .collect())
    }

    async fn add(
        &self,
        id: &str,
        text: &str,
        metadata: BTreeMap<String, Value>,
    ) -> Result<(), VectorStoreError> {
        if id.trim().is_empty() {
            return Err(VectorStoreError::InvalidCase("case id cannot be empty".to_string()));
        }

        let case = StoredCase {
            id: id.to_string(),
            text: text.to_string(),
            terms: term_frequencies(text),
            metadata,
        };

        let mut cases = self
            .cases
            .write()
            .map_err(|_| VectorStoreError::Unavailable("case index lock poisoned".to_string()))?;
        match cases.iter_mut().find(|c| c.id == id) {
            Some(existing) => *existing = case,
            None => cases.push(case),
        }
        Ok(())
    }

    async fn count(&self) -> Result<usize, VectorStoreError> {
        Ok(self.read()?.len())
    }
}
