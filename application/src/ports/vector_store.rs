//! Vector store port
//!
//! Similarity search over historical support cases.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;
use triage_domain::SimilarCase;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum VectorStoreError {
    #[error("Vector store unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid case: {0}")]
    InvalidCase(String),
}

/// Exact-match metadata filter applied before ranking.
pub type MetadataFilter = BTreeMap<String, String>;

#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Up to `top_k` cases ranked descending by similarity (`1 - distance`).
    async fn search(
        &self,
        query: &str,
        top_k: usize,
        filter: Option<&MetadataFilter>,
    ) -> Result<Vec<SimilarCase>, VectorStoreError>;

    /// Ingest a case.
    async fn add(
        &self,
        id: &str,
        text: &str,
        metadata: BTreeMap<String, Value>,
    ) -> Result<(), VectorStoreError>;

    async fn count(&self) -> Result<usize, VectorStoreError>;
}

/// Filter on the `category` metadata key.
pub fn category_filter(category: &str) -> MetadataFilter {
    MetadataFilter::from([("category".to_string(), category.to_string())])
}
