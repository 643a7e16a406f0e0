//! Knowledge base seeding from a JSON file of resolved cases.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;
use tracing::info;
use triage_application::{VectorStore, VectorStoreError};

#[derive(Error, Debug)]
pub enum SeedError {
    #[error("Failed to read seed file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid seed file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Store(#[from] VectorStoreError),
}

/// A resolved support case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedCase {
    /// Explicit case id; generated from the position when absent
    #[serde(default)]
    pub id: Option<String>,
    pub category: String,
    #[serde(default)]
    pub subcategory: Option<String>,
    pub issue: String,
    pub resolution: String,
    /// Customer satisfaction score, 1-10
    #[serde(default)]
    pub satisfaction: Option<u8>,
}

impl SeedCase {
    /// Indexed text: the issue followed by its resolution.
    pub fn text(&self) -> String {
        format!("{}\n\nResolution: {}", self.issue, self.resolution)
    }

    fn metadata(&self, case_id: &str) -> BTreeMap<String, Value> {
        let mut metadata = BTreeMap::from([
            ("case_id".to_string(), json!(case_id)),
            ("category".to_string(), json!(self.category)),
            ("issue".to_string(), json!(self.issue)),
            ("resolution".to_string(), json!(self.resolution)),
        ]);
        if let Some(subcategory) = &self.subcategory {
            metadata.insert("subcategory".to_string(), json!(subcategory));
        }
        if let Some(satisfaction) = self.satisfaction {
            metadata.insert("satisfaction".to_string(), json!(satisfaction));
        }
        metadata
    }
}

pub fn load_seed_file(path: &Path) -> Result<Vec<SeedCase>, SeedError> {
    let display = path.display().to_string();
    let content = std::fs::read_to_string(path).map_err(|source| SeedError::Read {
        path: display.clone(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| SeedError::Parse {
        path: display,
        source,
    })
}

/// Add every case to `store`; returns the number of cases added.
pub async fn seed_store(store: &dyn VectorStore, cases: &[SeedCase]) -> Result<usize, SeedError> {
    for (i, case) in cases.iter().enumerate() {
        let case_id = case
            .id
            .clone()
            .unwrap_or_else(|| format!("CASE_{:04}", i + 1));
        store.add(&case_id, &case.text(), case.metadata(&case_id)).await?;
    }
    info!("Seeded knowledge base with {} cases", cases.len());
    Ok(cases.len())
}
