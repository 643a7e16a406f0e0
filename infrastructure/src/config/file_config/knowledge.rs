//! Knowledge base configuration from TOML (`[knowledge]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw knowledge base configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileKnowledgeConfig {
    /// Number of similar cases retrieved per ticket
    pub top_k: usize,
    /// JSON file of resolved cases loaded into the vector store at startup
    pub seed_file: Option<PathBuf>,
}

impl Default for FileKnowledgeConfig {
    fn default() -> Self {
        Self {
            top_k: 5,
            seed_file: None,
        }
    }
}
