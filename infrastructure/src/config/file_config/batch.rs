//! Batch processing configuration from TOML (`[batch]` section)

use serde::{Deserialize, Serialize};

/// Raw batch configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBatchConfig {
    /// Tickets run through the pipeline at the same time
    pub concurrency: usize,
}

impl Default for FileBatchConfig {
    fn default() -> Self {
        Self { concurrency: 4 }
    }
}
