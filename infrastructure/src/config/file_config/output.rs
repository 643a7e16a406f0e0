//! Console output configuration from TOML (`[output]` section)

use serde::{Deserialize, Serialize};
use triage_domain::OutputFormat;

/// Raw output configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// How processing results are rendered; the CLI `-o` flag wins
    pub format: Option<OutputFormat>,
    pub color: bool,
    /// Tickets listed after a batch run. 0 skips the listing.
    pub ticket_list_limit: usize,
    /// Print each processed ticket's stored record after a batch run
    pub ticket_details: bool,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            format: None,
            color: true,
            ticket_list_limit: 20,
            ticket_details: false,
        }
    }
}
