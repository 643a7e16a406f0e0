//! Configuration file loading for ticket-triage
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `TRIAGE_*` environment variables (nested keys separated by `__`)
//! 2. `--config <path>` specified file
//! 3. Project root: `./triage.toml`
//! 4. Global: `$XDG_CONFIG_HOME/ticket-triage/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    FileBatchConfig, FileConfig, FileKnowledgeConfig, FileLlmConfig, FileLoggingConfig, FileNotificationsConfig,
    FileOutputConfig, FileRetryConfig, FileStagesConfig,
};
pub use loader::ConfigLoader;
