//! Configuration file loading for juke
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. Environment (`LLM_PROVIDER`, `MODEL_NAME`, `JUKE_*`)
//! 2. `--config <path>` specified file
//! 3. Project root: `./juke.toml` or `./.juke.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/juke/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigIssue, FileConfig, FileConversationConfig, FileEngineConfig, FileHostedConfig,
    FileLoggingConfig, FileOllamaConfig, FileOutputConfig, FileProvidersConfig,
};
pub use loader::ConfigLoader;
