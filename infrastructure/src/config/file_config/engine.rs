//! Engine configuration from TOML (`[engine]` and `[conversation]` sections)

use juke_domain::{DEFAULT_MAX_EXCHANGES, DEFAULT_MODEL, HistoryWindow, ModelName, ProviderKind};
use serde::{Deserialize, Serialize};

/// Raw engine configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileEngineConfig {
    /// Provider name: "ollama", "groq" or "openrouter"
    pub provider: String,
    /// Model name passed to the provider
    pub model: String,
}

impl Default for FileEngineConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default().as_str().to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl FileEngineConfig {
    /// Unknown names resolve to Ollama.
    pub fn provider_kind(&self) -> ProviderKind {
        ProviderKind::from_name(&self.provider)
    }

    /// A blank model name resolves to the default model.
    pub fn model_name(&self) -> ModelName {
        ModelName::new(self.model.as_str()).unwrap_or_default()
    }
}

/// Raw conversation configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConversationConfig {
    /// Past exchanges sent with each request (0 = all)
    pub max_exchanges: usize,
}

impl Default for FileConversationConfig {
    fn default() -> Self {
        Self {
            max_exchanges: DEFAULT_MAX_EXCHANGES,
        }
    }
}

impl FileConversationConfig {
    pub fn history_window(&self) -> HistoryWindow {
        HistoryWindow::new(self.max_exchanges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_defaults() {
        let config = FileEngineConfig::default();
        assert_eq!(config.provider_kind(), ProviderKind::Ollama);
        assert_eq!(config.model_name().as_str(), "gemma3n:e4b");
    }

    #[test]
    fn test_blank_model_falls_back() {
        let config = FileEngineConfig {
            provider: "groq".to_string(),
            model: "  ".to_string(),
        };
        assert_eq!(config.provider_kind(), ProviderKind::Groq);
        assert_eq!(config.model_name(), ModelName::default());
    }

    #[test]
    fn test_zero_exchanges_is_unbounded() {
        let config = FileConversationConfig { max_exchanges: 0 };
        assert!(config.history_window().is_unbounded());
        assert_eq!(
            FileConversationConfig::default().history_window(),
            HistoryWindow::default()
        );
    }
}
