//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod engine;
mod output;
mod providers;

pub use engine::{FileConversationConfig, FileEngineConfig};
pub use output::{FileLoggingConfig, FileOutputConfig};
pub use providers::{FileHostedConfig, FileOllamaConfig, FileProvidersConfig};

use juke_domain::ProviderKind;
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Provider and model selection
    pub engine: FileEngineConfig,
    /// History sent with each request
    pub conversation: FileConversationConfig,
    /// Per-provider endpoints and credentials
    pub providers: FileProvidersConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// Conversation log settings
    pub logging: FileLoggingConfig,
}

/// A problem found in a loaded configuration. Never fatal: the affected
/// value falls back to its default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    /// Dotted path of the offending key
    pub field: String,
    pub message: String,
}

impl ConfigIssue {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl FileConfig {
    /// Validate the configuration, returning every detected issue.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if ProviderKind::parse_known(&self.engine.provider).is_none() {
            issues.push(ConfigIssue::new(
                "engine.provider",
                format!(
                    "unknown provider '{}', falling back to '{}'",
                    self.engine.provider,
                    ProviderKind::default()
                ),
            ));
        }

        if self.engine.model.trim().is_empty() {
            issues.push(ConfigIssue::new(
                "engine.model",
                format!(
                    "model name is empty, falling back to '{}'",
                    self.engine.model_name()
                ),
            ));
        }

        for (field, hosted) in [
            ("providers.groq.base_url", &self.providers.groq),
            ("providers.openrouter.base_url", &self.providers.openrouter),
        ] {
            if let Some(url) = &hosted.base_url
                && reqwest::Url::parse(url).is_err()
            {
                issues.push(ConfigIssue::new(field, format!("'{}' is not a valid URL", url)));
            }
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use juke_domain::OutputFormat;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[engine]
provider = "openrouter"
model = "openai/gpt-4o-mini"

[conversation]
max_exchanges = 5

[providers.groq]
api_key_env = "GROQ_KEY"

[output]
format = "json"
color = false

[logging]
conversation_log = "/tmp/juke.jsonl"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.engine.provider_kind(), ProviderKind::OpenRouter);
        assert_eq!(config.engine.model_name().as_str(), "openai/gpt-4o-mini");
        assert_eq!(config.conversation.max_exchanges, 5);
        assert_eq!(config.providers.groq.api_key_env.as_deref(), Some("GROQ_KEY"));
        assert_eq!(config.output.format, Some(OutputFormat::Json));
        assert!(!config.output.color);
        assert!(config.logging.conversation_log.is_some());
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_deserialize_partial_config() {
        let toml_str = r#"
[engine]
provider = "groq"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.engine.provider_kind(), ProviderKind::Groq);
        // Defaults should apply
        assert_eq!(config.engine.model, "gemma3n:e4b");
        assert_eq!(config.conversation.max_exchanges, 20);
        assert!(config.output.color);
    }

    #[test]
    fn test_validate_valid_config() {
        let config = FileConfig::default();
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_validate_reports_fallbacks() {
        let mut config = FileConfig::default();
        config.engine.provider = "anthropic".to_string();
        config.engine.model = "".to_string();
        config.providers.groq.base_url = Some("not a url".to_string());

        let issues = config.validate();
        let fields: Vec<&str> = issues.iter().map(|i| i.field.as_str()).collect();
        assert_eq!(
            fields,
            vec!["engine.provider", "engine.model", "providers.groq.base_url"]
        );
        assert!(issues[0].to_string().contains("falling back to 'ollama'"));
        assert_eq!(config.engine.provider_kind(), ProviderKind::Ollama);
    }

    #[test]
    fn test_serializes_back_to_toml() {
        let rendered = toml::to_string_pretty(&FileConfig::default()).unwrap();
        assert!(rendered.contains("[engine]"));
        assert!(rendered.contains("provider = \"ollama\""));
        assert!(rendered.contains("max_exchanges = 20"));
    }
}
