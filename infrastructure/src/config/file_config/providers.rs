//! Provider configuration from TOML (`[providers]` section)

use juke_domain::{HostedProviderSettings, OllamaSettings, ProvidersSettings};
use serde::{Deserialize, Serialize};

/// Local Ollama configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOllamaConfig {
    /// Server URL (default: `OLLAMA_HOST`, then http://127.0.0.1:11434).
    pub host: Option<String>,
}

/// Hosted OpenAI-compatible provider configuration.
///
/// Unset fields keep the provider's built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileHostedConfig {
    /// Environment variable name for the API key.
    pub api_key_env: Option<String>,
    /// Direct API key (not recommended, use the env var instead).
    pub api_key: Option<String>,
    /// Base URL up to the API version segment.
    pub base_url: Option<String>,
}

impl FileHostedConfig {
    fn apply(&self, mut settings: HostedProviderSettings) -> HostedProviderSettings {
        if let Some(env) = &self.api_key_env {
            settings.api_key_env = env.clone();
        }
        if self.api_key.is_some() {
            settings.api_key = self.api_key.clone();
        }
        if let Some(url) = &self.base_url {
            settings.base_url = url.clone();
        }
        settings
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProvidersConfig {
    pub ollama: FileOllamaConfig,
    pub groq: FileHostedConfig,
    pub openrouter: FileHostedConfig,
}

impl FileProvidersConfig {
    pub fn to_settings(&self) -> ProvidersSettings {
        ProvidersSettings {
            ollama: OllamaSettings {
                host: self.ollama.host.clone(),
            },
            groq: self.groq.apply(HostedProviderSettings::groq()),
            openrouter: self.openrouter.apply(HostedProviderSettings::openrouter()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_section_keeps_defaults() {
        let settings = FileProvidersConfig::default().to_settings();
        assert_eq!(settings, ProvidersSettings::default());
    }

    #[test]
    fn test_partial_override() {
        let toml_str = r#"
[providers.ollama]
host = "http://gpu-box:11434"

[providers.openrouter]
api_key_env = "MY_OPENROUTER_KEY"
"#;
        let config: super::super::FileConfig = toml::from_str(toml_str).unwrap();
        let settings = config.providers.to_settings();

        assert_eq!(settings.ollama.host.as_deref(), Some("http://gpu-box:11434"));
        assert_eq!(settings.openrouter.api_key_env, "MY_OPENROUTER_KEY");
        assert_eq!(settings.openrouter.base_url, "https://openrouter.ai/api/v1");
        assert_eq!(settings.groq, HostedProviderSettings::groq());
    }
}
