//! Provider types (provider-neutral, serde-free).
//!
//! These types describe which backend answers a request and how it should
//! sample, without depending on any wire format or config file format.

/// LLM backends juke can talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProviderKind {
    /// Local model served by Ollama.
    #[default]
    Ollama,
    /// Groq hosted API (schema hint, non-strict).
    Groq,
    /// OpenRouter hosted API (strict schema).
    OpenRouter,
}

impl ProviderKind {
    /// Resolve a provider from its configured name.
    ///
    /// Matching is case-insensitive. Unknown or empty names fall back to
    /// [`ProviderKind::Ollama`]; use [`ProviderKind::parse_known`] to detect
    /// the fallback.
    pub fn from_name(name: &str) -> Self {
        Self::parse_known(name).unwrap_or_default()
    }

    /// Like [`from_name`](Self::from_name) but without the fallback.
    pub fn parse_known(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "ollama" => Some(ProviderKind::Ollama),
            "groq" => Some(ProviderKind::Groq),
            "openrouter" => Some(ProviderKind::OpenRouter),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Ollama => "ollama",
            ProviderKind::Groq => "groq",
            ProviderKind::OpenRouter => "openrouter",
        }
    }

    pub fn all() -> [ProviderKind; 3] {
        [
            ProviderKind::Ollama,
            ProviderKind::Groq,
            ProviderKind::OpenRouter,
        ]
    }

    /// What a transport or API failure means for this provider.
    ///
    /// A local service that stops answering leaves nothing to fall back to,
    /// so its failures end the session. Hosted providers fail one request.
    pub fn failure_policy(&self) -> FailurePolicy {
        match self {
            ProviderKind::Ollama => FailurePolicy::Fatal,
            ProviderKind::Groq | ProviderKind::OpenRouter => FailurePolicy::Silent,
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the engine reacts when a provider call fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Log, skip the callback, keep going.
    Silent,
    /// Report the failure to the caller as unrecoverable.
    Fatal,
}

/// Sampling parameters sent with every request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingParams {
    pub temperature: f32,
    pub top_p: f32,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            temperature: 0.2,
            top_p: 0.9,
        }
    }
}

/// Local Ollama settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OllamaSettings {
    /// Base URL of the Ollama server. `None` reads `OLLAMA_HOST`.
    pub host: Option<String>,
}

/// Settings for an OpenAI-compatible hosted provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostedProviderSettings {
    /// Environment variable holding the API key.
    pub api_key_env: String,
    /// Direct API key (not recommended, use the env var instead).
    pub api_key: Option<String>,
    /// Base URL up to and including the API version segment.
    pub base_url: String,
}

impl HostedProviderSettings {
    pub fn groq() -> Self {
        Self {
            api_key_env: "GROQ_API_KEY".to_string(),
            api_key: None,
            base_url: "https://api.groq.com/openai/v1".to_string(),
        }
    }

    pub fn openrouter() -> Self {
        Self {
            api_key_env: "OPENROUTER_API_KEY".to_string(),
            api_key: None,
            base_url: "https://openrouter.ai/api/v1".to_string(),
        }
    }
}

/// Settings for every provider; only the selected one is used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvidersSettings {
    pub ollama: OllamaSettings,
    pub groq: HostedProviderSettings,
    pub openrouter: HostedProviderSettings,
}

impl Default for ProvidersSettings {
    fn default() -> Self {
        Self {
            ollama: OllamaSettings::default(),
            groq: HostedProviderSettings::groq(),
            openrouter: HostedProviderSettings::openrouter(),
        }
    }
}
