//! Hosted OpenAI-compatible backends (Groq, OpenRouter)
//!
//! Both providers speak the chat-completions protocol and accept a
//! `response_format` of type `json_schema`. They differ in base URL, API key
//! variable, and whether the schema is enforced strictly: OpenRouter decodes
//! against the strict schema, Groq only takes it as a hint.

use super::{WireMessage, api_error, http_client, send_error, wire_messages};
use async_trait::async_trait;
use juke_application::ports::chat_backend::{ChatBackend, ChatRequest, GatewayError};
use juke_domain::{HostedProviderSettings, ModelName, ProviderKind, SongListSchema};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    temperature: f32,
    top_p: f32,
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
    json_schema: JsonSchemaFormat,
}

#[derive(Serialize)]
struct JsonSchemaFormat {
    name: &'static str,
    schema: Value,
    strict: bool,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

pub struct HostedBackend {
    kind: ProviderKind,
    client: reqwest::Client,
    api_key: String,
    completions_url: String,
    model: ModelName,
    strict: bool,
}

impl HostedBackend {
    /// Create a backend with explicit credentials and endpoint.
    pub fn new(
        kind: ProviderKind,
        api_key: impl Into<String>,
        base_url: &str,
        model: ModelName,
    ) -> Result<Self, GatewayError> {
        let base_url = base_url.trim().trim_end_matches('/');
        reqwest::Url::parse(base_url).map_err(|e| {
            GatewayError::ConfigurationError(format!("Invalid {} base URL '{}': {}", kind, base_url, e))
        })?;
        Ok(Self {
            kind,
            client: http_client()?,
            api_key: api_key.into(),
            completions_url: format!("{}/chat/completions", base_url),
            model,
            strict: matches!(kind, ProviderKind::OpenRouter),
        })
    }

    /// Groq: non-strict schema.
    pub fn groq(settings: &HostedProviderSettings, model: ModelName) -> Result<Self, GatewayError> {
        let key = resolve_api_key(ProviderKind::Groq, settings)?;
        Self::new(ProviderKind::Groq, key, &settings.base_url, model)
    }

    /// OpenRouter: strict schema.
    pub fn openrouter(
        settings: &HostedProviderSettings,
        model: ModelName,
    ) -> Result<Self, GatewayError> {
        let key = resolve_api_key(ProviderKind::OpenRouter, settings)?;
        Self::new(ProviderKind::OpenRouter, key, &settings.base_url, model)
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn completions_url(&self) -> &str {
        &self.completions_url
    }

    fn response_format(&self, schema: SongListSchema) -> ResponseFormat {
        ResponseFormat {
            kind: "json_schema",
            json_schema: JsonSchemaFormat {
                name: SongListSchema::NAME,
                schema: if self.strict {
                    schema.strict_json_schema()
                } else {
                    schema.json_schema()
                },
                strict: self.strict,
            },
        }
    }
}

/// Direct key in settings first, then the configured environment variable.
fn resolve_api_key(
    kind: ProviderKind,
    settings: &HostedProviderSettings,
) -> Result<String, GatewayError> {
    if let Some(key) = settings.api_key.as_deref()
        && !key.trim().is_empty()
    {
        return Ok(key.trim().to_string());
    }
    std::env::var(&settings.api_key_env)
        .ok()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .ok_or_else(|| {
            GatewayError::ConfigurationError(format!(
                "{} API key not found: set {}",
                kind, settings.api_key_env
            ))
        })
}

#[async_trait]
impl ChatBackend for HostedBackend {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    fn model(&self) -> &ModelName {
        &self.model
    }

    async fn complete(&self, request: &ChatRequest<'_>) -> Result<String, GatewayError> {
        let body = CompletionRequest {
            model: self.model.as_str(),
            messages: wire_messages(request.messages),
            temperature: request.sampling.temperature,
            top_p: request.sampling.top_p,
            response_format: self.response_format(request.schema),
        };

        debug!(
            provider = %self.kind,
            model = %self.model,
            messages = request.messages.len(),
            strict = self.strict,
            "Calling chat completions API"
        );

        let response = self
            .client
            .post(&self.completions_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| send_error(self.kind, e))?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let parsed: CompletionResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(format!("{}: {}", self.kind, e)))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.unwrap_or_default())
            .ok_or_else(|| {
                GatewayError::InvalidResponse(format!("{}: response has no choices", self.kind))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend(kind: ProviderKind) -> HostedBackend {
        HostedBackend::new(kind, "sk-test", "https://api.example.com/v1/", ModelName::default())
            .unwrap()
    }

    #[test]
    fn test_completions_url() {
        assert_eq!(
            backend(ProviderKind::Groq).completions_url(),
            "https://api.example.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_strictness_per_provider() {
        assert!(!backend(ProviderKind::Groq).is_strict());
        assert!(backend(ProviderKind::OpenRouter).is_strict());
    }

    #[test]
    fn test_response_format_shape() {
        let groq = serde_json::to_value(backend(ProviderKind::Groq).response_format(SongListSchema))
            .unwrap();
        assert_eq!(groq["type"], "json_schema");
        assert_eq!(groq["json_schema"]["name"], "songs");
        assert_eq!(groq["json_schema"]["strict"], false);
        assert_eq!(groq["json_schema"]["schema"], SongListSchema.json_schema());

        let openrouter =
            serde_json::to_value(backend(ProviderKind::OpenRouter).response_format(SongListSchema))
                .unwrap();
        assert_eq!(openrouter["json_schema"]["strict"], true);
        assert_eq!(
            openrouter["json_schema"]["schema"],
            SongListSchema.strict_json_schema()
        );
    }

    #[test]
    fn test_direct_key_wins_over_env() {
        let settings = HostedProviderSettings {
            api_key: Some("  sk-direct ".to_string()),
            api_key_env: "JUKE_TEST_UNSET_KEY".to_string(),
            ..HostedProviderSettings::groq()
        };
        assert_eq!(
            resolve_api_key(ProviderKind::Groq, &settings).unwrap(),
            "sk-direct"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let err = HostedBackend::new(ProviderKind::Groq, "k", "not a url", ModelName::default())
            .err()
            .expect("invalid url must fail");
        assert!(err.is_configuration());
    }
}
