//! Local Ollama backend
//!
//! Talks to `POST {host}/api/chat` with streaming disabled. The song-list
//! schema goes in the `format` field, which Ollama uses to constrain
//! decoding.

use super::{WireMessage, api_error, http_client, send_error, wire_messages};
use async_trait::async_trait;
use juke_application::ports::chat_backend::{ChatBackend, ChatRequest, GatewayError};
use juke_domain::{ModelName, OllamaSettings, ProviderKind};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Environment variable Ollama itself uses for its listen address.
pub const OLLAMA_HOST_ENV: &str = "OLLAMA_HOST";

pub const DEFAULT_OLLAMA_HOST: &str = "http://127.0.0.1:11434";

/// Limit for the start-up reachability check; the chat call itself has no timeout.
const READY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    stream: bool,
    format: Value,
    options: OllamaOptions,
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: f32,
    top_p: f32,
}

#[derive(Deserialize)]
struct OllamaChatResponse {
    message: Option<OllamaMessage>,
}

#[derive(Deserialize)]
struct OllamaMessage {
    #[serde(default)]
    content: String,
}

#[derive(Deserialize)]
struct OllamaVersion {
    #[serde(default)]
    version: String,
}

pub struct OllamaBackend {
    client: reqwest::Client,
    chat_url: Url,
    version_url: Url,
    model: ModelName,
}

impl OllamaBackend {
    /// Create a backend for the server at `host`.
    ///
    /// A host without a scheme (`localhost:11434`, the form `OLLAMA_HOST`
    /// often takes) is treated as plain HTTP.
    pub fn new(host: &str, model: ModelName) -> Result<Self, GatewayError> {
        let chat_url = endpoint(host, "api/chat")?;
        let version_url = endpoint(host, "api/version")?;
        debug!("Ollama chat endpoint: {}", chat_url);
        Ok(Self {
            client: http_client()?,
            chat_url,
            version_url,
            model,
        })
    }

    /// Resolve the host from settings, then `OLLAMA_HOST`, then the default.
    pub fn from_settings(settings: &OllamaSettings, model: ModelName) -> Result<Self, GatewayError> {
        let host = settings
            .host
            .clone()
            .filter(|h| !h.trim().is_empty())
            .or_else(|| std::env::var(OLLAMA_HOST_ENV).ok().filter(|h| !h.trim().is_empty()))
            .unwrap_or_else(|| DEFAULT_OLLAMA_HOST.to_string());
        Self::new(&host, model)
    }

    pub fn chat_url(&self) -> &Url {
        &self.chat_url
    }
}

fn endpoint(host: &str, path: &str) -> Result<Url, GatewayError> {
    let host = host.trim().trim_end_matches('/');
    let with_scheme = if host.contains("://") {
        host.to_string()
    } else {
        format!("http://{}", host)
    };
    let base = Url::parse(&with_scheme)
        .map_err(|e| GatewayError::ConfigurationError(format!("Invalid Ollama host '{}': {}", host, e)))?;
    if !matches!(base.scheme(), "http" | "https") {
        return Err(GatewayError::ConfigurationError(format!(
            "Invalid Ollama host '{}': unsupported scheme {}",
            host,
            base.scheme()
        )));
    }
    Url::parse(&format!("{}/{}", with_scheme, path))
        .map_err(|e| GatewayError::ConfigurationError(format!("Invalid Ollama host '{}': {}", host, e)))
}

#[async_trait]
impl ChatBackend for OllamaBackend {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Ollama
    }

    fn model(&self) -> &ModelName {
        &self.model
    }

    async fn check_ready(&self) -> Result<(), GatewayError> {
        let unreachable = |reason: String| {
            GatewayError::ConfigurationError(format!(
                "Ollama is not reachable at {}: {}",
                self.version_url, reason
            ))
        };

        let response = self
            .client
            .get(self.version_url.clone())
            .timeout(READY_TIMEOUT)
            .send()
            .await
            .map_err(|e| unreachable(e.to_string()))?;
        if !response.status().is_success() {
            return Err(unreachable(format!("HTTP {}", response.status())));
        }

        let version = response
            .json::<OllamaVersion>()
            .await
            .map(|v| v.version)
            .unwrap_or_default();
        debug!("Ollama server ready (version {})", version);
        Ok(())
    }

    async fn complete(&self, request: &ChatRequest<'_>) -> Result<String, GatewayError> {
        let body = OllamaChatRequest {
            model: self.model.as_str(),
            messages: wire_messages(request.messages),
            stream: false,
            format: request.schema.json_schema(),
            options: OllamaOptions {
                temperature: request.sampling.temperature,
                top_p: request.sampling.top_p,
            },
        };

        debug!(
            model = %self.model,
            messages = request.messages.len(),
            "Calling Ollama chat API"
        );

        let response = self
            .client
            .post(self.chat_url.clone())
            .json(&body)
            .send()
            .await
            .map_err(|e| send_error(ProviderKind::Ollama, e))?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let parsed: OllamaChatResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(format!("Ollama: {}", e)))?;

        parsed
            .message
            .map(|m| m.content)
            .ok_or_else(|| GatewayError::InvalidResponse("Ollama: response has no message".to_string()))
    }
}
