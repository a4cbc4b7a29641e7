//! Chat backends for the supported LLM providers.
//!
//! Every adapter implements [`ChatBackend`]; [`create_backend`] picks one
//! from a [`ProviderKind`].

pub mod hosted;
pub mod ollama;

use juke_application::ports::chat_backend::{ChatBackend, GatewayError};
use juke_domain::{Message, ModelName, ProviderKind, ProvidersSettings};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

pub use hosted::HostedBackend;
pub use ollama::OllamaBackend;

/// Build the backend for `kind`.
///
/// Credentials and hosts are resolved here, so a missing API key or an
/// invalid host fails now rather than on the first request.
pub fn create_backend(
    settings: &ProvidersSettings,
    kind: ProviderKind,
    model: ModelName,
) -> Result<Arc<dyn ChatBackend>, GatewayError> {
    let backend: Arc<dyn ChatBackend> = match kind {
        ProviderKind::Ollama => Arc::new(OllamaBackend::from_settings(&settings.ollama, model)?),
        ProviderKind::Groq => Arc::new(HostedBackend::groq(&settings.groq, model)?),
        ProviderKind::OpenRouter => {
            Arc::new(HostedBackend::openrouter(&settings.openrouter, model)?)
        }
    };
    info!(
        provider = %backend.kind(),
        model = %backend.model(),
        "Chat backend created"
    );
    Ok(backend)
}

/// Build the backend for `kind` and confirm it can serve requests.
///
/// On top of [`create_backend`], this fails with
/// [`GatewayError::ConfigurationError`] when a local service is not running.
pub async fn connect_backend(
    settings: &ProvidersSettings,
    kind: ProviderKind,
    model: ModelName,
) -> Result<Arc<dyn ChatBackend>, GatewayError> {
    let backend = create_backend(settings, kind, model)?;
    backend.check_ready().await?;
    Ok(backend)
}

/// A chat message as every supported provider expects it.
#[derive(Debug, Serialize)]
pub(crate) struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

impl<'a> From<&'a Message> for WireMessage<'a> {
    fn from(message: &'a Message) -> Self {
        Self {
            role: message.role.as_str(),
            content: &message.content,
        }
    }
}

pub(crate) fn wire_messages(messages: &[Message]) -> Vec<WireMessage<'_>> {
    messages.iter().map(WireMessage::from).collect()
}

/// Shared HTTP client settings.
pub(crate) fn http_client() -> Result<reqwest::Client, GatewayError> {
    reqwest::Client::builder()
        .user_agent(concat!("juke/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| GatewayError::ConfigurationError(format!("HTTP client: {}", e)))
}

pub(crate) fn send_error(provider: ProviderKind, e: reqwest::Error) -> GatewayError {
    if e.is_connect() || e.is_timeout() {
        GatewayError::ConnectionError(format!("{}: {}", provider, e))
    } else {
        GatewayError::RequestFailed(format!("{}: {}", provider, e))
    }
}

/// Error bodies come in two shapes: `{"error": "..."}` (Ollama) and
/// `{"error": {"message": "..."}}` (OpenAI-compatible APIs).
#[derive(Deserialize)]
#[serde(untagged)]
enum ErrorBody {
    Nested { error: ErrorDetail },
    Flat { error: String },
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Turn a non-success response into [`GatewayError::ApiError`].
pub(crate) async fn api_error(response: reqwest::Response) -> GatewayError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ErrorBody>(&body) {
        Ok(ErrorBody::Nested { error }) => error.message,
        Ok(ErrorBody::Flat { error }) => error,
        Err(_) if body.trim().is_empty() => status
            .canonical_reason()
            .unwrap_or("Unknown")
            .to_string(),
        Err(_) => juke_domain::util::truncate_str(body.trim(), 200).to_string(),
    };
    GatewayError::ApiError {
        status: status.as_u16(),
        message,
    }
}
