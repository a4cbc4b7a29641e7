//! Chat backend port
//!
//! Defines the interface between the song engine and an LLM provider.
//! Implementations (adapters) live in the infrastructure layer.

use async_trait::async_trait;
use juke_domain::{FailurePolicy, Message, ModelName, ProviderKind, SamplingParams, SongListSchema};
use thiserror::Error;

/// Errors that can occur while talking to a provider
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),
}

impl GatewayError {
    /// Configuration errors happen at construction and never mid-request.
    pub fn is_configuration(&self) -> bool {
        matches!(self, GatewayError::ConfigurationError(_))
    }
}

/// Everything a provider needs for one completion.
///
/// `messages` is the (windowed) transcript, system message first, newest
/// user turn last.
#[derive(Debug, Clone, Copy)]
pub struct ChatRequest<'a> {
    pub messages: &'a [Message],
    pub schema: SongListSchema,
    pub sampling: SamplingParams,
}

impl<'a> ChatRequest<'a> {
    pub fn new(messages: &'a [Message]) -> Self {
        Self {
            messages,
            schema: SongListSchema,
            sampling: SamplingParams::default(),
        }
    }
}

/// Backend for chat completions with a structured answer
///
/// Adapters translate a [`ChatRequest`] into their provider's wire format,
/// enforce the song-list schema however the provider allows, and return the
/// model's raw text. Parsing and transcript bookkeeping stay in the engine.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Which provider this backend talks to.
    fn kind(&self) -> ProviderKind;

    /// Model requested from the provider.
    fn model(&self) -> &ModelName;

    /// How a failed call should be treated by the engine.
    fn failure_policy(&self) -> FailurePolicy {
        self.kind().failure_policy()
    }

    /// Confirm the provider can be used before the first request.
    ///
    /// Hosted providers are checked lazily, so the default does nothing.
    /// A local service that is not running fails here with
    /// [`GatewayError::ConfigurationError`].
    async fn check_ready(&self) -> Result<(), GatewayError> {
        Ok(())
    }

    /// Submit the transcript and return the raw assistant text.
    async fn complete(&self, request: &ChatRequest<'_>) -> Result<String, GatewayError>;
}
