//! Port for the machine-readable conversation log.
//!
//! The engine reports each exchange as a typed [`ConversationEvent`]; an
//! adapter decides how to persist it. Diagnostic output stays with
//! `tracing`.

use crate::ports::chat_backend::GatewayError;
use juke_domain::{ModelName, ProviderKind, Song, SuggestedSong};

/// One step of a song request, borrowed from the engine while it holds the
/// transcript lock.
#[derive(Debug, Clone, Copy)]
pub enum ConversationEvent<'a> {
    /// The user turn was appended and is about to be sent.
    Prompt {
        provider: ProviderKind,
        model: &'a ModelName,
        request: &'a str,
        current_song: Option<&'a Song>,
        prompt: &'a str,
    },
    /// The provider answered; `songs` is what could be read from `raw`.
    Response {
        provider: ProviderKind,
        model: &'a ModelName,
        raw: &'a str,
        songs: &'a [SuggestedSong],
    },
    /// The provider call failed.
    Failure {
        provider: ProviderKind,
        model: &'a ModelName,
        error: &'a GatewayError,
        fatal: bool,
    },
}

impl ConversationEvent<'_> {
    pub fn event_type(&self) -> &'static str {
        match self {
            ConversationEvent::Prompt { .. } => "prompt",
            ConversationEvent::Response { .. } => "llm_response",
            ConversationEvent::Failure { .. } => "llm_error",
        }
    }

    pub fn provider(&self) -> ProviderKind {
        match self {
            ConversationEvent::Prompt { provider, .. }
            | ConversationEvent::Response { provider, .. }
            | ConversationEvent::Failure { provider, .. } => *provider,
        }
    }
}

/// Sink for conversation events.
///
/// `log` is synchronous and infallible: a broken log never fails a request.
pub trait ConversationLogger: Send + Sync {
    fn log(&self, event: &ConversationEvent<'_>);
}

/// Logger used when no conversation log is configured.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: &ConversationEvent<'_>) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_types() {
        let model = ModelName::default();
        let error = GatewayError::ConnectionError("refused".to_string());
        let events = [
            ConversationEvent::Prompt {
                provider: ProviderKind::Groq,
                model: &model,
                request: "jazz",
                current_song: None,
                prompt: "Suggest jazz",
            },
            ConversationEvent::Response {
                provider: ProviderKind::Groq,
                model: &model,
                raw: "[]",
                songs: &[],
            },
            ConversationEvent::Failure {
                provider: ProviderKind::Ollama,
                model: &model,
                error: &error,
                fatal: true,
            },
        ];
        let types: Vec<_> = events.iter().map(ConversationEvent::event_type).collect();
        assert_eq!(types, ["prompt", "llm_response", "llm_error"]);
        assert_eq!(events[2].provider(), ProviderKind::Ollama);
    }
}
