//! Song engine
//!
//! One [`SongEngine`] per provider/model pair. It owns the conversation
//! transcript and serializes requests against it: a request appends its user
//! turn, calls the provider with the windowed transcript, then appends the
//! raw answer, all while holding the transcript lock. Concurrent callers
//! queue on that lock instead of interleaving turns.

use crate::ports::chat_backend::{ChatBackend, ChatRequest, GatewayError};
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use juke_domain::util::truncate_str;
use juke_domain::{
    Conversation, DomainError, FailurePolicy, HistoryWindow, Message, ModelName, PromptTemplate,
    ProviderKind, SamplingParams, Song, SongListSchema, SuggestedSong,
};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

/// Errors surfaced by the song engine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error(transparent)]
    InvalidRequest(#[from] DomainError),

    #[error("{provider} request failed: {source}")]
    Gateway {
        provider: ProviderKind,
        source: GatewayError,
    },

    #[error("{provider} is unavailable: {source}")]
    Fatal {
        provider: ProviderKind,
        source: GatewayError,
    },

    #[error("Request cancelled")]
    Cancelled,

    #[error("Suggestion worker has stopped")]
    WorkerStopped,
}

impl EngineError {
    /// The process should stop: the local provider is unreachable or broken.
    pub fn is_fatal(&self) -> bool {
        matches!(self, EngineError::Fatal { .. })
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, EngineError::Cancelled)
    }

    fn from_gateway(policy: FailurePolicy, provider: ProviderKind, source: GatewayError) -> Self {
        match policy {
            FailurePolicy::Fatal => EngineError::Fatal { provider, source },
            FailurePolicy::Silent => EngineError::Gateway { provider, source },
        }
    }
}

/// Conversational song-suggestion engine bound to one backend.
pub struct SongEngine {
    backend: Arc<dyn ChatBackend>,
    conversation: Mutex<Conversation>,
    window: HistoryWindow,
    schema: SongListSchema,
    sampling: SamplingParams,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl SongEngine {
    /// Create an engine whose transcript holds only the default persona.
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self {
            backend,
            conversation: Mutex::new(Conversation::new(PromptTemplate::system())),
            window: HistoryWindow::default(),
            schema: SongListSchema,
            sampling: SamplingParams::default(),
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    /// Bound how much history is sent to the provider.
    pub fn with_history_window(mut self, window: HistoryWindow) -> Self {
        self.window = window;
        self
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    pub fn provider(&self) -> ProviderKind {
        self.backend.kind()
    }

    pub fn model(&self) -> &ModelName {
        self.backend.model()
    }

    pub fn history_window(&self) -> HistoryWindow {
        self.window
    }

    /// Number of messages in the transcript, system message included.
    pub async fn conversation_len(&self) -> usize {
        self.conversation.lock().await.len()
    }

    /// Copy of the full transcript.
    pub async fn transcript(&self) -> Vec<Message> {
        self.conversation.lock().await.snapshot().to_vec()
    }

    /// Ask for songs and report them through `on_songs`.
    ///
    /// A successful call always invokes `on_songs`, possibly with an empty
    /// list when the answer could not be read. Provider failures under the
    /// silent policy are logged and swallowed without invoking `on_songs`.
    /// Failures under the fatal policy are returned so the caller can stop
    /// the process.
    pub async fn prompt_llm<F>(
        &self,
        user_request: &str,
        current_song: Option<&Song>,
        on_songs: F,
    ) -> Result<(), EngineError>
    where
        F: FnOnce(Vec<SuggestedSong>) + Send,
    {
        match self.suggest(user_request, current_song).await {
            Ok(songs) => {
                on_songs(songs);
                Ok(())
            }
            Err(EngineError::Gateway { .. }) => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Ask for songs and return them, or the reason there are none.
    ///
    /// The transcript gains the user turn as soon as the request is built.
    /// The assistant turn is appended only when the provider answered; on
    /// failure the user turn stays behind without a reply.
    pub async fn suggest(
        &self,
        user_request: &str,
        current_song: Option<&Song>,
    ) -> Result<Vec<SuggestedSong>, EngineError> {
        let user_request = user_request.trim();
        if user_request.is_empty() {
            return Err(DomainError::EmptyRequest.into());
        }

        let provider = self.backend.kind();
        let prompt = PromptTemplate::suggestion_request(user_request, current_song);

        let mut conversation = self.conversation.lock().await;
        conversation.push_user(prompt.as_str());

        info!(
            provider = %provider,
            model = %self.backend.model(),
            "Requesting songs: {}",
            truncate_str(user_request, 100)
        );
        self.conversation_logger.log(&ConversationEvent::Prompt {
            provider,
            model: self.backend.model(),
            request: user_request,
            current_song,
            prompt: &prompt,
        });

        let messages = self.window.apply(conversation.snapshot());
        debug!(
            "Sending {} of {} messages to {}",
            messages.len(),
            conversation.len(),
            provider
        );

        let request = ChatRequest {
            messages: &messages,
            schema: self.schema,
            sampling: self.sampling,
        };

        match self.backend.complete(&request).await {
            Ok(raw) => {
                let songs = self.schema.parse(&raw);
                if songs.is_empty() && !raw.trim().is_empty() {
                    debug!("No songs could be read from answer: {}", truncate_str(&raw, 200));
                }
                self.conversation_logger.log(&ConversationEvent::Response {
                    provider,
                    model: self.backend.model(),
                    raw: &raw,
                    songs: &songs,
                });
                conversation.push_assistant(raw);
                info!("{} suggested {} songs", provider, songs.len());
                Ok(songs)
            }
            Err(source) => {
                let policy = self.backend.failure_policy();
                match policy {
                    FailurePolicy::Fatal => error!("{} request failed: {}", provider, source),
                    FailurePolicy::Silent => warn!("{} request failed: {}", provider, source),
                }
                if conversation.has_dangling_user_turn() {
                    debug!(
                        "Transcript now ends with an unanswered user turn ({} messages)",
                        conversation.len()
                    );
                }
                self.conversation_logger.log(&ConversationEvent::Failure {
                    provider,
                    model: self.backend.model(),
                    error: &source,
                    fatal: policy == FailurePolicy::Fatal,
                });
                Err(EngineError::from_gateway(policy, provider, source))
            }
        }
    }
}
