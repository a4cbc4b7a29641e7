//! Scripted test doubles shared by the engine, worker and use-case tests.

use crate::ports::chat_backend::{ChatBackend, ChatRequest, GatewayError};
use crate::ports::conversation_logger::{ConversationEvent, ConversationLogger};
use async_trait::async_trait;
use juke_domain::{Message, ModelName, ProviderKind};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

/// Backend that replays scripted answers and records what it was sent.
///
/// Once the script runs out every call answers `[]`.
pub struct MockBackend {
    kind: ProviderKind,
    model: ModelName,
    script: Mutex<VecDeque<Result<String, GatewayError>>>,
    calls: Mutex<Vec<Vec<Message>>>,
    delay: Option<Duration>,
}

impl MockBackend {
    pub fn new(kind: ProviderKind) -> Self {
        Self {
            kind,
            model: ModelName::default(),
            script: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    pub fn reply(self, text: &str) -> Self {
        self.script.lock().unwrap().push_back(Ok(text.to_string()));
        self
    }

    pub fn fail(self, error: GatewayError) -> Self {
        self.script.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<Vec<Message>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatBackend for MockBackend {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    fn model(&self) -> &ModelName {
        &self.model
    }

    async fn complete(&self, request: &ChatRequest<'_>) -> Result<String, GatewayError> {
        self.calls.lock().unwrap().push(request.messages.to_vec());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok("[]".to_string()))
    }
}

/// Logger that keeps every event type it receives.
#[derive(Default)]
pub struct RecordingLogger {
    events: Mutex<Vec<&'static str>>,
}

impl RecordingLogger {
    pub fn event_types(&self) -> Vec<&'static str> {
        self.events.lock().unwrap().clone()
    }
}

impl ConversationLogger for RecordingLogger {
    fn log(&self, event: &ConversationEvent<'_>) {
        self.events.lock().unwrap().push(event.event_type());
    }
}
