//! Application layer for juke
//!
//! This crate contains the song engine, its background worker, use cases and
//! port definitions. It depends only on the domain layer.

pub mod engine;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use engine::{EngineError, SongEngine, SuggestionOutcome, SuggestionWorker};
pub use ports::{
    chat_backend::{ChatBackend, ChatRequest, GatewayError},
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    playback::{PlaybackError, PlaybackPort},
};
pub use use_cases::request_songs::{RequestSongsOutput, RequestSongsUseCase};
