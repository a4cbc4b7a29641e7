//! Domain layer for juke
//!
//! This crate contains the core song-suggestion concepts. It has no
//! dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Conversation
//!
//! Every engine owns one [`Conversation`]: a transcript seeded with a system
//! persona that grows by one user turn and one assistant turn per request.
//! Providers receive a [`HistoryWindow`] view of it.
//!
//! ## Song list contract
//!
//! Models answer with a JSON array of `{Title, Artist, Reason?}` objects
//! described by [`SongListSchema`]. Raw answers are read back with
//! [`parse_suggestions`], which degrades to an empty list instead of failing.

pub mod core;
pub mod music;
pub mod prompt;
pub mod providers;
pub mod session;
pub mod suggestion;
pub mod util;

// Re-export commonly used types
pub use self::core::{
    error::DomainError,
    model::{DEFAULT_MODEL, ModelName},
    output_format::OutputFormat,
};
pub use music::song::{PlayerContext, Song, SuggestedSong};
pub use prompt::PromptTemplate;
pub use providers::{
    FailurePolicy, HostedProviderSettings, OllamaSettings, ProviderKind, ProvidersSettings,
    SamplingParams,
};
pub use session::{
    entities::{Conversation, Message, Role},
    window::{DEFAULT_MAX_EXCHANGES, HistoryWindow},
};
pub use suggestion::{parsing::parse_suggestions, schema::SongListSchema};
