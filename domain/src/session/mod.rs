//! LLM conversation domain.
//!
//! - [`entities::Conversation`]: the transcript an engine shares with its provider
//! - [`entities::Message`]: a single role-tagged message
//! - [`window::HistoryWindow`]: bounded view sent with each request

pub mod entities;
pub mod window;
