//! Infrastructure layer for juke
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: provider backends, configuration file loading
//! and the conversation log writer.

pub mod config;
pub mod logging;
pub mod providers;

// Re-export commonly used types
pub use config::{ConfigIssue, ConfigLoader, FileConfig};
pub use logging::JsonlConversationLogger;
pub use providers::{HostedBackend, OllamaBackend, connect_backend, create_backend};
