//! Presentation layer for juke
//!
//! This crate contains CLI definitions, output formatters, the progress
//! spinner, a console playback stand-in and the interactive chat interface.

pub mod chat;
pub mod cli;
pub mod output;
pub mod playback;
pub mod progress;

// Re-export commonly used types
pub use chat::{ChatRepl, ReplError};
pub use cli::commands::{Cli, OutputFormat};
pub use output::console::ConsoleFormatter;
pub use playback::ConsolePlayback;
pub use progress::reporter::ProgressReporter;
