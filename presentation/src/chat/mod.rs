//! Interactive chat module
//!
//! Provides a line-editor based interactive interface where each line is a
//! song request.

mod repl;

pub use repl::{ChatRepl, ReplError};
