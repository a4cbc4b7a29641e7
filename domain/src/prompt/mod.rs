//! Prompt domain
//!
//! Templates for the system persona and per-request instructions.

mod template;

pub use template::PromptTemplate;
