//! Core domain concepts shared across all subdomains.
//!
//! - [`model::ModelName`]: the LLM model an engine talks to
//! - [`output_format::OutputFormat`]: how suggestions are rendered
//! - [`error::DomainError`]: domain-level errors

pub mod error;
pub mod model;
pub mod output_format;
