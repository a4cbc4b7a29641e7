//! Structured output contract for song suggestions.
//!
//! - [`schema::SongListSchema`]: the JSON schema sent to providers
//! - [`parsing::parse_suggestions`]: best-effort reading of raw responses

pub mod parsing;
pub mod schema;
