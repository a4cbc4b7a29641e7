//! JSON schema for the song list a model must return.

use super::parsing::parse_suggestions;
use crate::music::song::SuggestedSong;
use serde_json::{Value, json};

/// The structured output contract shared by every provider adapter.
///
/// An array of objects with required string fields `Title` and `Artist` and
/// an optional string field `Reason`. Providers with schema-constrained
/// decoding receive the schema; the rest are guided by the prompt text and
/// read back with the same best-effort [`parse`](Self::parse).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SongListSchema;

impl SongListSchema {
    /// Schema name sent to providers that want one.
    pub const NAME: &'static str = "songs";

    pub fn name(&self) -> &'static str {
        Self::NAME
    }

    /// Schema for providers that treat the schema as a hint.
    pub fn json_schema(&self) -> Value {
        json!({
            "type": "array",
            "items": {
                "type": "object",
                "properties": {
                    "Title": { "type": "string" },
                    "Artist": { "type": "string" },
                    "Reason": { "type": "string" }
                },
                "required": ["Title", "Artist"]
            }
        })
    }

    /// Schema for providers enforcing strict decoding.
    ///
    /// Strict decoders require every property to be listed as required and
    /// forbid extra properties, so `Reason` is nullable instead of omitted.
    pub fn strict_json_schema(&self) -> Value {
        json!({
            "type": "array",
            "items": {
                "type": "object",
                "properties": {
                    "Title": { "type": "string" },
                    "Artist": { "type": "string" },
                    "Reason": { "type": ["string", "null"] }
                },
                "required": ["Title", "Artist", "Reason"],
                "additionalProperties": false
            }
        })
    }

    /// Read a raw response back into suggestions. Never fails.
    pub fn parse(&self, raw: &str) -> Vec<SuggestedSong> {
        parse_suggestions(raw)
    }
}
