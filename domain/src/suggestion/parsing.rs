//! Song list parsing from LLM responses.
//!
//! Pure domain logic: turns the raw text a provider returned into
//! [`SuggestedSong`] values. Parsing never fails; anything that cannot be
//! read as a song list becomes an empty list, which callers treat as
//! "no songs suggested".
//!
//! # Accepted shapes
//!
//! | Shape | Example |
//! |-------|---------|
//! | Bare array (what the schema asks for) | `[{"Title":"A","Artist":"B"}]` |
//! | Fenced block | `` ```json\n[...]\n``` `` |
//! | Array embedded in prose | `Here you go: [...]` |
//! | Wrapper object | `{"songs":[...]}` |
//! | Single object | `{"Title":"A","Artist":"B"}` |
//!
//! Field names match case-insensitively (`title` and `Title` both work).
//! Items without a non-empty title and artist are skipped.

use crate::music::song::SuggestedSong;
use serde_json::{Map, Value};

/// Parse a raw model response into song suggestions.
///
/// # Examples
///
/// ```
/// use juke_domain::suggestion::parsing::parse_suggestions;
///
/// let songs = parse_suggestions(r#"[{"Title":"A","Artist":"B"}]"#);
/// assert_eq!(songs.len(), 1);
/// assert_eq!(songs[0].reason, None);
///
/// assert!(parse_suggestions("not json at all").is_empty());
/// ```
pub fn parse_suggestions(response: &str) -> Vec<SuggestedSong> {
    let trimmed = response.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        return suggestions_from_value(&value);
    }

    // Models without schema-constrained decoding sometimes wrap the answer.
    if let Some(block) = extract_fenced_block(trimmed)
        && let Ok(value) = serde_json::from_str::<Value>(block)
    {
        return suggestions_from_value(&value);
    }

    if let Some(start) = trimmed.find('[')
        && let Some(end) = trimmed.rfind(']')
        && start < end
        && let Ok(value) = serde_json::from_str::<Value>(&trimmed[start..=end])
    {
        return suggestions_from_value(&value);
    }

    Vec::new()
}

fn suggestions_from_value(value: &Value) -> Vec<SuggestedSong> {
    match value {
        Value::Array(items) => items.iter().filter_map(suggestion_from_item).collect(),
        Value::Object(map) => match field(map, "songs") {
            Some(Value::Array(items)) => items.iter().filter_map(suggestion_from_item).collect(),
            _ => suggestion_from_item(value).into_iter().collect(),
        },
        _ => Vec::new(),
    }
}

fn suggestion_from_item(item: &Value) -> Option<SuggestedSong> {
    let map = item.as_object()?;
    let text = |name: &str| {
        field(map, name)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    };

    Some(SuggestedSong {
        title: text("title")?.to_string(),
        artist: text("artist")?.to_string(),
        reason: text("reason").map(str::to_string),
    })
}

fn field<'a>(map: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    map.iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value)
}

fn extract_fenced_block(text: &str) -> Option<&str> {
    let start = text.find("```")?;
    let after_fence = &text[start + 3..];
    // Skip the info string ("json", "JSON", nothing) up to the newline.
    let body_start = after_fence.find('\n')? + 1;
    let body = &after_fence[body_start..];
    let end = body.find("```")?;
    Some(body[..end].trim())
}
