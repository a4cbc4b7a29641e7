//! Prompt templates for song suggestion requests

use crate::music::song::Song;

/// Ranking rules appended to every request.
const RANKING_RULES: &str = r#"Suggest songs in this order:
1. Songs specifically requested by the user. In this case, ignore the currently playing song.
2. Songs different from what the user is currently listening to, taking previously heard tracks and user sentiment into account."#;

/// Templates for the system persona and per-request instructions
pub struct PromptTemplate;

impl PromptTemplate {
    /// System prompt seeded into every new conversation.
    pub fn system() -> &'static str {
        r#"You are a music expert. Your job is to return formatted song titles and artists, incorporating previously played tracks and user sentiment in your suggestions.

Be as succinct as possible, and prioritize tool use over text. Return as many songs as are applicable."#
    }

    /// User instruction for one song request.
    ///
    /// With a current song, the title and artist are stated verbatim and the
    /// model is told to move away from it. Explicitly named songs still win.
    /// Deterministic: the same inputs always produce the same bytes.
    pub fn suggestion_request(user_request: &str, current: Option<&Song>) -> String {
        let request = user_request.trim();
        let prompt = match current {
            None => format!(
                r#"I'm listening to music. Here is my request for my next songs: {request}. Suggest as many songs as are applicable and provide a reason why you're suggesting each song.
{RANKING_RULES}"#
            ),
            Some(song) => format!(
                r#"I'm listening to music. My current song is {title} by {artist}. Here is my request for my next songs: {request}. Suggest as many songs as are applicable and provide a reason why you're suggesting each song.
{RANKING_RULES}
Unless a song is explicitly requested, diversify away from {title} by {artist}."#,
                title = song.title,
                artist = song.artist,
            ),
        };

        prompt.trim().to_string()
    }
}
