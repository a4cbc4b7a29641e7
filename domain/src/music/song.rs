//! Song value objects

use serde::{Deserialize, Serialize};

/// A song as the playback system understands it (Value Object).
///
/// Identity is the `(title, artist)` pair. No uniqueness is enforced; the
/// playback backend resolves the pair with a search.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Song {
    pub title: String,
    pub artist: String,
}

impl Song {
    pub fn new(title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
        }
    }

    /// Search query used by playback backends ("title artist").
    pub fn search_query(&self) -> String {
        format!("{} {}", self.title, self.artist)
    }
}

impl std::fmt::Display for Song {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} by {}", self.title, self.artist)
    }
}

/// A song suggested by the model, with its optional justification.
///
/// Serialized with the capitalised field names of the song-list schema
/// (`Title`, `Artist`, `Reason`) so the same type reads model output and
/// writes `--output json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestedSong {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Artist")]
    pub artist: String,
    #[serde(rename = "Reason", default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl SuggestedSong {
    pub fn new(title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            reason: None,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// The playable part of the suggestion.
    pub fn song(&self) -> Song {
        Song::new(&self.title, &self.artist)
    }
}

impl From<SuggestedSong> for Song {
    fn from(suggestion: SuggestedSong) -> Self {
        Song {
            title: suggestion.title,
            artist: suggestion.artist,
        }
    }
}

/// Snapshot of the playback state, read before each request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerContext {
    pub current_song: Option<Song>,
    pub is_playing: bool,
}

impl PlayerContext {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn playing(song: Song) -> Self {
        Self {
            current_song: Some(song),
            is_playing: true,
        }
    }

    /// The song to mention in the prompt, if any.
    ///
    /// A paused song still counts: the user was listening to it.
    pub fn prompt_context(&self) -> Option<&Song> {
        self.current_song.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suggested_song_uses_schema_field_names() {
        let song = SuggestedSong::new("Get Lucky", "Daft Punk").with_reason("Upbeat");
        let json = serde_json::to_value(&song).unwrap();
        assert_eq!(json["Title"], "Get Lucky");
        assert_eq!(json["Artist"], "Daft Punk");
        assert_eq!(json["Reason"], "Upbeat");
    }

    #[test]
    fn test_reason_omitted_when_absent() {
        let json = serde_json::to_string(&SuggestedSong::new("A", "B")).unwrap();
        assert_eq!(json, r#"{"Title":"A","Artist":"B"}"#);
    }

    #[test]
    fn test_song_display_and_query() {
        let song = Song::new("Uptown Funk", "Mark Ronson");
        assert_eq!(song.to_string(), "Uptown Funk by Mark Ronson");
        assert_eq!(song.search_query(), "Uptown Funk Mark Ronson");
    }

    #[test]
    fn test_player_context() {
        assert!(PlayerContext::idle().prompt_context().is_none());
        let ctx = PlayerContext::playing(Song::new("A", "B"));
        assert!(ctx.is_playing);
        assert_eq!(ctx.prompt_context(), Some(&Song::new("A", "B")));
    }
}
