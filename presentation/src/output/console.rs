//! Console output formatter for song suggestions

use colored::Colorize;
use juke_domain::util::truncate_str;
use juke_domain::{Message, OutputFormat, PlayerContext, Role, SuggestedSong};

/// Formats suggestions and session state for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Render suggestions in the requested format
    pub fn render(format: OutputFormat, songs: &[SuggestedSong]) -> String {
        match format {
            OutputFormat::Text => Self::format_suggestions(songs),
            OutputFormat::Json => Self::format_json(songs),
        }
    }

    /// Numbered list, one song per line, reason underneath
    pub fn format_suggestions(songs: &[SuggestedSong]) -> String {
        if songs.is_empty() {
            return format!("{}\n", "No songs suggested.".yellow());
        }

        let mut output = String::new();
        output.push_str(&format!("{}\n", "Suggestions:".cyan().bold()));
        for (i, song) in songs.iter().enumerate() {
            output.push_str(&format!(
                "{:>3}. {} {} {}\n",
                i + 1,
                song.title.bold(),
                "by".dimmed(),
                song.artist
            ));
            if let Some(reason) = &song.reason {
                output.push_str(&Self::indent(reason, "     "));
                output.push('\n');
            }
        }
        output
    }

    /// Format as JSON using the song-list field names
    pub fn format_json(songs: &[SuggestedSong]) -> String {
        serde_json::to_string_pretty(songs).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn format_now_playing(context: &PlayerContext) -> String {
        match (&context.current_song, context.is_playing) {
            (Some(song), true) => format!("{} {}", "Now playing:".cyan().bold(), song),
            (Some(song), false) => format!("{} {}", "Paused:".cyan().bold(), song),
            (None, _) => format!("{}", "Nothing playing.".dimmed()),
        }
    }

    /// Transcript view for `/history`. Long turns are cut to `max_bytes`.
    pub fn format_transcript(messages: &[Message], max_bytes: usize) -> String {
        let mut output = String::new();
        for (i, message) in messages.iter().enumerate() {
            let label = match message.role {
                Role::System => "system".dimmed(),
                Role::User => "user".green().bold(),
                Role::Assistant => "assistant".yellow().bold(),
            };
            let content = message.content.trim();
            let preview = truncate_str(content, max_bytes);
            let ellipsis = if preview.len() < content.len() { "..." } else { "" };
            output.push_str(&format!("[{}] {}\n", i, label));
            output.push_str(&Self::indent(&format!("{}{}", preview, ellipsis), "    "));
            output.push('\n');
        }
        output
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use juke_domain::Song;

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn test_format_suggestions_numbers_songs() {
        plain();
        let songs = vec![
            SuggestedSong::new("Lovely Day", "Bill Withers").with_reason("Warm and easy"),
            SuggestedSong::new("Sunday Morning", "Maroon 5"),
        ];
        let output = ConsoleFormatter::format_suggestions(&songs);
        assert!(output.contains("  1. Lovely Day by Bill Withers"));
        assert!(output.contains("     Warm and easy"));
        assert!(output.contains("  2. Sunday Morning by Maroon 5"));
    }

    #[test]
    fn test_format_empty_suggestions() {
        plain();
        assert!(ConsoleFormatter::format_suggestions(&[]).contains("No songs suggested."));
    }

    #[test]
    fn test_format_json_uses_wire_names() {
        let songs = vec![SuggestedSong::new("A", "B")];
        let json: serde_json::Value =
            serde_json::from_str(&ConsoleFormatter::render(OutputFormat::Json, &songs)).unwrap();
        assert_eq!(json, serde_json::json!([{"Title": "A", "Artist": "B"}]));
    }

    #[test]
    fn test_format_now_playing() {
        plain();
        let context = PlayerContext::playing(Song::new("Heroes", "David Bowie"));
        assert_eq!(
            ConsoleFormatter::format_now_playing(&context),
            "Now playing: Heroes by David Bowie"
        );
        assert_eq!(
            ConsoleFormatter::format_now_playing(&PlayerContext::idle()),
            "Nothing playing."
        );
    }

    #[test]
    fn test_format_transcript_truncates() {
        plain();
        let messages = vec![Message::system("persona"), Message::user("a".repeat(50))];
        let output = ConsoleFormatter::format_transcript(&messages, 10);
        assert!(output.contains("[0] system"));
        assert!(output.contains("[1] user"));
        assert!(output.contains(&format!("    {}...", "a".repeat(10))));
    }
}
