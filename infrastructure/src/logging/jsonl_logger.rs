//! Conversation log as JSON Lines.
//!
//! One record per [`ConversationEvent`]:
//!
//! ```text
//! {"timestamp":"…","provider":"groq","model":"…","type":"prompt","request":"…","current_song":{…},"prompt":"…"}
//! {"timestamp":"…","provider":"groq","model":"…","type":"llm_response","song_count":2,"songs":[…],"raw":"…"}
//! {"timestamp":"…","provider":"ollama","model":"…","type":"llm_error","error":"…","fatal":true}
//! ```
//!
//! The file is opened for appending, so one log can span several sessions.

use juke_application::ports::conversation_logger::{ConversationEvent, ConversationLogger};
use juke_domain::{Song, SuggestedSong};
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

#[derive(Serialize)]
struct Record<'a> {
    timestamp: String,
    provider: &'static str,
    model: &'a str,
    #[serde(flatten)]
    entry: Entry<'a>,
}

#[derive(Serialize)]
#[serde(tag = "type")]
enum Entry<'a> {
    #[serde(rename = "prompt")]
    Prompt {
        request: &'a str,
        current_song: Option<&'a Song>,
        prompt: &'a str,
    },
    #[serde(rename = "llm_response")]
    Response {
        song_count: usize,
        songs: &'a [SuggestedSong],
        raw: &'a str,
    },
    #[serde(rename = "llm_error")]
    Failure { error: String, fatal: bool },
}

impl<'a> Record<'a> {
    fn from_event(event: &ConversationEvent<'a>) -> Self {
        let (model, entry) = match *event {
            ConversationEvent::Prompt {
                model,
                request,
                current_song,
                prompt,
                ..
            } => (
                model,
                Entry::Prompt {
                    request,
                    current_song,
                    prompt,
                },
            ),
            ConversationEvent::Response {
                model, raw, songs, ..
            } => (
                model,
                Entry::Response {
                    song_count: songs.len(),
                    songs,
                    raw,
                },
            ),
            ConversationEvent::Failure {
                model,
                error,
                fatal,
                ..
            } => (
                model,
                Entry::Failure {
                    error: error.to_string(),
                    fatal,
                },
            ),
        };
        Self {
            timestamp: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            provider: event.provider().as_str(),
            model: model.as_str(),
            entry,
        }
    }
}

/// Appends conversation events to a `.jsonl` file.
pub struct JsonlConversationLogger {
    file: Mutex<File>,
    path: PathBuf,
}

impl JsonlConversationLogger {
    /// Open `path` for appending, creating it and its directory if needed.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, record: &Record<'_>) -> io::Result<()> {
        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');
        let mut file = self
            .file
            .lock()
            .map_err(|_| io::Error::other("conversation log lock poisoned"))?;
        // One write per record keeps lines whole when several engines share a file.
        file.write_all(&line)
    }
}

impl ConversationLogger for JsonlConversationLogger {
    fn log(&self, event: &ConversationEvent<'_>) {
        if let Err(e) = self.append(&Record::from_event(event)) {
            warn!(
                "Could not write {} event to {}: {}",
                event.event_type(),
                self.path.display(),
                e
            );
        }
    }
}
