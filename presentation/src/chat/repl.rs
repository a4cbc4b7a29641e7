//! REPL (Read-Eval-Print Loop) for interactive song requests

use crate::ConsoleFormatter;
use crate::ProgressReporter;
use crate::playback::ConsolePlayback;
use colored::Colorize;
use juke_application::{
    EngineError, PlaybackPort, SongEngine, SuggestionOutcome, SuggestionWorker,
};
use juke_domain::{OutputFormat, Song, SuggestedSong};
use reedline::{DefaultPrompt, DefaultPromptSegment, FileBackedHistory, Reedline, Signal};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::warn;

const HISTORY_SIZE: usize = 500;

/// Bytes of each turn shown by `/history`
const HISTORY_PREVIEW: usize = 160;

#[derive(Error, Debug)]
pub enum ReplError {
    #[error("Line editor error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// A line starting with `/`
#[derive(Debug, Clone, PartialEq, Eq)]
enum ReplCommand {
    Help,
    ShowNow,
    SetNow(Song),
    History,
    Quit,
    Unknown(String),
}

impl ReplCommand {
    fn parse(line: &str) -> Self {
        let (name, arg) = match line.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (line, ""),
        };
        match name {
            "/quit" | "/exit" | "/q" => ReplCommand::Quit,
            "/help" | "/h" | "/?" => ReplCommand::Help,
            "/history" => ReplCommand::History,
            "/now" if arg.is_empty() => ReplCommand::ShowNow,
            "/now" => match parse_song(arg) {
                Some(song) => ReplCommand::SetNow(song),
                None => ReplCommand::Unknown(line.to_string()),
            },
            _ => ReplCommand::Unknown(line.to_string()),
        }
    }
}

/// `Title - Artist`. The last ` - ` separates, so titles may contain one.
fn parse_song(arg: &str) -> Option<Song> {
    let (title, artist) = arg.rsplit_once(" - ")?;
    let (title, artist) = (title.trim(), artist.trim());
    if title.is_empty() || artist.is_empty() {
        return None;
    }
    Some(Song::new(title, artist))
}

/// Interactive chat REPL
pub struct ChatRepl {
    engine: Arc<SongEngine>,
    playback: Arc<ConsolePlayback>,
    show_progress: bool,
    format: OutputFormat,
}

impl ChatRepl {
    /// Create a new ChatRepl
    pub fn new(engine: Arc<SongEngine>, playback: Arc<ConsolePlayback>) -> Self {
        Self {
            engine,
            playback,
            show_progress: true,
            format: OutputFormat::Text,
        }
    }

    /// Set whether to show progress
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Run the interactive REPL
    ///
    /// Returns an error only when the line editor fails or the provider
    /// failure is fatal.
    pub async fn run(&self) -> Result<(), ReplError> {
        let (worker, mut outcomes) = SuggestionWorker::spawn(self.engine.clone());
        let mut line_editor = Self::line_editor();
        let prompt = DefaultPrompt::new(
            DefaultPromptSegment::Basic("juke".to_string()),
            DefaultPromptSegment::Empty,
        );

        self.print_welcome();

        let result = loop {
            let signal = match line_editor.read_line(&prompt) {
                Ok(signal) => signal,
                Err(e) => break Err(ReplError::Io(e)),
            };

            match signal {
                Signal::Success(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }

                    if line.starts_with('/') {
                        if self.handle_command(line).await {
                            break Ok(());
                        }
                        continue;
                    }

                    if let Err(e) = self.process_request(&worker, &mut outcomes, line).await {
                        break Err(e.into());
                    }
                }
                Signal::CtrlD => {
                    println!("Bye!");
                    break Ok(());
                }
                _ => {
                    println!("^C");
                    continue;
                }
            }
        };

        worker.shutdown().await;
        result
    }

    fn line_editor() -> Reedline {
        let editor = Reedline::create();
        let history_path = dirs::data_dir().map(|p| p.join("juke").join("history.txt"));

        let Some(path) = history_path else {
            return editor;
        };
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        match FileBackedHistory::with_file(HISTORY_SIZE, path) {
            Ok(history) => editor.with_history(Box::new(history)),
            Err(e) => {
                warn!("Could not open REPL history: {}", e);
                editor
            }
        }
    }

    fn print_welcome(&self) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│               juke - Chat Mode              │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        println!(
            "Provider: {}   Model: {}",
            self.engine.provider(),
            self.engine.model()
        );
        println!();
        Self::print_help();
    }

    fn print_help() {
        println!("Type what you want to hear. Ctrl-C while waiting cancels the request.");
        println!();
        println!("Commands:");
        println!("  /help, /h, /?           - Show this help");
        println!("  /now                    - Show the current song");
        println!("  /now <title> - <artist> - Set the current song");
        println!("  /history                - Show the conversation so far");
        println!("  /quit, /exit, /q        - Exit chat");
        println!();
    }

    /// Handle slash commands. Returns true if should exit.
    async fn handle_command(&self, line: &str) -> bool {
        match ReplCommand::parse(line) {
            ReplCommand::Quit => {
                println!("Bye!");
                return true;
            }
            ReplCommand::Help => Self::print_help(),
            ReplCommand::ShowNow => {
                let context = self.playback.current_state().await;
                println!("{}", ConsoleFormatter::format_now_playing(&context));
            }
            ReplCommand::SetNow(song) => {
                self.playback.set_now_playing(song);
                let context = self.playback.current_state().await;
                println!("{}", ConsoleFormatter::format_now_playing(&context));
            }
            ReplCommand::History => {
                let transcript = self.engine.transcript().await;
                println!(
                    "{}",
                    ConsoleFormatter::format_transcript(&transcript, HISTORY_PREVIEW)
                );
            }
            ReplCommand::Unknown(cmd) => {
                println!("Unknown command: {}", cmd);
                println!("Type /help for available commands");
            }
        }
        false
    }

    /// Submit one request and wait for its outcome.
    ///
    /// Only fatal provider failures are returned.
    async fn process_request(
        &self,
        worker: &SuggestionWorker,
        outcomes: &mut mpsc::Receiver<SuggestionOutcome>,
        request: &str,
    ) -> Result<(), EngineError> {
        let context = self.playback.current_state().await;
        let id = worker
            .submit(request, context.prompt_context().cloned())
            .await?;

        let progress = ProgressReporter::start(
            self.show_progress,
            self.engine.provider(),
            self.engine.model(),
        );

        let outcome = loop {
            tokio::select! {
                outcome = outcomes.recv() => match outcome {
                    Some(outcome) if outcome.id() == id => break outcome,
                    Some(_) => continue,
                    None => {
                        progress.finish();
                        return Err(EngineError::WorkerStopped);
                    }
                },
                _ = tokio::signal::ctrl_c() => worker.cancel_current(),
            }
        };

        match outcome {
            SuggestionOutcome::Suggested { songs, .. } => {
                progress.finish();
                self.present(&songs).await;
            }
            SuggestionOutcome::Failed { error, .. } if error.is_cancelled() => progress.cancelled(),
            SuggestionOutcome::Failed { error, .. } => {
                progress.finish();
                if error.is_fatal() {
                    return Err(error);
                }
                eprintln!("{} {}", "Error:".red().bold(), error);
            }
        }
        println!();
        Ok(())
    }

    async fn present(&self, songs: &[SuggestedSong]) {
        println!("{}", ConsoleFormatter::render(self.format, songs));
        if songs.is_empty() {
            return;
        }
        let queue: Vec<Song> = songs.iter().map(SuggestedSong::song).collect();
        match self.playback.search_and_play(&queue).await {
            Ok(()) => {
                let context = self.playback.current_state().await;
                println!("{}", ConsoleFormatter::format_now_playing(&context));
            }
            Err(e) => eprintln!("{} {}", "Playback:".yellow().bold(), e),
        }
    }
}
