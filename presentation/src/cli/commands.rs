//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for suggestions
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Numbered list with reasons
    Text,
    /// JSON array with Title/Artist/Reason fields
    Json,
}

impl From<OutputFormat> for juke_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => juke_domain::OutputFormat::Text,
            OutputFormat::Json => juke_domain::OutputFormat::Json,
        }
    }
}

/// CLI arguments for juke
#[derive(Parser, Debug)]
#[command(name = "juke")]
#[command(author, version, about = "Ask an LLM what to play next")]
#[command(long_about = r#"
juke turns a free-text request into song suggestions from an LLM and hands
them to the player.

Providers:
  ollama       Local Ollama server (OLLAMA_HOST, default http://127.0.0.1:11434)
  groq         Groq API (GROQ_API_KEY)
  openrouter   OpenRouter API (OPENROUTER_API_KEY)

Configuration is loaded from (in priority order):
1. Environment: LLM_PROVIDER, MODEL_NAME, JUKE_* (a .env file is read first)
2. --config <path>                 Explicit config file
3. ./juke.toml                     Project-level config
4. ~/.config/juke/config.toml      Global config

Example:
  juke "something upbeat for a drive"
  juke --now-playing "Uptown Funk" --artist "Mark Ronson" "play something relaxing"
  juke --chat -p groq -m llama-3.3-70b-versatile
"#)]
pub struct Cli {
    /// What you want to hear (not required in chat mode)
    pub request: Option<String>,

    /// Start interactive chat mode
    #[arg(short, long)]
    pub chat: bool,

    /// Title of the song currently playing
    #[arg(long, value_name = "TITLE", requires = "artist")]
    pub now_playing: Option<String>,

    /// Artist of the song currently playing
    #[arg(long, value_name = "ARTIST", requires = "now_playing")]
    pub artist: Option<String>,

    /// LLM provider: ollama, groq or openrouter
    #[arg(short, long, value_name = "PROVIDER")]
    pub provider: Option<String>,

    /// Model name passed to the provider
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Past exchanges sent with each request (0 = all)
    #[arg(long, value_name = "N")]
    pub max_exchanges: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration sources and the effective configuration, then exit
    #[arg(long)]
    pub show_config: bool,

    /// Also write logs to juke.log in this directory
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Append conversation events (JSONL) to this file
    #[arg(long, value_name = "FILE")]
    pub conversation_log: Option<PathBuf>,
}
