//! CLI entrypoint for juke
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use juke_application::{
    ConversationLogger, NoConversationLogger, PlaybackPort, RequestSongsUseCase, SongEngine,
};
use juke_domain::{OutputFormat, Song};
use juke_infrastructure::{ConfigLoader, FileConfig, JsonlConversationLogger, connect_backend};
use juke_presentation::{ChatRepl, Cli, ConsoleFormatter, ConsolePlayback, ProgressReporter};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is normal.
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();
    let _log_guard = init_logging(cli.verbose, cli.log_dir.as_deref())?;

    if let Ok(path) = &dotenv {
        info!("Loaded environment from {}", path.display());
    }
    info!("Starting juke");

    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
    }
    .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    apply_cli_overrides(&mut config, &cli);

    if cli.show_config {
        ConfigLoader::print_config_sources();
        println!();
        println!("Effective configuration:");
        println!("{}", toml::to_string_pretty(&config)?);
        return Ok(());
    }

    for issue in config.validate() {
        warn!("Config: {}", issue);
    }

    if !config.output.color {
        colored::control::set_override(false);
    }
    let format = config.output.format.unwrap_or_default();

    // === Dependency Injection ===
    let provider = config.engine.provider_kind();
    let backend = connect_backend(
        &config.providers.to_settings(),
        provider,
        config.engine.model_name(),
    )
    .await
    .with_context(|| format!("Could not set up the {} provider", provider))?;

    let engine = Arc::new(
        SongEngine::new(backend)
            .with_history_window(config.conversation.history_window())
            .with_conversation_logger(conversation_logger(&config)),
    );

    let playback = Arc::new(match (&cli.now_playing, &cli.artist) {
        (Some(title), Some(artist)) => ConsolePlayback::with_now_playing(Song::new(title, artist)),
        _ => ConsolePlayback::new(),
    });

    // Chat mode
    if cli.chat {
        let repl = ChatRepl::new(engine, playback)
            .with_progress(!cli.quiet)
            .with_format(format);

        repl.run().await?;
        return Ok(());
    }

    // Single request mode - request is required
    let request = match cli.request {
        Some(r) if !r.trim().is_empty() => r,
        _ => bail!("A song request is required. Use --chat for interactive mode."),
    };

    if !cli.quiet && format == OutputFormat::Text {
        println!();
        println!("Request: {}", request);
        println!("Provider: {}   Model: {}", engine.provider(), engine.model());
        if cli.now_playing.is_some() {
            let context = playback.current_state().await;
            println!("{}", ConsoleFormatter::format_now_playing(&context));
        }
        println!();
    }

    let use_case = RequestSongsUseCase::new(engine.clone(), playback.clone());
    let progress = ProgressReporter::start(!cli.quiet, engine.provider(), engine.model());
    let result = use_case.execute(&request).await;
    progress.finish();
    let output = result?;

    match output.suggestions {
        Some(songs) => {
            println!("{}", ConsoleFormatter::render(format, &songs));
            if output.played && format == OutputFormat::Text {
                let context = playback.current_state().await;
                println!("{}", ConsoleFormatter::format_now_playing(&context));
            }
        }
        None => eprintln!(
            "No suggestions: the {} request failed (run with -v for details).",
            engine.provider()
        ),
    }

    Ok(())
}

/// Command-line flags win over every configuration source.
fn apply_cli_overrides(config: &mut FileConfig, cli: &Cli) {
    if let Some(provider) = &cli.provider {
        config.engine.provider = provider.clone();
    }
    if let Some(model) = &cli.model {
        config.engine.model = model.clone();
    }
    if let Some(max) = cli.max_exchanges {
        config.conversation.max_exchanges = max;
    }
    if let Some(format) = cli.output {
        config.output.format = Some(format.into());
    }
    if let Some(path) = &cli.conversation_log {
        config.logging.conversation_log = Some(path.clone());
    }
}

fn conversation_logger(config: &FileConfig) -> Arc<dyn ConversationLogger> {
    let Some(path) = &config.logging.conversation_log else {
        return Arc::new(NoConversationLogger);
    };
    match JsonlConversationLogger::open(path) {
        Ok(logger) => {
            info!("Conversation log: {}", logger.path().display());
            Arc::new(logger)
        }
        Err(e) => {
            warn!("Conversation log disabled, cannot open {}: {}", path.display(), e);
            Arc::new(NoConversationLogger)
        }
    }
}

/// Initialize logging based on verbosity level, optionally mirrored to a file.
fn init_logging(verbose: u8, log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Could not create log directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::never(dir, "juke.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(EnvFilter::new(level));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .with_filter(EnvFilter::new(level)),
        )
        .with(file_layer)
        .init();

    Ok(guard)
}
