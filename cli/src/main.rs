//! CLI entrypoint for Dialogue Arena
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow};
use arena_application::{
    ConversationLogger, EpisodeProgress, NoConversationLogger, NoProgress, RunEpisodeInput,
    RunEpisodeUseCase,
};
use arena_infrastructure::{
    CatalogLoader, ConfigLoader, EpisodeLogDir, FileConfig, JsonlConversationLogger,
    ProviderRegistry,
};
use arena_presentation::{Cli, ConsoleFormatter, StdinHumanInput, TurnReporter};
use clap::Parser;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!("Starting Dialogue Arena");

    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };

    if let Some(path) = cli.catalog.clone() {
        config.catalog.path = Some(path);
    }
    if let Some(dir) = cli.log_dir.clone() {
        config.logging.dir = dir;
    }

    if cli.show_config {
        show_config(&cli, &config)?;
        return Ok(());
    }

    let spec = config
        .to_episode_spec()
        .context("Invalid episode configuration")?;
    let catalog = CatalogLoader::load(config.catalog.path.as_deref())?;

    // === Dependency Injection ===
    let log_dir = if config.logging.transcript || config.logging.conversation_log {
        match EpisodeLogDir::create(&config.logging.dir) {
            Ok(dir) => Some(dir),
            Err(e) => {
                warn!("Episode logs disabled: {}", e);
                None
            }
        }
    } else {
        None
    };

    let logger: Arc<dyn ConversationLogger> = match log_dir
        .as_ref()
        .filter(|_| config.logging.conversation_log)
        .and_then(|dir| JsonlConversationLogger::in_dir(dir.path()))
    {
        Some(logger) => Arc::new(logger),
        None => Arc::new(NoConversationLogger),
    };

    let provider = Arc::new(ProviderRegistry::new(config.providers.clone()));
    let human = Arc::new(StdinHumanInput::stdin());
    let use_case = RunEpisodeUseCase::new(provider, human).with_logger(logger);

    let reporter = TurnReporter::new();
    let progress: &dyn EpisodeProgress = if cli.quiet { &NoProgress } else { &reporter };

    let output = use_case
        .execute_with_progress(RunEpisodeInput::new(spec, catalog), progress)
        .await?;

    println!("{}", ConsoleFormatter::format_outcome(&output));

    if let Some(dir) = log_dir {
        if config.logging.transcript {
            let path = dir.write_transcript(&output.transcript)?;
            println!("Transcript: {}", path.display());
        }
        if config.logging.conversation_log {
            println!("Event log:  {}", dir.path().display());
        }
    }

    Ok(())
}

fn show_config(cli: &Cli, config: &FileConfig) -> Result<()> {
    for line in ConfigLoader::describe_sources(cli.config.as_ref()) {
        println!("{}", line);
    }
    println!();
    println!("Effective configuration:");
    println!(
        "{}",
        toml::to_string_pretty(config).context("Failed to render configuration")?
    );
    if let Err(e) = config.validate() {
        println!("Warning: {}", e);
    }
    Ok(())
}
