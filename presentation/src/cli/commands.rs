//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for dialogue-arena
#[derive(Parser, Debug)]
#[command(name = "dialogue-arena")]
#[command(author, version, about = "Run scripted multi-party dialogues between models and humans")]
#[command(long_about = r#"
Dialogue Arena runs one scripted conversation episode between language-model
and human participants, following a fixed turn order.

Each model turn is driven by the participant's action strategy; with
persuasion enabled the persuader is offered techniques from the catalog.
The episode ends when the donation objective is detected or the turn script
runs out.

Configuration files are loaded from (in priority order):
1. ARENA_* environment variables (ARENA_EPISODE__WORD_LIMIT=80)
2. --config <path>     Explicit config file
3. ./arena.toml        Project-level config
4. ~/.config/dialogue-arena/config.toml   Global config

Example:
  dialogue-arena --config donation.toml
  dialogue-arena --config donation.toml --log-dir runs -v
"#)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration sources and the effective configuration, then exit
    #[arg(long)]
    pub show_config: bool,

    /// Technique catalog (JSONL); overrides `catalog.path`
    #[arg(long, value_name = "PATH")]
    pub catalog: Option<PathBuf>,

    /// Directory for episode logs; overrides `logging.dir`
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only print the final outcome
    #[arg(short, long)]
    pub quiet: bool,
}
