//! Presentation layer for dialogue-arena
//!
//! This crate contains the CLI definition, console output formatting, live
//! turn reporting and the terminal adapter for human participants.

pub mod cli;
pub mod input;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::Cli;
pub use input::stdin::{LineHumanInput, StdinHumanInput};
pub use output::console::ConsoleFormatter;
pub use progress::reporter::TurnReporter;
