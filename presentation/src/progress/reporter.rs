//! Live turn reporting while an episode runs

use crate::output::console::ConsoleFormatter;
use arena_application::EpisodeProgress;
use arena_domain::TurnRecord;
use colored::Colorize;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};

/// Prints each turn as it happens, streaming model fragments inline.
#[derive(Default)]
pub struct TurnReporter {
    /// Set once a fragment of the current turn has been printed
    streamed: AtomicBool,
}

impl TurnReporter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EpisodeProgress for TurnReporter {
    fn on_turn_start(&self, iteration: usize, participant: &str) {
        self.streamed.store(false, Ordering::Relaxed);
        println!("{}", ConsoleFormatter::turn_header(iteration, participant));
    }

    fn on_fragment(&self, _participant: &str, fragment: &str) {
        self.streamed.store(true, Ordering::Relaxed);
        print!("{}", ConsoleFormatter::response_text(fragment));
        let _ = io::stdout().flush();
    }

    fn on_turn_complete(&self, turn: &TurnRecord) {
        if self.streamed.swap(false, Ordering::Relaxed) {
            println!();
        }
        if let Some(footer) = ConsoleFormatter::turn_footer(turn) {
            println!("{}", footer);
        }
    }

    fn on_terminated(&self, _summary: &str) {
        println!("\n{}", "Objective reached.".green().bold());
    }

    fn on_truncated(&self, turns: usize) {
        println!(
            "\n{}",
            format!("Turn script exhausted after {} turns.", turns).yellow()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_domain::ParticipantRole;

    #[test]
    fn test_stream_flag_resets_per_turn() {
        let reporter = TurnReporter::new();
        reporter.on_turn_start(0, "therapist");
        reporter.on_fragment("therapist", "Hello");
        assert!(reporter.streamed.load(Ordering::Relaxed));
        reporter.on_turn_complete(&TurnRecord {
            iteration: 0,
            speaker: "therapist".to_string(),
            speaker_role: ParticipantRole::Assistant,
            response: "Hello".to_string(),
            reward: None,
            terminated: false,
            truncated: false,
            action: "Random".to_string(),
            technique: None,
        });
        assert!(!reporter.streamed.load(Ordering::Relaxed));
    }
}
