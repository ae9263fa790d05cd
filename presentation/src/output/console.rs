//! Console output formatting for episodes

use arena_application::RunEpisodeOutput;
use arena_domain::{TurnRecord, unescape};
use colored::Colorize;

/// Formats episode turns and outcomes for console display.
///
/// Model text arrives escaped (`\$`, `\*`); everything shown to the
/// operator is unescaped here.
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Banner printed before a participant speaks
    pub fn turn_header(iteration: usize, participant: &str) -> String {
        format!(
            "\n{}",
            format!("── [{}] {} ──", iteration, participant).yellow().bold()
        )
    }

    /// Plain text of a reply for display
    pub fn response_text(response: &str) -> String {
        unescape(response)
    }

    /// Trailer printed after a turn: the technique used, if any.
    pub fn turn_footer(turn: &TurnRecord) -> Option<String> {
        turn.technique
            .as_deref()
            .map(|technique| format!("{} {}", "technique:".dimmed(), technique.cyan()))
    }

    /// Complete rendering of one turn, for replies that were not streamed
    pub fn format_turn(turn: &TurnRecord) -> String {
        let mut output = Self::turn_header(turn.iteration, &turn.speaker);
        output.push('\n');
        output.push_str(&Self::response_text(&turn.response));
        output.push('\n');
        if let Some(footer) = Self::turn_footer(turn) {
            output.push_str(&footer);
            output.push('\n');
        }
        output
    }

    /// Final outcome block
    pub fn format_outcome(output: &RunEpisodeOutput) -> String {
        let mut text = String::new();
        text.push_str(&Self::header("Episode Finished"));
        text.push('\n');

        let turns = output.history.turns().count();
        text.push_str(&format!("{} {}\n", "Turns:".cyan().bold(), turns));

        let outcome = match (output.terminated, output.reward) {
            (true, Some(reward)) => format!("objective reached (reward {})", reward)
                .green()
                .bold()
                .to_string(),
            (true, None) => "objective reached".green().bold().to_string(),
            (false, _) if output.truncated => "turn script exhausted".yellow().to_string(),
            _ => "stopped early".red().to_string(),
        };
        text.push_str(&format!("{} {}\n", "Outcome:".cyan().bold(), outcome));

        if let Some(ref summary) = output.summary {
            text.push_str(&format!("\n{}\n", unescape(summary)));
        }

        text.push_str(&Self::footer());
        text
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("\n{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn footer() -> String {
        format!("{}\n", "=".repeat(60).cyan())
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
    use arena_domain::{History, ParticipantRole, SettingsSnapshot};

    fn plain() {
        colored::control::set_override(false);
    }

    fn turn(technique: Option<&str>) -> TurnRecord {
        TurnRecord {
            iteration: 2,
            speaker: "donor".to_string(),
            speaker_role: ParticipantRole::User,
            response: "I can give \\$20 \\*today\\*".to_string(),
            reward: None,
            terminated: false,
            truncated: false,
            action: "Human".to_string(),
            technique: technique.map(str::to_string),
        }
    }

    #[test]
    fn test_format_turn_unescapes() {
        plain();
        let text = ConsoleFormatter::format_turn(&turn(None));
        assert!(text.contains("── [2] donor ──"));
        assert!(text.contains("I can give $20 *today*"));
        assert!(!text.contains("technique:"));
    }

    #[test]
    fn test_turn_footer_names_technique() {
        plain();
        let footer = ConsoleFormatter::turn_footer(&turn(Some("Social Proof"))).unwrap();
        assert_eq!(footer, "technique: Social Proof");
    }

    #[test]
    fn test_format_outcome() {
        plain();
        let output = RunEpisodeOutput {
            history: History::new(SettingsSnapshot::default()),
            transcript: String::new(),
            terminated: true,
            truncated: false,
            reward: Some(20),
            summary: Some("The user is willing to donate \\$20!".to_string()),
        };
        let text = ConsoleFormatter::format_outcome(&output);
        assert!(text.contains("objective reached (reward 20)"));
        assert!(text.contains("The user is willing to donate $20!"));
    }

    #[test]
    fn test_format_outcome_truncated() {
        plain();
        let output = RunEpisodeOutput {
            history: History::new(SettingsSnapshot::default()),
            transcript: String::new(),
            terminated: false,
            truncated: true,
            reward: None,
            summary: None,
        };
        assert!(ConsoleFormatter::format_outcome(&output).contains("turn script exhausted"));
    }

    #[test]
    fn test_indent() {
        assert_eq!(ConsoleFormatter::indent("a\nb", "  "), "  a\n  b");
    }
}
