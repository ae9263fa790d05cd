//! Human-readable transcript rendering

use super::history::History;

const SEPARATOR: &str = "------------------ \n";

/// Render settings and every turn as plain text.
///
/// ```text
/// Game Settings
///
/// Player 1 Settings:
///     player: assistant
///     model: GPT-4o-mini
///     action: Random
///     external_id: None
///
/// ------------------
/// Current Iteration: 0
/// Player: assistant
/// Response: Hello!
/// Persuasion Technique: None
/// ```
pub fn render_transcript(history: &History) -> String {
    let mut out = String::from("Game Settings\n\n");

    if let Some(settings) = history.settings() {
        for (idx, player) in settings.players.iter().enumerate() {
            out.push_str(&format!("Player {} Settings:\n", idx + 1));
            out.push_str(&format!("\tplayer: {}\n", player.player));
            out.push_str(&format!("\tmodel: {}\n", player.model));
            out.push_str(&format!("\taction: {}\n", player.action));
            out.push_str(&format!(
                "\texternal_id: {}\n\n",
                player.external_id.as_deref().unwrap_or("None")
            ));
        }
    }
    out.push_str(SEPARATOR);

    for turn in history.turns() {
        out.push_str(&format!("Current Iteration: {}\n", turn.iteration));
        out.push_str(&format!("Player: {}\n", turn.speaker));
        out.push_str(&format!("Response: {}\n", turn.response));
        out.push_str(&format!(
            "Persuasion Technique: {}\n\n",
            turn.technique.as_deref().unwrap_or("None")
        ));
    }

    out
}
