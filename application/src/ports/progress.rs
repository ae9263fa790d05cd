//! Progress notification port
//!
//! Defines the interface for reporting turns while an episode runs.

use arena_domain::TurnRecord;

/// Callback for progress updates during an episode
///
/// Implementations live in the presentation layer.
pub trait EpisodeProgress: Send + Sync {
    /// Called before a participant's turn is produced
    fn on_turn_start(&self, _iteration: usize, _participant: &str) {}

    /// Called for each text fragment of a model reply as it arrives.
    fn on_fragment(&self, _participant: &str, _fragment: &str) {}

    /// Called once a turn has been appended to the history
    fn on_turn_complete(&self, turn: &TurnRecord);

    /// Called with the terminal summary when the objective is reached
    fn on_terminated(&self, _summary: &str) {}

    /// Called when the transit script runs out without termination
    fn on_truncated(&self, _turns: usize) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl EpisodeProgress for NoProgress {
    fn on_turn_complete(&self, _turn: &TurnRecord) {}
}
