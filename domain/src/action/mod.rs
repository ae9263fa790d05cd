//! Per-turn actions.
//!
//! An [`ActionStrategy`] belongs to a participant and produces one [`Action`]
//! per turn. A directive action renders the prompt sent to the participant's
//! model; the human sentinel tells the engine to wait for supplied text.

mod parser;
mod strategy;

pub use parser::{TaggedResponse, extract_tagged_response};
pub use strategy::{ActionStrategy, StrategySpec};

use crate::catalog::{Technique, TechniqueCatalog};
use crate::prompt::PromptTemplate;
use crate::session::entities::Transcript;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Inputs available when rendering a directive
#[derive(Debug, Clone, Copy)]
pub struct ActionContext<'a> {
    /// Response text of the previous turn ("" on the first turn)
    pub previous_message: &'a str,
    pub persona: &'a BTreeMap<String, String>,
    pub transcript: &'a Transcript,
    /// Whether persuasion techniques are offered to the model
    pub persuasion: bool,
    pub word_limit: usize,
}

/// One turn's action
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Build a prompt for a model-backed participant
    Directive {
        /// Technique chosen for this turn, if technique use is enabled
        technique: Option<Technique>,
        catalog: Arc<TechniqueCatalog>,
    },
    /// Wait for externally supplied text
    HumanInput,
}

impl Action {
    pub const HUMAN_INPUT: &'static str = "Human-input";

    pub fn is_human(&self) -> bool {
        matches!(self, Action::HumanInput)
    }

    /// Name of the technique this action selected
    pub fn technique_name(&self) -> Option<&str> {
        match self {
            Action::Directive {
                technique: Some(t), ..
            } => Some(t.name()),
            _ => None,
        }
    }

    /// Render the directive prompt. The human sentinel renders nothing.
    pub fn render(&self, ctx: &ActionContext<'_>) -> Option<String> {
        match self {
            Action::Directive { catalog, .. } => Some(if ctx.persuasion {
                PromptTemplate::therapy_with_techniques(
                    ctx.previous_message,
                    &catalog.render_options(),
                    ctx.word_limit,
                )
            } else {
                PromptTemplate::therapy(ctx.previous_message, ctx.word_limit)
            }),
            Action::HumanInput => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Directive { .. } => {
                write!(f, "Directive({})", self.technique_name().unwrap_or("None"))
            }
            Action::HumanInput => write!(f, "{}", Self::HUMAN_INPUT),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::sample_catalog;

    fn ctx<'a>(
        persona: &'a BTreeMap<String, String>,
        transcript: &'a Transcript,
        persuasion: bool,
    ) -> ActionContext<'a> {
        ActionContext {
            previous_message: "I'm not sure.",
            persona,
            transcript,
            persuasion,
            word_limit: 50,
        }
    }

    #[test]
    fn test_directive_renders_matching_template() {
        let catalog = Arc::new(sample_catalog());
        let action = Action::Directive {
            technique: catalog.get(1).cloned(),
            catalog: catalog.clone(),
        };
        let persona = BTreeMap::new();
        let transcript = Transcript::new();

        let plain = action.render(&ctx(&persona, &transcript, false)).unwrap();
        assert!(plain.contains("\"I'm not sure.\""));
        assert!(!plain.contains("Reciprocity"));

        let tagged = action.render(&ctx(&persona, &transcript, true)).unwrap();
        assert!(tagged.contains("3. Reciprocity"));
        assert!(tagged.contains("<response>"));
    }

    #[test]
    fn test_human_input_renders_nothing() {
        let persona = BTreeMap::new();
        let transcript = Transcript::new();
        assert_eq!(
            Action::HumanInput.render(&ctx(&persona, &transcript, true)),
            None
        );
    }

    #[test]
    fn test_display_distinguishes_human_input() {
        let catalog = Arc::new(sample_catalog());
        let directive = Action::Directive {
            technique: catalog.get(0).cloned(),
            catalog: catalog.clone(),
        };
        let disabled = Action::Directive {
            technique: None,
            catalog,
        };
        assert_eq!(Action::HumanInput.to_string(), "Human-input");
        assert_eq!(directive.to_string(), "Directive(Evidence-based Persuasion)");
        assert_eq!(disabled.to_string(), "Directive(None)");
        assert_ne!(directive.to_string(), Action::HumanInput.to_string());
    }
}
