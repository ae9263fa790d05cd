//! Run Episode use case
//!
//! Drives one episode from the first slot to a terminal state, fetching human
//! turns through [`HumanInputPort`] and reporting each turn as it completes.

use crate::episode::{Episode, EpisodeError, ResponseOutcome};
use crate::ports::conversation_logger::{ConversationLogger, NoConversationLogger};
use crate::ports::human_input::{HumanInputError, HumanInputPort};
use crate::ports::model_provider::ModelProvider;
use crate::ports::progress::{EpisodeProgress, NoProgress};
use arena_domain::{EpisodeSpec, History, TechniqueCatalog};
use futures::StreamExt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum RunEpisodeError {
    #[error(transparent)]
    Episode(#[from] EpisodeError),

    #[error("Human input failed: {0}")]
    HumanInput(#[from] HumanInputError),
}

/// Input for the RunEpisode use case
#[derive(Debug, Clone)]
pub struct RunEpisodeInput {
    pub spec: EpisodeSpec,
    pub catalog: Arc<TechniqueCatalog>,
}

impl RunEpisodeInput {
    pub fn new(spec: EpisodeSpec, catalog: Arc<TechniqueCatalog>) -> Self {
        Self { spec, catalog }
    }
}

/// Final state of a finished episode
#[derive(Debug, Clone)]
pub struct RunEpisodeOutput {
    pub history: History,
    /// Plain-text rendering, as produced by `Episode::log_state`
    pub transcript: String,
    pub terminated: bool,
    pub truncated: bool,
    pub reward: Option<u64>,
    /// Terminal summary when the objective was reached
    pub summary: Option<String>,
}

/// Use case for running an episode to completion
pub struct RunEpisodeUseCase {
    provider: Arc<dyn ModelProvider>,
    human: Arc<dyn HumanInputPort>,
    logger: Arc<dyn ConversationLogger>,
}

impl RunEpisodeUseCase {
    pub fn new(provider: Arc<dyn ModelProvider>, human: Arc<dyn HumanInputPort>) -> Self {
        Self {
            provider,
            human,
            logger: Arc::new(NoConversationLogger),
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, input: RunEpisodeInput) -> Result<RunEpisodeOutput, RunEpisodeError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: RunEpisodeInput,
        progress: &dyn EpisodeProgress,
    ) -> Result<RunEpisodeOutput, RunEpisodeError> {
        let mut episode = Episode::from_spec(&input.spec, input.catalog, self.provider.as_ref())
            .await?
            .with_logger(Arc::clone(&self.logger));

        info!(
            participants = episode.participants().len(),
            slots = episode.transit().len(),
            "Starting episode"
        );

        while !episode.is_over() {
            let action = episode.sample_action()?;
            let Some(speaker) = episode.current_participant().map(|p| p.name().to_string()) else {
                break;
            };
            progress.on_turn_start(episode.iteration(), &speaker);

            let (technique, text) = match episode.get_response(&action).await? {
                ResponseOutcome::AwaitingInput { participant } => {
                    debug!(participant = %participant, "Waiting for human input");
                    let previous = episode.history().previous_response().to_string();
                    let text = self.human.request_input(&participant, &previous).await?;
                    (None, text)
                }
                ResponseOutcome::Ready {
                    technique,
                    response,
                } => {
                    let mut fragments = response.into_fragments();
                    let mut text = String::new();
                    while let Some(fragment) = fragments.next().await {
                        let fragment = fragment.map_err(EpisodeError::from)?;
                        progress.on_fragment(&speaker, &fragment);
                        text.push_str(&fragment);
                    }
                    (technique, text)
                }
            };

            let result = episode.step_with_response(technique, text)?;
            if let Some(turn) = episode.history().last_turn() {
                progress.on_turn_complete(turn);
            }

            if result.terminated {
                if let Some(summary) = episode.after_end_state() {
                    progress.on_terminated(&summary);
                }
            } else if result.truncated {
                progress.on_truncated(episode.history().turns().count());
            }
        }

        let last = episode.history().last_turn();
        Ok(RunEpisodeOutput {
            terminated: last.is_some_and(|t| t.terminated),
            truncated: last.is_some_and(|t| t.truncated),
            reward: last.and_then(|t| t.reward),
            summary: episode.after_end_state(),
            transcript: episode.log_state(),
            history: episode.history().clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::llm_gateway::{GatewayError, LlmGateway};
    use crate::testing::{ScriptedGateway, ScriptedHumanInput};
    use arena_domain::{
        BackendSpec, GenerationParams, ParticipantRole, ParticipantSpec, StrategySpec,
        TechniqueSelector, TransitScript, TurnRecord,
    };
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct OneGatewayProvider {
        gateway: Arc<ScriptedGateway>,
    }

    #[async_trait]
    impl ModelProvider for OneGatewayProvider {
        async fn connect(
            &self,
            _backend: &BackendSpec,
            _params: &GenerationParams,
        ) -> Result<Arc<dyn LlmGateway>, GatewayError> {
            Ok(self.gateway.clone())
        }
    }

    #[derive(Default)]
    struct RecordingProgress {
        turns: Mutex<Vec<String>>,
        fragments: Mutex<usize>,
        summary: Mutex<Option<String>>,
        truncated: Mutex<Option<usize>>,
    }

    impl EpisodeProgress for RecordingProgress {
        fn on_fragment(&self, _participant: &str, _fragment: &str) {
            *self.fragments.lock().unwrap() += 1;
        }

        fn on_turn_complete(&self, turn: &TurnRecord) {
            self.turns.lock().unwrap().push(turn.speaker.clone());
        }

        fn on_terminated(&self, summary: &str) {
            *self.summary.lock().unwrap() = Some(summary.to_string());
        }

        fn on_truncated(&self, turns: usize) {
            *self.truncated.lock().unwrap() = Some(turns);
        }
    }

    fn catalog() -> Arc<TechniqueCatalog> {
        Arc::new(TechniqueCatalog::from_jsonl(r#"{"technique": "Logical Appeal"}"#).unwrap())
    }

    fn donation_spec(stream: bool, rounds: usize) -> EpisodeSpec {
        let solicitor = ParticipantSpec::new(
            "assistant",
            ParticipantRole::Assistant,
            BackendSpec::openai("GPT-4o-mini"),
            StrategySpec::therapy(TechniqueSelector::Random),
        )
        .with_generation(GenerationParams {
            stream,
            ..GenerationParams::default()
        });
        let donor = ParticipantSpec::new(
            "user",
            ParticipantRole::User,
            BackendSpec::Human,
            StrategySpec::human(),
        );
        EpisodeSpec::new(
            vec![solicitor, donor],
            TransitScript::alternating("assistant", "user", rounds, false).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_human_pledge_ends_episode() {
        let gateway = Arc::new(ScriptedGateway::repeating("Will you help?").with_chunk_size(4));
        let human = Arc::new(ScriptedHumanInput::new([
            "Not today.",
            "Okay, I will donate $20.",
            "Happy to help.",
            "unused",
        ]));
        let use_case = RunEpisodeUseCase::new(
            Arc::new(OneGatewayProvider {
                gateway: gateway.clone(),
            }),
            human.clone(),
        );
        let progress = RecordingProgress::default();

        let output = use_case
            .execute_with_progress(
                RunEpisodeInput::new(donation_spec(true, 4), catalog()),
                &progress,
            )
            .await
            .unwrap();

        assert!(output.terminated);
        assert!(!output.truncated);
        assert_eq!(output.reward, Some(20));
        assert!(output.summary.as_deref().unwrap().contains("$20"));
        assert_eq!(
            *progress.turns.lock().unwrap(),
            vec!["assistant", "user", "assistant", "user", "assistant", "user"]
        );
        assert!(*progress.fragments.lock().unwrap() > 3);
        assert!(progress.summary.lock().unwrap().is_some());
        assert_eq!(*progress.truncated.lock().unwrap(), None);
        assert_eq!(gateway.calls(), 3);

        let prompts = human.prompts();
        assert_eq!(prompts.len(), 3);
        assert_eq!(prompts[0], ("user".to_string(), "Will you help?".to_string()));
        assert!(output.transcript.contains("Response: Okay, I will donate $20."));
        assert_eq!(
            output.history.last_turn().map(|t| t.response.as_str()),
            Some("Happy to help.")
        );
    }

    #[tokio::test]
    async fn test_truncation_is_reported() {
        let gateway = Arc::new(ScriptedGateway::repeating("Will you help?"));
        let human = Arc::new(ScriptedHumanInput::new(["no", "no", "no"]));
        let use_case = RunEpisodeUseCase::new(Arc::new(OneGatewayProvider { gateway }), human);
        let progress = RecordingProgress::default();

        let output = use_case
            .execute_with_progress(
                RunEpisodeInput::new(donation_spec(false, 3), catalog()),
                &progress,
            )
            .await
            .unwrap();

        assert!(!output.terminated);
        assert!(output.truncated);
        assert_eq!(output.reward, None);
        assert_eq!(output.summary, None);
        assert_eq!(*progress.truncated.lock().unwrap(), Some(6));
        assert_eq!(output.history.turns().count(), 6);
    }

    #[tokio::test]
    async fn test_cancelled_input_aborts() {
        let gateway = Arc::new(ScriptedGateway::repeating("Will you help?"));
        let human = Arc::new(ScriptedHumanInput::new(Vec::<String>::new()));
        let use_case = RunEpisodeUseCase::new(Arc::new(OneGatewayProvider { gateway }), human);

        let err = use_case
            .execute(RunEpisodeInput::new(donation_spec(false, 3), catalog()))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RunEpisodeError::HumanInput(HumanInputError::Cancelled)
        ));
    }
}
