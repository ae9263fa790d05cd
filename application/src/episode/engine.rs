//! Turn-schedule engine.
//!
//! [`Episode`] walks the transit script one slot per step. Each step asks the
//! due participant's strategy for an action, obtains a reply (from the model,
//! the initial message, or the caller for human turns), records it in the
//! speaker's own transcript and in the history, and evaluates termination.

use super::model_adapter::ModelAdapter;
use super::participant::Participant;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::llm_gateway::{ChatResponse, GatewayError, StreamHandle};
use crate::ports::model_provider::ModelProvider;
use arena_domain::{
    Action, ActionContext, ActionStrategy, DomainError, EpisodeSpec, History, SettingsSnapshot,
    TechniqueCatalog, TerminationDetector, TransitScript, TurnRecord, extract_tagged_response,
    preview, render_transcript,
};
use serde::Serialize;
use serde_json::json;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum EpisodeError {
    #[error("Configuration error: {0}")]
    Config(#[from] DomainError),

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Episode is already over")]
    EpisodeOver,
}

/// Reply obtained for the current slot
#[derive(Debug)]
pub enum ResponseOutcome {
    Ready {
        technique: Option<String>,
        response: ChatResponse,
    },
    /// A human-operated participant is due; no backend was called
    AwaitingInput { participant: String },
}

/// Who spoke and who is due next
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepInfo {
    pub speaker: String,
    /// `None` once the transit script is exhausted
    pub next_participant: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepResult {
    pub response: String,
    pub reward: Option<u64>,
    pub terminated: bool,
    pub truncated: bool,
    pub info: StepInfo,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Completed(StepResult),
    /// Supply the participant's text through `step` and call again
    AwaitingInput { participant: String },
}

/// Episode-wide settings
#[derive(Debug, Clone)]
pub struct EpisodeOptions {
    pub init_message: Option<String>,
    pub persuasion: bool,
    pub word_limit: usize,
}

impl Default for EpisodeOptions {
    fn default() -> Self {
        Self {
            init_message: None,
            persuasion: false,
            word_limit: 100,
        }
    }
}

pub struct Episode {
    participants: Vec<Participant>,
    index: HashMap<String, usize>,
    transit: TransitScript,
    options: EpisodeOptions,
    detector: Box<dyn TerminationDetector>,
    history: History,
    state: usize,
    finished: bool,
    logger: Arc<dyn ConversationLogger>,
}

impl Episode {
    /// Assemble an episode. Names must be unique and every transit slot must
    /// name one of `participants`.
    pub fn new(
        participants: Vec<Participant>,
        transit: TransitScript,
        options: EpisodeOptions,
        detector: Box<dyn TerminationDetector>,
    ) -> Result<Self, EpisodeError> {
        let mut index = HashMap::new();
        for (i, p) in participants.iter().enumerate() {
            if index.insert(p.name().to_string(), i).is_some() {
                return Err(DomainError::DuplicateParticipant(p.name().to_string()).into());
            }
        }
        let declared: HashSet<&str> = index.keys().map(String::as_str).collect();
        transit.ensure_declared(&declared)?;

        let settings = SettingsSnapshot {
            players: participants.iter().map(Participant::settings).collect(),
        };

        Ok(Self {
            participants,
            index,
            transit,
            options,
            detector,
            history: History::new(settings),
            state: 0,
            finished: false,
            logger: Arc::new(NoConversationLogger),
        })
    }

    /// Build every participant from configuration.
    ///
    /// Strategies are validated against `catalog` and backends are resolved
    /// through `provider` before the first turn, so configuration mistakes
    /// surface here.
    pub async fn from_spec(
        spec: &EpisodeSpec,
        catalog: Arc<TechniqueCatalog>,
        provider: &dyn ModelProvider,
    ) -> Result<Self, EpisodeError> {
        spec.validate()?;

        let mut participants = Vec::with_capacity(spec.participants.len());
        for p in &spec.participants {
            let strategy = ActionStrategy::from_spec(&p.strategy, Arc::clone(&catalog))?;
            let gateway = provider.connect(&p.backend, &p.generation).await?;
            debug!(
                participant = %p.name,
                backend = %p.backend,
                strategy = %strategy.descriptor(),
                "Participant ready"
            );
            participants.push(Participant::from_spec(
                p,
                ModelAdapter::new(gateway, &p.generation),
                strategy,
            ));
        }

        Self::new(
            participants,
            spec.transit.clone(),
            EpisodeOptions {
                init_message: spec.init_message.clone(),
                persuasion: spec.persuasion,
                word_limit: spec.word_limit,
            },
            spec.scenario.detector(),
        )
    }

    pub fn with_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self.logger.log(ConversationEvent::new(
            "episode_started",
            json!({
                "settings": self.history.settings(),
                "transit": self.transit.iter().collect::<Vec<_>>(),
                "persuasion": self.options.persuasion,
                "word_limit": self.options.word_limit,
            }),
        ));
        self
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn participant(&self, name: &str) -> Option<&Participant> {
        self.index.get(name).map(|&i| &self.participants[i])
    }

    /// Index of the slot due to act
    pub fn iteration(&self) -> usize {
        self.state
    }

    pub fn transit(&self) -> &TransitScript {
        &self.transit
    }

    /// Terminated, truncated, or past the last slot
    pub fn is_over(&self) -> bool {
        self.finished || self.is_truncated()
    }

    pub fn is_truncated(&self) -> bool {
        self.state >= self.transit.len()
    }

    /// Participant due to act, or `None` once the transit script is exhausted
    pub fn current_participant(&self) -> Option<&Participant> {
        self.transit.get(self.state).and_then(|name| self.participant(name))
    }

    /// Name of the participant due to act after the current one
    pub fn get_next_player(&self) -> Option<&str> {
        self.transit.get(self.state + 1)
    }

    /// Current speaker and the one after, or `None` once the episode is over
    pub fn get_info(&self) -> Option<StepInfo> {
        if self.is_over() {
            return None;
        }
        self.transit.get(self.state).map(|speaker| StepInfo {
            speaker: speaker.to_string(),
            next_participant: self.get_next_player().map(str::to_string),
        })
    }

    /// Whether the objective is reached: recorded on the last turn, or
    /// reported by the detector over the current history.
    pub fn is_end_state(&self) -> bool {
        self.recorded_termination().is_some() || self.detector.evaluate(&self.history).terminated
    }

    /// Reward earned so far; `None` until the objective is reached
    pub fn get_reward(&self) -> Option<u64> {
        if let Some(turn) = self.recorded_termination() {
            return turn.reward;
        }
        let outcome = self.detector.evaluate(&self.history);
        if outcome.terminated { outcome.reward } else { None }
    }

    fn recorded_termination(&self) -> Option<&TurnRecord> {
        self.history.last_turn().filter(|t| t.terminated)
    }

    /// Terminal summary, available once the episode terminated
    pub fn after_end_state(&self) -> Option<String> {
        self.recorded_termination()
            .and_then(|t| t.reward)
            .map(|reward| self.detector.after_end_state(reward))
    }

    /// Plain-text rendering of settings and all turns
    pub fn log_state(&self) -> String {
        render_transcript(&self.history)
    }

    fn current_index(&self) -> Result<usize, EpisodeError> {
        if self.is_over() {
            return Err(EpisodeError::EpisodeOver);
        }
        let name = self.transit.get(self.state).ok_or(EpisodeError::EpisodeOver)?;
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| DomainError::UnknownParticipant(name.to_string()).into())
    }

    /// Action from the due participant's strategy. Does not touch the history.
    pub fn sample_action(&self) -> Result<Action, EpisodeError> {
        let idx = self.current_index()?;
        Ok(self.participants[idx].strategy().sample())
    }

    /// Obtain the reply for the current slot without recording it.
    ///
    /// Slot 0 answers with the initial message when one is configured. Human
    /// actions return [`ResponseOutcome::AwaitingInput`]. With persuasion
    /// enabled the reply is materialized, split into technique and response,
    /// and handed back as a one-element stream.
    pub async fn get_response(
        &mut self,
        action: &Action,
    ) -> Result<ResponseOutcome, EpisodeError> {
        let idx = self.current_index()?;

        let raw = match (&self.options.init_message, self.state) {
            (Some(message), 0) => ChatResponse::Text(message.clone()),
            _ => {
                let participant = &mut self.participants[idx];
                let ctx = ActionContext {
                    previous_message: self.history.previous_response(),
                    persona: participant.persona(),
                    transcript: participant.transcript(),
                    persuasion: self.options.persuasion,
                    word_limit: self.options.word_limit,
                };
                let Some(prompt) = action.render(&ctx) else {
                    return Ok(ResponseOutcome::AwaitingInput {
                        participant: participant.name().to_string(),
                    });
                };
                debug!(
                    participant = participant.name(),
                    iteration = self.state,
                    action = %action,
                    "Rendered directive prompt"
                );
                participant.chat(prompt).await?
            }
        };

        if !self.options.persuasion {
            return Ok(ResponseOutcome::Ready {
                technique: None,
                response: raw,
            });
        }

        let parsed = extract_tagged_response(&raw.into_text().await?);
        debug!(technique = ?parsed.technique, "Parsed tagged response");
        Ok(ResponseOutcome::Ready {
            technique: parsed.technique,
            response: ChatResponse::Stream(StreamHandle::from_text(parsed.response)),
        })
    }

    /// Complete the current slot.
    ///
    /// Without a supplied `response` the reply is obtained through
    /// [`get_response`](Self::get_response); a human turn then yields
    /// [`StepOutcome::AwaitingInput`] and nothing is recorded.
    pub async fn step(
        &mut self,
        action: &Action,
        technique: Option<String>,
        response: Option<String>,
    ) -> Result<StepOutcome, EpisodeError> {
        let (technique, text) = match response {
            Some(text) => (technique, text),
            None => match self.get_response(action).await? {
                ResponseOutcome::AwaitingInput { participant } => {
                    return Ok(StepOutcome::AwaitingInput { participant });
                }
                ResponseOutcome::Ready {
                    technique,
                    response,
                } => (technique, response.into_text().await?),
            },
        };
        self.step_with_response(technique, text).map(StepOutcome::Completed)
    }

    /// Record `text` as the current participant's turn and advance.
    pub fn step_with_response(
        &mut self,
        technique: Option<String>,
        text: String,
    ) -> Result<StepResult, EpisodeError> {
        let idx = self.current_index()?;
        let speaker = &mut self.participants[idx];
        speaker.record_reply(text.clone());

        let record = TurnRecord {
            iteration: self.state,
            speaker: speaker.name().to_string(),
            speaker_role: speaker.role(),
            response: text,
            reward: None,
            terminated: false,
            truncated: false,
            action: speaker.strategy().descriptor(),
            technique,
        };
        let truncated = self.transit.is_last(self.state);
        let settled = self.history.record_turn(record, self.detector.as_ref(), truncated);

        let info = StepInfo {
            speaker: settled.speaker.clone(),
            next_participant: self.get_next_player().map(str::to_string),
        };

        info!(
            iteration = settled.iteration,
            speaker = %settled.speaker,
            terminated = settled.terminated,
            truncated = settled.truncated,
            response = %preview(&settled.response, 60),
            "Turn completed"
        );
        self.logger.log(ConversationEvent::new(
            "turn_completed",
            json!({ "turn": &settled, "next": &info.next_participant }),
        ));

        if settled.is_terminal() {
            self.finished = true;
            let summary = self.after_end_state();
            if let Some(summary) = &summary {
                info!(reward = ?settled.reward, "{}", summary);
            }
            self.logger.log(ConversationEvent::new(
                "episode_finished",
                json!({
                    "terminated": settled.terminated,
                    "truncated": settled.truncated,
                    "reward": settled.reward,
                    "summary": summary,
                    "turns": self.history.turns().count(),
                }),
            ));
        }

        self.state += 1;

        Ok(StepResult {
            response: settled.response,
            reward: settled.reward,
            terminated: settled.terminated,
            truncated: settled.truncated,
            info,
        })
    }
}

impl std::fmt::Debug for Episode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Episode")
            .field("participants", &self.participants)
            .field("transit", &self.transit)
            .field("options", &self.options)
            .field("state", &self.state)
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}
