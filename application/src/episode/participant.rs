//! Participant agent

use super::model_adapter::ModelAdapter;
use crate::ports::llm_gateway::{ChatResponse, GatewayError};
use arena_domain::{
    ActionStrategy, BackendSpec, ParticipantRole, ParticipantSpec, PlayerSettings, Transcript,
};
use std::collections::BTreeMap;

/// One side of the dialogue: identity, model adapter and first-person memory.
#[derive(Debug)]
pub struct Participant {
    name: String,
    role: ParticipantRole,
    backend: BackendSpec,
    adapter: ModelAdapter,
    transcript: Transcript,
    strategy: ActionStrategy,
    persona: BTreeMap<String, String>,
    external_id: Option<String>,
}

impl Participant {
    /// Build from configuration. The transcript starts with the system
    /// preamble when one is set.
    pub fn from_spec(spec: &ParticipantSpec, adapter: ModelAdapter, strategy: ActionStrategy) -> Self {
        Self {
            name: spec.name.clone(),
            role: spec.role,
            backend: spec.backend.clone(),
            adapter,
            transcript: Transcript::with_system_prompt(&spec.system),
            strategy,
            persona: spec.persona.clone(),
            external_id: spec.external_id.clone(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> ParticipantRole {
        self.role
    }

    pub fn backend(&self) -> &BackendSpec {
        &self.backend
    }

    pub fn strategy(&self) -> &ActionStrategy {
        &self.strategy
    }

    pub fn persona(&self) -> &BTreeMap<String, String> {
        &self.persona
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn external_id(&self) -> Option<&str> {
        self.external_id.as_deref()
    }

    /// Append `prompt` as a user entry and ask the model.
    ///
    /// The reply is not recorded here; call [`record_reply`](Self::record_reply)
    /// once its full text is known.
    pub async fn chat(&mut self, prompt: impl Into<String>) -> Result<ChatResponse, GatewayError> {
        self.transcript.push_user(prompt);
        self.adapter.chat(self.transcript.messages()).await
    }

    /// Append what this participant said as an assistant entry
    pub fn record_reply(&mut self, text: impl Into<String>) {
        self.transcript.push_assistant(text);
    }

    pub(crate) fn settings(&self) -> PlayerSettings {
        PlayerSettings {
            player: self.name.clone(),
            model: self.backend.model_label().to_string(),
            action: self.strategy.descriptor(),
            external_id: self.external_id.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedGateway;
    use arena_domain::{GenerationParams, Role, StrategySpec, TechniqueCatalog};
    use std::sync::Arc;

    fn participant(gateway: Arc<ScriptedGateway>) -> Participant {
        let spec = ParticipantSpec::new(
            "user",
            ParticipantRole::User,
            BackendSpec::openai("GPT-4o-mini"),
            StrategySpec::human(),
        )
        .with_system("You have $500.")
        .with_external_id("P-1");
        let catalog = Arc::new(TechniqueCatalog::from_jsonl(r#"{"technique": "Priming"}"#).unwrap());
        let strategy = ActionStrategy::from_spec(&spec.strategy, catalog).unwrap();
        Participant::from_spec(
            &spec,
            ModelAdapter::new(gateway, &GenerationParams::default()),
            strategy,
        )
    }

    #[tokio::test]
    async fn test_chat_appends_prompt_but_not_reply() {
        let gateway = Arc::new(ScriptedGateway::new(["Hello there"]));
        let mut p = participant(gateway.clone());

        let reply = p.chat("Say hi").await.unwrap().into_text().await.unwrap();
        assert_eq!(reply, "Hello there");

        let roles: Vec<Role> = p.transcript().messages().iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::System, Role::User]);
        assert_eq!(gateway.seen()[0].len(), 2);

        p.record_reply(reply);
        assert_eq!(p.transcript().last().unwrap().role, Role::Assistant);
    }

    #[test]
    fn test_settings_snapshot() {
        let p = participant(Arc::new(ScriptedGateway::new(Vec::<String>::new())));
        let settings = p.settings();
        assert_eq!(settings.player, "user");
        assert_eq!(settings.model, "GPT-4o-mini");
        assert_eq!(settings.action, "Human");
        assert_eq!(settings.external_id.as_deref(), Some("P-1"));
    }
}
