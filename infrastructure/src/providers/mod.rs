//! Model backends
//!
//! [`ProviderRegistry`] implements the `ModelProvider` port: it turns a
//! participant's [`BackendSpec`] into a gateway, sharing one client per
//! provider across participants.

pub mod bedrock;
pub mod human;
pub mod openai;

use crate::config::FileProvidersConfig;
use arena_application::ports::llm_gateway::{GatewayError, LlmGateway};
use arena_application::ports::model_provider::ModelProvider;
use arena_domain::{BackendSpec, GenerationParams};
use async_trait::async_trait;
use human::HumanGateway;
use std::fmt;
use std::sync::Arc;
use tracing::info;

#[cfg(feature = "openai")]
use async_openai::{Client as OpenAiClient, config::OpenAIConfig};
#[cfg(feature = "bedrock")]
use aws_sdk_bedrockruntime::Client as BedrockClient;
#[cfg(feature = "openai")]
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    OpenAi,
    Bedrock,
    Human,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Bedrock => "bedrock",
            ProviderKind::Human => "human",
        }
    }
}

impl From<&BackendSpec> for ProviderKind {
    fn from(backend: &BackendSpec) -> Self {
        match backend {
            BackendSpec::Openai { .. } => ProviderKind::OpenAi,
            BackendSpec::Bedrock { .. } => ProviderKind::Bedrock,
            BackendSpec::Human => ProviderKind::Human,
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builds gateways for every provider this binary was compiled with.
pub struct ProviderRegistry {
    config: FileProvidersConfig,
    #[cfg(feature = "openai")]
    openai: std::sync::OnceLock<OpenAiClient<OpenAIConfig>>,
    #[cfg(feature = "bedrock")]
    bedrock: tokio::sync::OnceCell<Arc<BedrockClient>>,
}

impl ProviderRegistry {
    pub fn new(config: FileProvidersConfig) -> Self {
        Self {
            config,
            #[cfg(feature = "openai")]
            openai: std::sync::OnceLock::new(),
            #[cfg(feature = "bedrock")]
            bedrock: tokio::sync::OnceCell::new(),
        }
    }

    /// Resolve the provider-specific model id without touching the network.
    ///
    /// Returns `None` for human backends.
    pub fn resolve_model_id(&self, backend: &BackendSpec) -> Result<Option<String>, GatewayError> {
        match backend {
            BackendSpec::Human => Ok(None),
            BackendSpec::Openai { model } => openai::model_map::to_openai_model_id(model)
                .map(Some)
                .ok_or_else(|| {
                    GatewayError::ModelNotAvailable(format!("Unknown OpenAI model: {}", model))
                }),
            BackendSpec::Bedrock { model } => bedrock::model_map::to_bedrock_model_id(
                model,
                self.config.bedrock.cross_region,
                &self.config.bedrock.region,
            )
            .map(Some)
            .ok_or_else(|| {
                GatewayError::ModelNotAvailable(format!("Unknown Bedrock model: {}", model))
            }),
        }
    }

    #[cfg(feature = "openai")]
    fn connect_openai(
        &self,
        model_id: String,
        params: &GenerationParams,
    ) -> Result<Arc<dyn LlmGateway>, GatewayError> {
        let client = self.openai.get_or_init(|| {
            let settings = &self.config.openai;
            let mut config = OpenAIConfig::new();
            match settings.resolve_api_key() {
                Some(key) => config = config.with_api_key(key),
                None => warn!(
                    env = %settings.api_key_env,
                    "No OpenAI API key configured; requests will be rejected"
                ),
            }
            if let Some(ref base) = settings.base_url {
                config = config.with_api_base(base);
            }
            OpenAiClient::with_config(config)
        });
        Ok(Arc::new(openai::OpenAiGateway::new(
            client.clone(),
            model_id,
            params,
        )))
    }

    #[cfg(not(feature = "openai"))]
    fn connect_openai(
        &self,
        _model_id: String,
        _params: &GenerationParams,
    ) -> Result<Arc<dyn LlmGateway>, GatewayError> {
        Err(GatewayError::ModelNotAvailable(
            "OpenAI support is not compiled in (enable the `openai` feature)".to_string(),
        ))
    }

    #[cfg(feature = "bedrock")]
    async fn connect_bedrock(
        &self,
        model_id: String,
        params: &GenerationParams,
    ) -> Result<Arc<dyn LlmGateway>, GatewayError> {
        let settings = &self.config.bedrock;
        let client = self
            .bedrock
            .get_or_init(|| async {
                let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
                    .region(aws_config::Region::new(settings.region.clone()));
                if let Some(ref profile) = settings.profile {
                    loader = loader.profile_name(profile);
                }
                let aws_config = loader.load().await;
                info!(region = %settings.region, "Bedrock provider initialized");
                Arc::new(BedrockClient::new(&aws_config))
            })
            .await;
        Ok(Arc::new(bedrock::BedrockGateway::new(
            client.clone(),
            model_id,
            params,
        )))
    }

    #[cfg(not(feature = "bedrock"))]
    async fn connect_bedrock(
        &self,
        _model_id: String,
        _params: &GenerationParams,
    ) -> Result<Arc<dyn LlmGateway>, GatewayError> {
        Err(GatewayError::ModelNotAvailable(
            "Bedrock support is not compiled in (enable the `bedrock` feature)".to_string(),
        ))
    }
}

#[async_trait]
impl ModelProvider for ProviderRegistry {
    async fn connect(
        &self,
        backend: &BackendSpec,
        params: &GenerationParams,
    ) -> Result<Arc<dyn LlmGateway>, GatewayError> {
        let kind = ProviderKind::from(backend);
        let gateway = match self.resolve_model_id(backend)? {
            None => Arc::new(HumanGateway) as Arc<dyn LlmGateway>,
            Some(model_id) => match kind {
                ProviderKind::OpenAi => self.connect_openai(model_id, params)?,
                ProviderKind::Bedrock => self.connect_bedrock(model_id, params).await?,
                ProviderKind::Human => Arc::new(HumanGateway),
            },
        };
        info!(provider = %kind, gateway = gateway.name(), "Backend connected");
        Ok(gateway)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> ProviderRegistry {
        let mut config = FileProvidersConfig::default();
        config.openai.api_key = Some("sk-test".to_string());
        ProviderRegistry::new(config)
    }

    #[test]
    fn test_provider_kind_from_backend() {
        assert_eq!(
            ProviderKind::from(&BackendSpec::openai("GPT-4o")),
            ProviderKind::OpenAi
        );
        assert_eq!(
            ProviderKind::from(&BackendSpec::bedrock("Command-R")),
            ProviderKind::Bedrock
        );
        assert_eq!(ProviderKind::from(&BackendSpec::Human).to_string(), "human");
    }

    #[test]
    fn test_resolve_model_ids() {
        let registry = registry();
        assert_eq!(
            registry
                .resolve_model_id(&BackendSpec::openai("GPT-4o"))
                .unwrap()
                .as_deref(),
            Some("gpt-4o-2024-08-06")
        );
        assert_eq!(
            registry
                .resolve_model_id(&BackendSpec::bedrock("Mistral Large"))
                .unwrap()
                .as_deref(),
            Some("mistral.mistral-large-2402-v1:0")
        );
        assert_eq!(registry.resolve_model_id(&BackendSpec::Human).unwrap(), None);
    }

    #[tokio::test]
    async fn test_connect_human() {
        let gateway = registry()
            .connect(&BackendSpec::Human, &GenerationParams::default())
            .await
            .unwrap();
        assert_eq!(gateway.name(), "human");
    }

    #[tokio::test]
    async fn test_unknown_models_are_configuration_errors() {
        let registry = registry();
        let params = GenerationParams::default();
        let err = registry
            .connect(&BackendSpec::openai("Claude 3 Haiku"), &params)
            .await
            .err()
            .unwrap();
        assert!(err.is_configuration());
        let err = registry
            .connect(&BackendSpec::bedrock("GPT-4o"), &params)
            .await
            .err()
            .unwrap();
        assert!(err.is_configuration());
    }

    #[cfg(feature = "openai")]
    #[tokio::test]
    async fn test_connect_openai_shares_client() {
        let registry = registry();
        let params = GenerationParams::default();
        let first = registry
            .connect(&BackendSpec::openai("GPT-4o-mini"), &params)
            .await
            .unwrap();
        let second = registry
            .connect(&BackendSpec::openai("gpt-3.5-turbo"), &params)
            .await
            .unwrap();
        assert_eq!(first.name(), "openai:gpt-4o-mini");
        assert_eq!(second.name(), "openai:gpt-3.5-turbo");
        assert!(registry.openai.get().is_some());
    }
}
