//! Provider for any endpoint implementing the OpenAI Chat Completions API
//! (LM Studio, Ollama, vLLM and other self-hosted services).

use async_trait::async_trait;

use crate::error::ProviderError;

use super::config::{
    COMPATIBLE_API_KEY_ENV_VAR, COMPATIBLE_BASE_URL_ENV_VAR, MODEL_NAME_ENV_VAR, ProviderConfig,
};
use super::openai::ChatCompletionsClient;
use super::provider::LlmProvider;

pub struct OpenAiCompatibleProvider {
    client: ChatCompletionsClient,
    model_name: Option<String>,
}

impl OpenAiCompatibleProvider {
    pub fn new(config: ProviderConfig) -> Result<Self, ProviderError> {
        let api_key = config.api_key.ok_or_else(|| {
            ProviderError::Configuration(format!(
                "OpenAI-compatible API key not found. Please set {} environment variable.",
                COMPATIBLE_API_KEY_ENV_VAR
            ))
        })?;
        let base_url = config.base_url.ok_or_else(|| {
            ProviderError::Configuration(format!(
                "OpenAI-compatible base URL not found. Please set {} environment variable.",
                COMPATIBLE_BASE_URL_ENV_VAR
            ))
        })?;

        Ok(Self {
            client: ChatCompletionsClient::new(api_key, base_url)?,
            model_name: config.model_name,
        })
    }
}

#[async_trait]
impl LlmProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &'static str {
        "openai-compatible"
    }

    /// Compatible endpoints have no universal default model.
    fn default_model(&self) -> Result<String, ProviderError> {
        self.model_name.clone().ok_or_else(|| {
            ProviderError::Configuration(format!(
                "{0} environment variable is required for openai-compatible provider. \
                 Please set {0} to your desired model.",
                MODEL_NAME_ENV_VAR
            ))
        })
    }

    async fn chat_completion(
        &self,
        prompt: &str,
        model: Option<&str>,
    ) -> Result<String, ProviderError> {
        let model = self.resolve_model(model)?;
        self.client.complete(&model, prompt).await
    }
}
