//! Anthropic Messages API provider.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ProviderError;

use super::config::{ANTHROPIC_API_KEY_ENV_VAR, ProviderConfig};
use super::provider::LlmProvider;

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const MESSAGES_PATH: &str = "/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 4096;

/// Model used when `MODEL_NAME` is not set.
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-5-20250929";

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: [Message<'a>; 1],
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

pub struct AnthropicProvider {
    api_key: String,
    base_url: String,
    model_name: Option<String>,
    http_client: Client,
}

impl AnthropicProvider {
    pub fn new(config: ProviderConfig) -> Result<Self, ProviderError> {
        let api_key = config.api_key.ok_or_else(|| {
            ProviderError::Configuration(format!(
                "Anthropic API key not found. Please set {} environment variable.",
                ANTHROPIC_API_KEY_ENV_VAR
            ))
        })?;

        Ok(Self {
            api_key,
            base_url: config
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model_name: config.model_name,
            http_client: Client::builder().build()?,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), MESSAGES_PATH)
    }
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    fn default_model(&self) -> Result<String, ProviderError> {
        Ok(self
            .model_name
            .clone()
            .unwrap_or_else(|| DEFAULT_MODEL.to_string()))
    }

    async fn chat_completion(
        &self,
        prompt: &str,
        model: Option<&str>,
    ) -> Result<String, ProviderError> {
        let model = self.resolve_model(model)?;
        debug!("Anthropic request: model={}, prompt={} chars", model, prompt.len());

        let request_body = MessagesRequest {
            model: &model,
            max_tokens: MAX_TOKENS,
            messages: [Message {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .http_client
            .post(self.endpoint())
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ProviderError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let api_response: MessagesResponse = response.json().await?;

        api_response
            .content
            .into_iter()
            .next()
            .and_then(|block| block.text)
            .map(|text| text.trim().to_string())
            .ok_or(ProviderError::EmptyResponse)
    }
}
