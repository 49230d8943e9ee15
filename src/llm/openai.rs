//! OpenAI Chat Completions provider.
//!
//! The request/response handling here is shared with
//! [`OpenAiCompatibleProvider`](super::compatible::OpenAiCompatibleProvider),
//! which speaks the same wire format to a user-supplied endpoint.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ProviderError;

use super::config::{OPENAI_API_KEY_ENV_VAR, ProviderConfig};
use super::provider::LlmProvider;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const CHAT_COMPLETIONS_PATH: &str = "/chat/completions";

/// Model used when `MODEL_NAME` is not set.
pub const DEFAULT_MODEL: &str = "gpt-5.2";

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    stream: bool,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Minimal Chat Completions client used by both OpenAI-style providers.
pub(crate) struct ChatCompletionsClient {
    api_key: String,
    base_url: String,
    http_client: Client,
}

impl ChatCompletionsClient {
    pub(crate) fn new(api_key: String, base_url: String) -> Result<Self, ProviderError> {
        Ok(Self {
            api_key,
            base_url,
            http_client: Client::builder().build()?,
        })
    }

    pub(crate) fn endpoint(&self) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            CHAT_COMPLETIONS_PATH
        )
    }

    /// One non-streaming completion; returns the trimmed first choice.
    pub(crate) async fn complete(&self, model: &str, prompt: &str) -> Result<String, ProviderError> {
        debug!("Chat completion request: model={}, prompt={} chars", model, prompt.len());

        let request_body = ChatRequest {
            model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            stream: false,
        };

        let response = self
            .http_client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
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

        let api_response: ChatResponse = response.json().await?;

        api_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|text| text.trim().to_string())
            .ok_or(ProviderError::EmptyResponse)
    }
}

pub struct OpenAiProvider {
    client: ChatCompletionsClient,
    model_name: Option<String>,
}

impl OpenAiProvider {
    pub fn new(config: ProviderConfig) -> Result<Self, ProviderError> {
        let api_key = config.api_key.ok_or_else(|| {
            ProviderError::Configuration(format!(
                "OpenAI API key not found. Please set {} environment variable.",
                OPENAI_API_KEY_ENV_VAR
            ))
        })?;
        let base_url = config
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(Self {
            client: ChatCompletionsClient::new(api_key, base_url)?,
            model_name: config.model_name,
        })
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        "openai"
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
        self.client.complete(&model, prompt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_fails_fast() {
        let err = OpenAiProvider::new(ProviderConfig::default()).err().unwrap();
        assert!(matches!(err, ProviderError::Configuration(_)));
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn test_default_endpoint() {
        let provider = OpenAiProvider::new(ProviderConfig {
            api_key: Some("k".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(
            provider.client.endpoint(),
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(provider.default_model().unwrap(), DEFAULT_MODEL);
    }

    #[test]
    fn test_request_is_non_streaming_single_user_message() {
        let body = ChatRequest {
            model: "gpt-5.2",
            messages: [ChatMessage {
                role: "user",
                content: "diff",
            }],
            stream: false,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["stream"], false);
        assert_eq!(json["messages"].as_array().unwrap().len(), 1);
        assert_eq!(json["messages"][0]["role"], "user");
    }

    #[test]
    fn test_response_with_null_content_deserializes() {
        let response: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#)
                .unwrap();
        assert!(response.choices[0].message.content.is_none());
    }
}
