//! Provider contract and selection.

use async_trait::async_trait;
use tracing::debug;

use crate::error::ProviderError;

use super::anthropic::AnthropicProvider;
use super::compatible::OpenAiCompatibleProvider;
use super::config::{ProviderKind, ProviderSettings};
use super::openai::OpenAiProvider;

/// Auto-detection order when no provider is named.
const DETECTION_ORDER: [ProviderKind; 3] = [
    ProviderKind::Anthropic,
    ProviderKind::OpenAi,
    ProviderKind::OpenAiCompatible,
];

/// A chat-completion backend.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Stable identifier (`anthropic`, `openai`, `openai-compatible`).
    fn name(&self) -> &'static str;

    /// Model used when the caller does not pass one.
    fn default_model(&self) -> Result<String, ProviderError>;

    /// Send `prompt` as a single user message and return the trimmed text of
    /// the first response block. Exactly one request, never retried.
    async fn chat_completion(
        &self,
        prompt: &str,
        model: Option<&str>,
    ) -> Result<String, ProviderError>;

    /// Resolve an optional per-call override against the default model.
    fn resolve_model(&self, model: Option<&str>) -> Result<String, ProviderError> {
        match model {
            Some(m) if !m.trim().is_empty() => Ok(m.to_string()),
            _ => self.default_model(),
        }
    }
}

/// Get a configured provider.
///
/// `explicit_name` (e.g. from `--provider`) wins over the `PROVIDER` setting;
/// either must name a known provider. Without a name the first provider with
/// credentials in [`DETECTION_ORDER`] is used.
pub fn get_provider(
    explicit_name: Option<&str>,
    settings: &ProviderSettings,
) -> Result<Box<dyn LlmProvider>, ProviderError> {
    let name = explicit_name
        .filter(|n| !n.trim().is_empty())
        .or(settings.provider.as_deref());

    let kind = match name {
        Some(name) => name.parse::<ProviderKind>()?,
        None => detect_provider(settings)?,
    };

    debug!("Using provider {}", kind);
    create_provider(kind, settings)
}

/// Pick a provider from the available credentials.
pub fn detect_provider(settings: &ProviderSettings) -> Result<ProviderKind, ProviderError> {
    DETECTION_ORDER
        .into_iter()
        .find(|kind| settings.has_credentials_for(*kind))
        .ok_or(ProviderError::NoProviderConfigured)
}

/// Construct a provider of the given kind.
pub fn create_provider(
    kind: ProviderKind,
    settings: &ProviderSettings,
) -> Result<Box<dyn LlmProvider>, ProviderError> {
    let config = settings.config_for(kind);
    Ok(match kind {
        ProviderKind::Anthropic => Box::new(AnthropicProvider::new(config)?),
        ProviderKind::OpenAi => Box::new(OpenAiProvider::new(config)?),
        ProviderKind::OpenAiCompatible => Box::new(OpenAiCompatibleProvider::new(config)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> ProviderSettings {
        ProviderSettings::default()
    }

    #[test]
    fn test_detection_prefers_anthropic() {
        let s = ProviderSettings {
            anthropic_api_key: Some("ant".into()),
            openai_api_key: Some("oai".into()),
            ..settings()
        };
        assert_eq!(detect_provider(&s).unwrap(), ProviderKind::Anthropic);
        assert_eq!(get_provider(None, &s).unwrap().name(), "anthropic");
    }

    #[test]
    fn test_detection_falls_through_to_openai() {
        let s = ProviderSettings {
            openai_api_key: Some("oai".into()),
            compatible_api_key: Some("c".into()),
            compatible_base_url: Some("http://localhost:1234/v1".into()),
            ..settings()
        };
        assert_eq!(detect_provider(&s).unwrap(), ProviderKind::OpenAi);
    }

    #[test]
    fn test_detection_compatible_requires_base_url() {
        let s = ProviderSettings {
            compatible_api_key: Some("c".into()),
            ..settings()
        };
        assert!(matches!(
            detect_provider(&s),
            Err(ProviderError::NoProviderConfigured)
        ));

        let s = ProviderSettings {
            compatible_base_url: Some("http://localhost:1234/v1".into()),
            ..s
        };
        assert_eq!(detect_provider(&s).unwrap(), ProviderKind::OpenAiCompatible);
    }

    #[test]
    fn test_no_credentials_is_configuration_error() {
        let err = get_provider(None, &settings()).err().unwrap();
        assert!(matches!(err, ProviderError::NoProviderConfigured));
        assert!(err.to_string().contains("ANTHROPIC_API_KEY"));
    }

    #[test]
    fn test_explicit_name_overrides_detection() {
        let s = ProviderSettings {
            anthropic_api_key: Some("ant".into()),
            openai_api_key: Some("oai".into()),
            ..settings()
        };
        assert_eq!(get_provider(Some("openai"), &s).unwrap().name(), "openai");
    }

    #[test]
    fn test_explicit_name_beats_provider_setting() {
        let s = ProviderSettings {
            provider: Some("anthropic".into()),
            anthropic_api_key: Some("ant".into()),
            openai_api_key: Some("oai".into()),
            ..settings()
        };
        assert_eq!(get_provider(Some("OpenAI"), &s).unwrap().name(), "openai");
        assert_eq!(get_provider(None, &s).unwrap().name(), "anthropic");
    }

    #[test]
    fn test_invalid_name_is_rejected() {
        let s = ProviderSettings {
            anthropic_api_key: Some("ant".into()),
            ..settings()
        };
        let err = get_provider(Some("llama"), &s).err().unwrap();
        assert!(matches!(err, ProviderError::InvalidProvider { .. }));
    }

    #[test]
    fn test_explicit_provider_without_key_fails_at_construction() {
        let s = ProviderSettings {
            anthropic_api_key: Some("ant".into()),
            ..settings()
        };
        let err = get_provider(Some("openai"), &s).err().unwrap();
        match err {
            ProviderError::Configuration(msg) => assert!(msg.contains("OPENAI_API_KEY")),
            other => panic!("Expected Configuration, got {:?}", other),
        }
    }

    #[test]
    fn test_resolve_model_prefers_override() {
        let s = ProviderSettings {
            openai_api_key: Some("oai".into()),
            ..settings()
        };
        let provider = get_provider(None, &s).unwrap();
        assert_eq!(provider.resolve_model(Some("gpt-4o")).unwrap(), "gpt-4o");
        assert_eq!(
            provider.resolve_model(None).unwrap(),
            provider.default_model().unwrap()
        );
    }
}
