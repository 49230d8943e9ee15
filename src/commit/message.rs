//! Commit message synthesis via an LLM provider.

use std::fmt;

use tracing::{debug, error, warn};

use crate::commit::prompt::{PREAMBLE_MARKER, build_commit_prompt};
use crate::llm::LlmProvider;

/// Message used when the change set contains dependency lock files.
pub const LOCK_FILES_MESSAGE: &str = "📦 deps: update dependencies";

/// Message used when only the repository context file changed.
pub const CONTEXT_ONLY_MESSAGE: &str = "📝 docs: update repository context";

/// A generated commit message.
///
/// Expected to look like `<emoji> <type>[scope]: <description>`, a blank
/// line, then a body. The shape is requested in the prompt, not enforced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitMessage(String);

impl CommitMessage {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First line of the message.
    pub fn subject(&self) -> &str {
        self.0.lines().next().unwrap_or("")
    }

    /// Everything after the blank line following the subject, if present.
    pub fn body(&self) -> Option<&str> {
        self.0
            .split_once("\n\n")
            .map(|(_, body)| body.trim())
            .filter(|body| !body.is_empty())
    }
}

impl fmt::Display for CommitMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Strip explanatory framing some models add despite the instructions.
///
/// When the reply contains [`PREAMBLE_MARKER`], only its last non-empty line
/// is kept.
pub fn normalize_response(response: &str) -> String {
    if response.contains(PREAMBLE_MARKER) {
        return response
            .lines()
            .map(str::trim)
            .rfind(|line| !line.is_empty())
            .unwrap_or("")
            .to_string();
    }
    response.trim().to_string()
}

/// Generate a commit message for `diff` with `provider`.
///
/// Provider failures never propagate: they are logged together with a
/// diagnostic hint and reported as `None`, leaving the exit decision to the
/// caller. `model` overrides the provider's default model for this call.
pub async fn synthesize(
    diff: &str,
    provider: &dyn LlmProvider,
    model: Option<&str>,
) -> Option<CommitMessage> {
    let prompt = build_commit_prompt(diff);
    debug!(
        "Commit prompt length: {} chars, provider: {}",
        prompt.len(),
        provider.name()
    );

    let response = match provider.chat_completion(&prompt, model).await {
        Ok(response) => response,
        Err(e) => {
            error!("Error generating commit message: {}", e);
            if let Some(hint) = e.hint() {
                warn!("{}", hint.message());
            }
            return None;
        }
    };

    let message = normalize_response(&response);
    if message.is_empty() {
        error!("{} returned an empty commit message", provider.name());
        return None;
    }

    Some(CommitMessage::new(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::error::ProviderError;

    /// Provider returning a canned reply and recording the prompt it saw.
    struct FakeProvider {
        reply: Result<&'static str, u16>,
        seen: Mutex<Option<(String, Option<String>)>>,
    }

    impl FakeProvider {
        fn ok(reply: &'static str) -> Self {
            Self {
                reply: Ok(reply),
                seen: Mutex::new(None),
            }
        }

        fn failing(status: u16) -> Self {
            Self {
                reply: Err(status),
                seen: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl LlmProvider for FakeProvider {
        fn name(&self) -> &'static str {
            "fake"
        }

        fn default_model(&self) -> Result<String, ProviderError> {
            Ok("fake-model".to_string())
        }

        async fn chat_completion(
            &self,
            prompt: &str,
            model: Option<&str>,
        ) -> Result<String, ProviderError> {
            *self.seen.lock().unwrap() = Some((prompt.to_string(), model.map(str::to_string)));
            match self.reply {
                Ok(text) => Ok(text.trim().to_string()),
                Err(status) => Err(ProviderError::Api {
                    status,
                    body: "boom".to_string(),
                }),
            }
        }
    }

    #[test]
    fn test_normalize_strips_preamble() {
        let response = "Based on the diff, here is the message:\n\n✨ feat: add provider factory  ";
        assert_eq!(normalize_response(response), "✨ feat: add provider factory");
    }

    #[test]
    fn test_normalize_preamble_with_trailing_blank_lines() {
        let response = "Based on the diff:\nfirst\n✨ feat: add x\n\n\n";
        assert_eq!(normalize_response(response), "✨ feat: add x");
    }

    #[test]
    fn test_normalize_leaves_clean_message_intact() {
        let response = "🐛 fix(guard): reject unknown args\n\nTokens outside the allowlist\nnow fail early.";
        assert_eq!(normalize_response(response), response);
    }

    #[test]
    fn test_commit_message_parts() {
        let msg = CommitMessage::new("✨ feat(llm): add provider factory\n\nSelect a backend\nby priority.");
        assert_eq!(msg.subject(), "✨ feat(llm): add provider factory");
        assert_eq!(msg.body(), Some("Select a backend\nby priority."));

        let subject_only = CommitMessage::new("🔧 chore: bump version");
        assert_eq!(subject_only.body(), None);
        assert_eq!(subject_only.to_string(), "🔧 chore: bump version");
    }

    #[tokio::test]
    async fn test_synthesize_sends_diff_and_model() {
        let provider = FakeProvider::ok("✨ feat: add thing");
        let message = synthesize("+added line\n", &provider, Some("override"))
            .await
            .unwrap();

        assert_eq!(message.as_str(), "✨ feat: add thing");

        let seen = provider.seen.lock().unwrap().clone().unwrap();
        assert!(seen.0.contains("+added line\n"));
        assert_eq!(seen.1.as_deref(), Some("override"));
    }

    #[tokio::test]
    async fn test_synthesize_keeps_last_line_after_preamble() {
        let provider =
            FakeProvider::ok("Based on the diff, this is a fix.\n🐛 fix: handle empty diff\n");
        let message = synthesize("+x\n", &provider, None).await.unwrap();
        assert_eq!(message.as_str(), "🐛 fix: handle empty diff");
    }

    #[tokio::test]
    async fn test_synthesize_returns_none_on_provider_error() {
        for status in [500, 401, 404, 418] {
            let provider = FakeProvider::failing(status);
            assert!(synthesize("+x\n", &provider, None).await.is_none());
        }
    }

    #[tokio::test]
    async fn test_synthesize_returns_none_on_empty_reply() {
        let provider = FakeProvider::ok("   ");
        assert!(synthesize("+x\n", &provider, None).await.is_none());
    }
}
