//! Error types for scrivener modules using thiserror.

use thiserror::Error;

/// Errors from running git through the command allowlist.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Git subcommand '{0}' not allowed")]
    UnauthorizedCommand(String),

    #[error("Git argument '{0}' not allowed")]
    UnauthorizedArgument(String),

    #[error("git exited with {}", exit_code.map_or("unknown status".to_string(), |c| format!("code {c}")))]
    CommandFailed { exit_code: Option<i32> },

    #[error("git was not found in PATH. Install git and run scrivener from within a repository.")]
    NotInstalled,

    #[error("Failed to spawn git: {0}")]
    SpawnFailed(#[source] std::io::Error),
}

impl GitError {
    /// Whether the error means the allowlist itself was violated.
    ///
    /// These are programming errors, not environmental failures, and must
    /// never be downgraded to "no diff available".
    pub fn is_policy_violation(&self) -> bool {
        matches!(
            self,
            GitError::UnauthorizedCommand(_) | GitError::UnauthorizedArgument(_)
        )
    }
}

/// Errors from LLM provider selection, construction and requests.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Invalid provider '{name}'. Valid providers are: {valid}")]
    InvalidProvider { name: String, valid: String },

    #[error(
        "No API key found. Please configure one of the following:\n  \
         - ANTHROPIC_API_KEY for Anthropic Claude models\n  \
         - OPENAI_API_KEY for OpenAI GPT models\n  \
         - OPENAI_COMPATIBLE_API_KEY and OPENAI_COMPATIBLE_BASE_URL for OpenAI-compatible endpoints\n\n\
         Alternatively, set the PROVIDER environment variable to explicitly choose a provider."
    )]
    NoProviderConfigured,

    #[error("{0}")]
    Configuration(String),

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("API response contained no text content")]
    EmptyResponse,
}

/// Errors from persisting the commit message for git.
#[derive(Error, Debug)]
pub enum HookError {
    #[error("Not a git repository: {0}")]
    RepositoryNotFound(#[source] git2::Error),

    #[error("Failed to write commit message file: {0}")]
    WriteFailed(#[source] std::io::Error),
}

/// Actionable follow-up for a failed provider request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticHint {
    ServerError,
    Auth,
    NotFound,
}

impl DiagnosticHint {
    pub fn message(&self) -> &'static str {
        match self {
            DiagnosticHint::ServerError => "Server error. Check MODEL_NAME if set.",
            DiagnosticHint::Auth => "Auth error. Check your API key.",
            DiagnosticHint::NotFound => "Model not found. Check MODEL_NAME.",
        }
    }
}

impl ProviderError {
    /// Classify the error into a hint for the user, if one applies.
    ///
    /// API errors are classified by status code. Anything else falls back to
    /// status-like substrings in the rendered message.
    pub fn hint(&self) -> Option<DiagnosticHint> {
        let status = match self {
            ProviderError::Api { status, .. } => Some(*status),
            ProviderError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        };

        if let Some(status) = status {
            return match status {
                500..=599 => Some(DiagnosticHint::ServerError),
                401 | 403 => Some(DiagnosticHint::Auth),
                404 => Some(DiagnosticHint::NotFound),
                _ => None,
            };
        }

        let message = self.to_string();
        if message.contains("500") {
            Some(DiagnosticHint::ServerError)
        } else if message.contains("401") || message.contains("403") {
            Some(DiagnosticHint::Auth)
        } else if message.contains("404") {
            Some(DiagnosticHint::NotFound)
        } else {
            None
        }
    }
}
