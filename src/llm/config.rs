//! Provider configuration sourced from the environment.
//!
//! Settings are read once into an immutable [`ProviderSettings`]; each
//! provider then receives its own [`ProviderConfig`] at construction and
//! never consults the environment again.

use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::debug;

use crate::error::ProviderError;

/// Explicit provider selector.
pub const PROVIDER_ENV_VAR: &str = "PROVIDER";
pub const ANTHROPIC_API_KEY_ENV_VAR: &str = "ANTHROPIC_API_KEY";
pub const ANTHROPIC_BASE_URL_ENV_VAR: &str = "ANTHROPIC_BASE_URL";
pub const OPENAI_API_KEY_ENV_VAR: &str = "OPENAI_API_KEY";
pub const OPENAI_BASE_URL_ENV_VAR: &str = "OPENAI_BASE_URL";
pub const COMPATIBLE_API_KEY_ENV_VAR: &str = "OPENAI_COMPATIBLE_API_KEY";
pub const COMPATIBLE_BASE_URL_ENV_VAR: &str = "OPENAI_COMPATIBLE_BASE_URL";
/// Model override shared by every provider.
pub const MODEL_NAME_ENV_VAR: &str = "MODEL_NAME";

/// Load `.env` into the process environment without overriding variables
/// that are already set.
///
/// `<repo_dir>/.env` is tried first; otherwise the usual lookup from the
/// working directory upwards applies. Returns the file that was loaded.
pub fn load_dotenv(repo_dir: &Path) -> Option<PathBuf> {
    let repo_env = repo_dir.join(".env");
    match dotenvy::from_path(&repo_env) {
        Ok(()) => {
            debug!("Loaded {}", repo_env.display());
            Some(repo_env)
        }
        Err(e) => {
            debug!("No .env in {}: {}", repo_dir.display(), e);
            dotenvy::dotenv()
                .inspect_err(|e| debug!("No .env loaded: {}", e))
                .ok()
        }
    }
}

/// Supported LLM backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Anthropic,
    OpenAi,
    OpenAiCompatible,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 3] = [
        ProviderKind::Anthropic,
        ProviderKind::OpenAi,
        ProviderKind::OpenAiCompatible,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::OpenAi => "openai",
            ProviderKind::OpenAiCompatible => "openai-compatible",
        }
    }

    fn valid_names() -> String {
        let mut names: Vec<&str> = Self::ALL.iter().map(|k| k.as_str()).collect();
        names.sort_unstable();
        names.join(", ")
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = ProviderError;

    /// Case-insensitive, surrounding whitespace ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == name)
            .ok_or_else(|| ProviderError::InvalidProvider {
                name,
                valid: Self::valid_names(),
            })
    }
}

/// Everything provider selection needs, read once at startup.
#[derive(Clone, Default)]
pub struct ProviderSettings {
    pub provider: Option<String>,
    pub anthropic_api_key: Option<String>,
    pub anthropic_base_url: Option<String>,
    pub openai_api_key: Option<String>,
    pub openai_base_url: Option<String>,
    pub compatible_api_key: Option<String>,
    pub compatible_base_url: Option<String>,
    pub model_name: Option<String>,
}

impl ProviderSettings {
    /// Read settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read settings through an arbitrary lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            provider: get(PROVIDER_ENV_VAR),
            anthropic_api_key: get(ANTHROPIC_API_KEY_ENV_VAR),
            anthropic_base_url: get(ANTHROPIC_BASE_URL_ENV_VAR),
            openai_api_key: get(OPENAI_API_KEY_ENV_VAR),
            openai_base_url: get(OPENAI_BASE_URL_ENV_VAR),
            compatible_api_key: get(COMPATIBLE_API_KEY_ENV_VAR),
            compatible_base_url: get(COMPATIBLE_BASE_URL_ENV_VAR),
            model_name: get(MODEL_NAME_ENV_VAR),
        }
    }

    /// Whether auto-detection would accept `kind`.
    pub fn has_credentials_for(&self, kind: ProviderKind) -> bool {
        match kind {
            ProviderKind::Anthropic => self.anthropic_api_key.is_some(),
            ProviderKind::OpenAi => self.openai_api_key.is_some(),
            ProviderKind::OpenAiCompatible => {
                self.compatible_api_key.is_some() && self.compatible_base_url.is_some()
            }
        }
    }

    /// The slice of settings owned by one provider.
    pub fn config_for(&self, kind: ProviderKind) -> ProviderConfig {
        let (api_key, base_url) = match kind {
            ProviderKind::Anthropic => (&self.anthropic_api_key, &self.anthropic_base_url),
            ProviderKind::OpenAi => (&self.openai_api_key, &self.openai_base_url),
            ProviderKind::OpenAiCompatible => {
                (&self.compatible_api_key, &self.compatible_base_url)
            }
        };

        ProviderConfig {
            api_key: api_key.clone(),
            base_url: base_url.clone(),
            model_name: self.model_name.clone(),
        }
    }
}

impl fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("provider", &self.provider)
            .field("anthropic_api_key", &redact(&self.anthropic_api_key))
            .field("anthropic_base_url", &self.anthropic_base_url)
            .field("openai_api_key", &redact(&self.openai_api_key))
            .field("openai_base_url", &self.openai_base_url)
            .field("compatible_api_key", &redact(&self.compatible_api_key))
            .field("compatible_base_url", &self.compatible_base_url)
            .field("model_name", &self.model_name)
            .finish()
    }
}

/// Configuration handed to a single provider at construction.
#[derive(Clone, Default)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model_name: Option<String>,
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &redact(&self.api_key))
            .field("base_url", &self.base_url)
            .field("model_name", &self.model_name)
            .finish()
    }
}

fn redact(secret: &Option<String>) -> Option<&'static str> {
    secret.as_ref().map(|_| "<redacted>")
}
