//! LLM providers behind a single chat-completion contract.

pub mod anthropic;
pub mod compatible;
pub mod config;
pub mod openai;
pub mod provider;

pub use anthropic::AnthropicProvider;
pub use compatible::OpenAiCompatibleProvider;
pub use config::{ProviderConfig, ProviderKind, ProviderSettings, load_dotenv};
pub use openai::OpenAiProvider;
pub use provider::{LlmProvider, create_provider, detect_provider, get_provider};
