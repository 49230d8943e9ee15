//! scrivener - drafts emoji conventional commit messages from pending git changes.
//!
//! # Overview
//!
//! scrivener reads the staged diff (falling back to the previous commit),
//! drops noise such as lock files and the repository context file, and asks
//! one of several LLM backends (Anthropic, OpenAI, or any OpenAI-compatible
//! endpoint) to write the commit message.
//!
//! Git is only ever invoked through [`git::GitGuard`], which accepts a fixed
//! set of `git diff` arguments.

pub mod commit;
pub mod error;
pub mod git;
pub mod llm;

// Re-export commonly used types
pub use commit::{CommitMessage, DiffAcquirer, DiffOutcome, DiffResult};
pub use error::{DiagnosticHint, GitError, HookError, ProviderError};
pub use git::{GitGuard, SystemRunner};
pub use llm::{LlmProvider, ProviderKind, ProviderSettings, get_provider};
