//! Diff acquisition and commit message generation.

pub mod diff;
pub mod hook;
pub mod message;
pub mod prompt;

pub use diff::{DiffAcquirer, DiffOutcome, DiffResult, REPOSITORY_CONTEXT_PATH, is_lock_file};
pub use hook::write_commit_message;
pub use message::{
    CONTEXT_ONLY_MESSAGE, CommitMessage, LOCK_FILES_MESSAGE, normalize_response, synthesize,
};
pub use prompt::build_commit_prompt;
