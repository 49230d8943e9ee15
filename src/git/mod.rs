//! Git access: the command allowlist and diff text filtering.

pub mod filter;
pub mod guard;

pub use filter::{
    ExclusionSet, filter_diff_excluding_paths, normalize_repo_path, unquote_git_path,
};
pub use guard::{
    ARG_CACHED, ARG_HEAD_PREVIOUS, ARG_NAME_ONLY, AllowedCommand, CommandRunner, GIT_DIFF,
    GitGuard, RunOutput, SystemRunner, check_git_installed,
};
