//! Diff acquisition for commit message generation.
//!
//! Decides which change text, if any, may be sent to a provider:
//!
//! 1. List staged paths, decoding git's quoting. Any lock file short-circuits without fetching the
//!    diff body, so generated manifests never leave the machine.
//! 2. A change set consisting of only the repository context file
//!    short-circuits with empty content.
//! 3. Fetch the staged diff and strip the context file's section.
//! 4. If nothing is left, repeat 1-3 once against the previous commit.

use tracing::debug;

use crate::error::GitError;
use crate::git::{
    ARG_CACHED, ARG_HEAD_PREVIOUS, ARG_NAME_ONLY, CommandRunner, ExclusionSet, GIT_DIFF,
    GitGuard, filter_diff_excluding_paths, normalize_repo_path, unquote_git_path,
};

/// Repository context document that is never sent to a provider.
pub const REPOSITORY_CONTEXT_PATH: &str = "DOCS/repository_context.txt";

/// Filename suffixes identifying dependency lock files.
const LOCK_FILE_SUFFIXES: &[&str] = &[
    ".lock",
    "lock.json",
    "package-lock.json",
    "yarn.lock",
    "pnpm-lock.yaml",
];

/// Check if a filename is a dependency lock file.
pub fn is_lock_file(filename: &str) -> bool {
    LOCK_FILE_SUFFIXES
        .iter()
        .any(|suffix| filename.ends_with(suffix))
}

/// Outcome of a diff acquisition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffResult {
    /// `None` when the diff body was deliberately not fetched (lock files),
    /// `Some("")` when there is nothing substantive to describe.
    pub content: Option<String>,
    pub has_lock_files: bool,
    pub changed_paths: Vec<String>,
}

/// What the caller should do with a [`DiffResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffOutcome<'a> {
    LockFiles,
    ContextOnly,
    Empty,
    Changes(&'a str),
}

impl DiffResult {
    fn lock_files(changed_paths: Vec<String>) -> Self {
        Self {
            content: None,
            has_lock_files: true,
            changed_paths,
        }
    }

    fn context_only(changed_paths: Vec<String>) -> Self {
        Self {
            content: Some(String::new()),
            has_lock_files: false,
            changed_paths,
        }
    }

    fn changes(content: String, changed_paths: Vec<String>) -> Self {
        Self {
            content: Some(content),
            has_lock_files: false,
            changed_paths,
        }
    }

    /// Nothing to describe.
    pub fn empty() -> Self {
        Self::changes(String::new(), Vec::new())
    }

    pub fn classify(&self) -> DiffOutcome<'_> {
        if self.has_lock_files {
            return DiffOutcome::LockFiles;
        }
        if is_context_only(&self.changed_paths) {
            return DiffOutcome::ContextOnly;
        }
        match self.content.as_deref() {
            Some(diff) if !diff.is_empty() => DiffOutcome::Changes(diff),
            _ => DiffOutcome::Empty,
        }
    }
}

fn is_context_only(paths: &[String]) -> bool {
    matches!(paths, [only] if normalize_repo_path(only) == REPOSITORY_CONTEXT_PATH)
}

/// Which change set a pass inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DiffSource {
    Staged,
    PreviousCommit,
}

impl DiffSource {
    fn name_args(self) -> &'static [&'static str] {
        match self {
            DiffSource::Staged => &[ARG_CACHED, ARG_NAME_ONLY],
            DiffSource::PreviousCommit => &[ARG_HEAD_PREVIOUS, ARG_NAME_ONLY],
        }
    }

    fn diff_args(self) -> &'static [&'static str] {
        match self {
            DiffSource::Staged => &[ARG_CACHED],
            DiffSource::PreviousCommit => &[ARG_HEAD_PREVIOUS],
        }
    }
}

/// Result of inspecting one change set.
enum Pass {
    /// Classification decided the result; no fallback.
    Done(DiffResult),
    /// Filtered diff text, possibly empty.
    Diff { content: String, paths: Vec<String> },
}

/// Acquires the diff to describe, through the git allowlist.
pub struct DiffAcquirer<R> {
    guard: GitGuard<R>,
    excluded: ExclusionSet,
}

impl<R: CommandRunner> DiffAcquirer<R> {
    pub fn new(guard: GitGuard<R>) -> Self {
        Self {
            guard,
            excluded: ExclusionSet::new([REPOSITORY_CONTEXT_PATH]),
        }
    }

    /// Run the acquisition.
    ///
    /// Any git failure aborts the whole acquisition; no partial result is
    /// returned. The previous-commit fallback is attempted at most once.
    pub fn acquire(&self) -> Result<DiffResult, GitError> {
        match self.inspect(DiffSource::Staged)? {
            Pass::Done(result) => return Ok(result),
            Pass::Diff { content, paths } if !content.is_empty() => {
                return Ok(DiffResult::changes(content, paths));
            }
            Pass::Diff { .. } => {}
        }

        debug!("No staged changes, falling back to the previous commit");

        match self.inspect(DiffSource::PreviousCommit)? {
            Pass::Done(result) => Ok(result),
            Pass::Diff { content, .. } if content.is_empty() => Ok(DiffResult::empty()),
            Pass::Diff { content, paths } => Ok(DiffResult::changes(content, paths)),
        }
    }

    fn inspect(&self, source: DiffSource) -> Result<Pass, GitError> {
        let listing = self.guard.execute(GIT_DIFF, source.name_args())?;
        let paths: Vec<String> = listing.lines().map(unquote_git_path).collect();

        debug!("{:?}: {} changed path(s)", source, paths.len());

        if paths.iter().any(|p| is_lock_file(p)) {
            debug!("{:?}: lock file detected, skipping diff body", source);
            return Ok(Pass::Done(DiffResult::lock_files(paths)));
        }

        if is_context_only(&paths) {
            return Ok(Pass::Done(DiffResult::context_only(paths)));
        }

        let mut content = self.guard.execute(GIT_DIFF, source.diff_args())?;

        if paths.iter().any(|p| self.excluded.contains(p)) {
            content = filter_diff_excluding_paths(&content, &self.excluded);
        }

        Ok(Pass::Diff { content, paths })
    }
}
