//! Prompt construction for commit message generation.

/// Phrase models use when they frame the answer instead of returning only
/// the message.
pub const PREAMBLE_MARKER: &str = "Based on the diff";

/// Commit types and their emoji, in the order they are offered to the model.
pub const COMMIT_TYPES: &[(&str, &str, &str)] = &[
    ("✨", "feat", "A new feature"),
    ("🐛", "fix", "A bug fix"),
    ("📝", "docs", "Documentation only changes"),
    ("🎨", "style", "Changes that don't affect the meaning of the code"),
    ("♻️", "refactor", "A code change that neither fixes a bug nor adds a feature"),
    ("⚡️", "perf", "A code change that improves performance"),
    ("✅", "test", "Adding missing tests or correcting existing tests"),
    ("🔧", "chore", "Changes to build process or auxiliary tools"),
    ("👷", "ci", "Changes to CI configuration files and scripts"),
    ("🔒", "security", "Security fixes"),
    ("📦", "deps", "Dependencies"),
    ("💥", "breaking", "Breaking changes"),
    ("💄", "ui", "UI/style changes"),
    ("🌐", "i18n", "Internationalization"),
    ("✏️", "typo", "Fix typos"),
    ("🎉", "init", "Initial commit"),
    ("📄", "license", "License"),
    ("🐳", "docker", "Docker"),
    ("♿️", "access", "Accessibility"),
    ("🔊", "logs", "Logging"),
    ("🗃️", "db", "Database"),
    ("🔥", "cleanup", "Remove code/files"),
    ("🚧", "wip", "Work in progress"),
    ("🚚", "move", "Move/rename files"),
    ("⏪", "revert", "Revert changes"),
    ("🔀", "merge", "Merge branches"),
    ("📱", "responsive", "Responsive design"),
    ("🚑", "hotfix", "Critical hotfix"),
];

/// Build the LLM prompt for generating a commit message.
///
/// The diff is embedded verbatim; the model is asked for plain text only.
pub fn build_commit_prompt(diff: &str) -> String {
    let types_section: String = COMMIT_TYPES
        .iter()
        .map(|(emoji, name, description)| format!("- {emoji} {name}: {description}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are a git commit message generator. Analyze the git diff and output ONLY the commit message itself - no explanations, no prefixes like "{PREAMBLE_MARKER}...", just the commit message exactly as it should appear in git.

## Format
<emoji> <type>[optional scope]: <description>

[body]

[optional footer(s)]

## Types
Type MUST be one of (with its emoji):
{types_section}

## Description Rules
- 50 characters or less (THIS IS CRITICAL - count characters carefully!)
- Start with lowercase
- Use imperative mood ("add" not "adds/added")
- No period at end
- Be concise: prefer "add multi-provider support" over verbose phrasing

## Body Rules
- Separated from the title by a blank line
- Wrap at 72 characters
- Explain what and why, not how
- Use proper punctuation

## Git diff to analyze
{diff}

Output ONLY the commit message exactly as it should appear in git, with no additional text."#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_diff_verbatim() {
        let diff = "diff --git a/x b/x\n+\x1b[31mraw {braces} ## heading\n";
        let prompt = build_commit_prompt(diff);
        assert!(prompt.contains(diff));
    }

    #[test]
    fn test_prompt_lists_every_type() {
        let prompt = build_commit_prompt("+x\n");
        for (emoji, name, _) in COMMIT_TYPES {
            assert!(prompt.contains(&format!("- {emoji} {name}:")), "missing {name}");
        }
    }

    #[test]
    fn test_prompt_states_subject_rules() {
        let prompt = build_commit_prompt("+x\n");
        assert!(prompt.contains("50 characters or less"));
        assert!(prompt.contains("imperative mood"));
        assert!(prompt.contains("Wrap at 72 characters"));
        assert!(prompt.contains("Output ONLY the commit message"));
    }
}
