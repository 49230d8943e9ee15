//! Path-based exclusion of per-file sections from unified diff text.

use std::collections::HashSet;

/// Header line that opens each per-file section of `git diff` output.
const SECTION_HEADER: &str = "diff --git ";

/// Normalize a path to forward-slashed, repository-relative form.
///
/// Backslashes become forward slashes and any leading `./` segments are
/// removed. Both sides of every exclusion comparison go through this.
pub fn normalize_repo_path(path: &str) -> String {
    let normalized = path.replace('\\', "/");
    let mut rest = normalized.as_str();
    while let Some(stripped) = rest.strip_prefix("./") {
        rest = stripped;
    }
    rest.to_string()
}

/// Decode a path as git prints it in `--name-only` listings.
///
/// With `core.quotePath` (the default) git wraps paths containing non-ASCII
/// or control characters in double quotes and escapes them C-style, e.g.
/// `"caf\303\251/package-lock.json"`. Unquoted input is returned unchanged.
pub fn unquote_git_path(raw: &str) -> String {
    let Some(inner) = raw.strip_prefix('"').and_then(|s| s.strip_suffix('"')) else {
        return raw.to_string();
    };

    let src = inner.as_bytes();
    let mut bytes = Vec::with_capacity(src.len());
    let mut i = 0;
    while i < src.len() {
        if src[i] != b'\\' {
            bytes.push(src[i]);
            i += 1;
            continue;
        }
        i += 1;
        match src.get(i).copied() {
            Some(b'0'..=b'7') => {
                let digits = src[i..]
                    .iter()
                    .take(3)
                    .take_while(|c| (b'0'..=b'7').contains(*c))
                    .count();
                let value = src[i..i + digits]
                    .iter()
                    .fold(0u32, |acc, c| acc * 8 + u32::from(c - b'0'));
                bytes.push((value & 0xff) as u8);
                i += digits;
            }
            Some(c) => {
                bytes.push(match c {
                    b'a' => 0x07,
                    b'b' => 0x08,
                    b't' => b'\t',
                    b'n' => b'\n',
                    b'v' => 0x0b,
                    b'f' => 0x0c,
                    b'r' => b'\r',
                    other => other,
                });
                i += 1;
            }
            None => bytes.push(b'\\'),
        }
    }

    String::from_utf8_lossy(&bytes).into_owned()
}

/// A set of normalized paths whose diff content must not leave the machine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    paths: HashSet<String>,
}

impl ExclusionSet {
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            paths: paths
                .into_iter()
                .map(|p| normalize_repo_path(p.as_ref()))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Whether `path` (in any accepted spelling) is excluded.
    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains(&normalize_repo_path(path))
    }
}

/// Extract the path a section header refers to.
///
/// Prefers the destination (`b/`) path and falls back to the source (`a/`)
/// path. Returns `None` for headers that do not carry both tokens.
fn section_path(header: &str) -> Option<&str> {
    let parts: Vec<&str> = header.split_whitespace().collect();
    if parts.len() < 4 {
        return None;
    }

    let a_path = parts[2].strip_prefix("a/").unwrap_or("");
    let b_path = parts[3].strip_prefix("b/").unwrap_or("");

    let path = if b_path.is_empty() { a_path } else { b_path };
    (!path.is_empty()).then_some(path)
}

/// Remove every per-file section whose path is in `excluded`.
///
/// Dropped sections disappear entirely, header included, up to the next
/// section header or the end of input. Everything else is copied through
/// byte for byte, including any preamble before the first header and the
/// trailing newline. Unparseable headers are kept.
pub fn filter_diff_excluding_paths(diff: &str, excluded: &ExclusionSet) -> String {
    if diff.is_empty() || excluded.is_empty() {
        return diff.to_string();
    }

    let mut kept = String::with_capacity(diff.len());
    let mut skipping = false;

    for line in diff.split_inclusive('\n') {
        if line.starts_with(SECTION_HEADER) {
            skipping = section_path(line).is_some_and(|path| excluded.contains(path));
        }

        if !skipping {
            kept.push_str(line);
        }
    }

    kept
}
