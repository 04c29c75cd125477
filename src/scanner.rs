use std::collections::HashSet;
use std::path::Path;

use indexmap::IndexSet;
use regex::Regex;
use walkdir::WalkDir;

use crate::error::Error;

/// Compiled patterns for reference usages and definitions in markdown.
struct MarkdownPatterns {
    /// Inline code spans, blanked out before scanning.
    code_span: Regex,
    /// A reference definition line: `[name]: url`.
    definition: Regex,
    /// A bracketed name: `[name]`.
    usage: Regex,
}

impl MarkdownPatterns {
    /// Compile all patterns.
    ///
    /// # Errors
    ///
    /// Returns `Error::Regex` if a pattern fails to compile.
    fn new() -> Result<Self, Error> {
        return Ok(Self {
            code_span: Regex::new(r"`[^`]*`")?,
            definition: Regex::new(r"^\[([A-Za-z0-9_.()]+)\]:")?,
            usage: Regex::new(r"\[([A-Za-z0-9_.()]+)\]")?,
        });
    }
}

/// Collect reference names used but not defined in one markdown document, in
/// order of first use.
///
/// A bracketed name directly followed by `(`, `[` or `:` is an inline link, a full
/// reference link, or a definition, and is not a usage. Fenced code blocks and
/// inline code spans are skipped.
fn extract_undefined_names(content: &str, patterns: &MarkdownPatterns) -> IndexSet<String> {
    let mut used = IndexSet::new();
    let mut defined = HashSet::new();
    let mut in_fence = false;

    for line in content.lines() {
        if line.trim_start().starts_with("```") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }
        if let Some(cap) = patterns.definition.captures(line) {
            if let Some(name) = cap.get(1) {
                defined.insert(name.as_str().to_string());
            }
            continue;
        }

        let prose = patterns.code_span.replace_all(line, "");
        for cap in patterns.usage.captures_iter(&prose) {
            let (Some(whole), Some(name)) = (cap.get(0), cap.get(1)) else {
                continue;
            };
            let next = prose.get(whole.end()..).and_then(|rest| return rest.chars().next());
            if matches!(next, Some('(' | '[' | ':')) {
                continue;
            }
            used.insert(name.as_str().to_string());
        }
    }

    used.retain(|name| return !defined.contains(name));
    return used;
}

/// Scan markdown files under `path` (or `path` itself, if it is a file) for
/// reference names that still need a definition.
/// Files are visited in file-name order; names keep the order of first use.
///
/// # Errors
///
/// Returns `Error::Walk` if `path` does not exist or a directory under it cannot
/// be listed, and `Error::Io` if a markdown file cannot be read.
pub fn scan(path: &Path) -> Result<IndexSet<String>, Error> {
    let patterns = MarkdownPatterns::new()?;
    let mut names = IndexSet::new();
    let mut files = 0_usize;

    for entry in WalkDir::new(path).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() || entry.path().extension().is_none_or(|ext| return ext != "md") {
            continue;
        }
        let content = std::fs::read_to_string(entry.path())?;
        names.extend(extract_undefined_names(&content, &patterns));
        files = files.saturating_add(1);
    }

    if files == 0 {
        tracing::warn!(path = %path.display(), "no markdown files found");
    }
    tracing::debug!(path = %path.display(), files, names = names.len(), "scanned markdown");

    return Ok(names);
}
