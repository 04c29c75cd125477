//! Recognizes reference lines in generated documentation index pages.

use regex::Regex;

use crate::error::Error;
use crate::types::Reference;

/// Anchor form: `<a href="LINK">NAME</a>`, matched against the whole line.
const ANCHOR_PATTERN: &str = r#"^<a href="([a-z0-9_/.\-]+)">([A-Za-z0-9.]+)</a>$"#;

/// Suffix of rendered pages.
pub const HTML_SUFFIX: &str = ".html";

/// Suffix of markdown pages.
pub const MD_SUFFIX: &str = ".md";

/// Table-row form: `| [NAME](LINK) | ...`, matched against the whole line.
const TABLE_ROW_PATTERN: &str = r"^\| \[([A-Za-z0-9.]+)\]\(([a-z0-9_/.\-]+)\) \|.*$";

/// Both reference patterns, compiled once and reused for every line of every page.
pub struct LineMatcher {
    /// Compiled [`ANCHOR_PATTERN`].
    anchor: Regex,
    /// Compiled [`TABLE_ROW_PATTERN`].
    table_row: Regex,
}

impl LineMatcher {
    /// Extract a reference from one line, trying the anchor form first.
    /// Returns `None` for the ordinary prose and markup lines that make up most of a page.
    pub fn match_line(&self, line: &str) -> Option<Reference> {
        if let Some(cap) = self.anchor.captures(line) {
            return Some(Reference {
                link: cap.get(1)?.as_str().to_string(),
                name: cap.get(2)?.as_str().to_string(),
            });
        }

        let cap = self.table_row.captures(line)?;
        let raw_link = cap.get(2)?.as_str();
        let link = raw_link.strip_suffix(MD_SUFFIX).map_or_else(
            || return raw_link.to_string(),
            |stem| return format!("{stem}{HTML_SUFFIX}"),
        );
        return Some(Reference {
            link,
            name: cap.get(1)?.as_str().to_string(),
        });
    }

    /// Compile both reference patterns.
    ///
    /// # Errors
    ///
    /// Returns `Error::Regex` if a pattern fails to compile.
    pub fn new() -> Result<Self, Error> {
        return Ok(Self {
            anchor: Regex::new(ANCHOR_PATTERN)?,
            table_row: Regex::new(TABLE_ROW_PATTERN)?,
        });
    }
}
