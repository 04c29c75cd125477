/// Core domain types for apiref: cache keys, matched references, and the name index.
use std::path::PathBuf;

use indexmap::IndexMap;

/// Identity of one built index: a documentation root plus the top package walked from it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IndexKey {
    /// Directory holding the generated documentation pages.
    pub docs_root: PathBuf,
    /// Top package name; its page lives at `docs_root/package/index.md`.
    pub package: String,
}

impl IndexKey {
    /// Build a key from a documentation root and a package name.
    pub fn new(docs_root: impl Into<PathBuf>, package: &str) -> Self {
        return Self {
            docs_root: docs_root.into(),
            package: package.to_string(),
        };
    }
}

/// A link/name pair matched on one line of an index page.
/// The link always ends in `.html` once the matcher has rewritten it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    /// Page link, relative to the page it was found on.
    pub link: String,
    /// Symbol name as written in the page.
    pub name: String,
}

/// Multi-valued map from symbol name to candidate links, both in discovery order.
///
/// A name can legitimately point at several pages (overloads, extensions on
/// different receivers). Candidates are appended, never overwritten, and every
/// key holds at least one link.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
#[serde(transparent)]
pub struct NameIndex {
    /// Name to ordered candidate links.
    entries: IndexMap<String, Vec<String>>,
}

impl NameIndex {
    /// Names with two or more candidate links, in discovery order.
    pub fn ambiguous(&self) -> impl Iterator<Item = (&str, &[String])> {
        return self.iter().filter(|(_, links)| return links.len() > 1);
    }

    /// Register `link` as a candidate for `name`, after any existing candidates.
    pub fn append(&mut self, name: &str, link: &str) {
        self.entries.entry(name.to_string()).or_default().push(link.to_string());
    }

    /// Candidate links for `name`, or `None` if the name was never registered.
    pub fn candidates(&self, name: &str) -> Option<&[String]> {
        return self.entries.get(name).map(Vec::as_slice);
    }

    /// True when no name has been registered.
    pub fn is_empty(&self) -> bool {
        return self.entries.is_empty();
    }

    /// All names with their candidates, in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        return self
            .entries
            .iter()
            .map(|(name, links)| return (name.as_str(), links.as_slice()));
    }

    /// Number of distinct names.
    pub fn len(&self) -> usize {
        return self.entries.len();
    }

    /// Append every candidate of `other` to this index.
    pub fn merge(&mut self, other: Self) {
        for (name, links) in other.entries {
            self.entries.entry(name).or_default().extend(links);
        }
    }

    /// An empty index.
    pub fn new() -> Self {
        return Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_keeps_every_candidate_in_order() {
        let mut index = NameIndex::new();
        index.append("launch", "core/launch.html");
        index.append("launch", "core/scope/launch.html");

        assert_eq!(
            index.candidates("launch"),
            Some(["core/launch.html".to_string(), "core/scope/launch.html".to_string()].as_slice())
        );
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn merge_appends_instead_of_overwriting() {
        let mut parent = NameIndex::new();
        parent.append("Job", "core/job.html");
        let mut child = NameIndex::new();
        child.append("Job", "core/sub/job.html");
        child.append("Deferred", "core/sub/deferred.html");

        parent.merge(child);

        assert_eq!(parent.candidates("Job").map(<[String]>::len), Some(2));
        let names: Vec<&str> = parent.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["Job", "Deferred"]);
    }

    #[test]
    fn ambiguous_lists_only_multi_candidate_names() {
        let mut index = NameIndex::new();
        index.append("a", "x.html");
        index.append("b", "y.html");
        index.append("b", "z.html");

        let ambiguous: Vec<&str> = index.ambiguous().map(|(name, _)| name).collect();
        assert_eq!(ambiguous, vec!["b"]);
    }

    #[test]
    fn unknown_name_has_no_candidates() {
        let index = NameIndex::new();
        assert!(index.is_empty());
        assert!(index.candidates("missing").is_none());
    }
}
