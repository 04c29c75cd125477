//! Recursive construction of a [`NameIndex`] from a package's documentation pages.
//!
//! Every package has a page at `docs_root/<package path>/index.md`. Each reference
//! line on that page is registered under several names (relative, fully qualified,
//! and a few disambiguating aliases), and links to nested `index` pages are walked
//! depth-first with the enclosing name as prefix.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead as _, BufReader};
use std::path::Path;

use crate::error::Error;
use crate::matcher::{HTML_SUFFIX, LineMatcher, MD_SUFFIX};
use crate::types::NameIndex;

/// Heading after which page entries are functions and constructors rather than types.
const FUNCTIONS_SECTION_HEADER: &str = "### Functions";

/// File stem of a package page.
const INDEX_STEM: &str = "index";

/// State shared by every recursive step of one top-level build.
struct PackageWalk<'a> {
    /// Documentation root all package paths are relative to.
    docs_root: &'a Path,
    /// Compiled reference patterns.
    matcher: LineMatcher,
    /// Package every fully qualified name is rooted at.
    top_package: &'a str,
    /// Normalized package paths already parsed during this build, the top package included.
    visited: HashSet<String>,
}

impl PackageWalk<'_> {
    /// Parse one package page and every sub-package page reachable from it.
    ///
    /// # Errors
    ///
    /// Returns `Error::IndexPageNotFound` if the page cannot be opened,
    /// `Error::PageRead` if reading fails, or `Error::SubPackageFailed` if a nested page fails.
    fn build_package(&mut self, package_path: &str, name_prefix: &str) -> Result<NameIndex, Error> {
        let path = self
            .docs_root
            .join(package_path)
            .join(format!("{INDEX_STEM}{MD_SUFFIX}"));
        let file = File::open(&path).map_err(|source| {
            return Error::IndexPageNotFound { path: path.clone(), source };
        })?;

        let sub_index_suffix = format!("/{INDEX_STEM}{HTML_SUFFIX}");
        let mut index = NameIndex::new();
        let mut in_functions_section = false;

        let mut reader = BufReader::new(file);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            let read = reader.read_until(b'\n', &mut buf).map_err(|source| {
                return Error::PageRead { path: path.clone(), source };
            })?;
            if read == 0 {
                break;
            }
            // Invalid UTF-8 becomes U+FFFD.
            let decoded = String::from_utf8_lossy(&buf);
            let line = decoded.trim_end_matches(['\n', '\r']);
            if line == FUNCTIONS_SECTION_HEADER {
                in_functions_section = true;
            }
            let Some(reference) = self.matcher.match_line(line) else {
                continue;
            };
            // Cross-references out of this package subtree.
            if reference.link.starts_with("..") {
                continue;
            }

            let abs_link = format!("{package_path}/{}", reference.link);
            let name = if in_functions_section && starts_with_ascii_upper(&reference.name) {
                format!("{}()", reference.name)
            } else {
                reference.name
            };
            let ref_name = format!("{name_prefix}{name}");

            for alias in names_for_entry(&name, name_prefix, self.top_package) {
                index.append(&alias, &abs_link);
            }

            let Some(sub_dir) = reference.link.strip_suffix(sub_index_suffix.as_str()) else {
                continue;
            };
            let sub_package = normalize_package_path(&format!("{package_path}/{sub_dir}"));
            if !self.visited.insert(sub_package.clone()) {
                continue;
            }
            tracing::trace!(package = %sub_package, prefix = %ref_name, "descending into sub-package");
            let nested = self
                .build_package(&sub_package, &format!("{ref_name}."))
                .map_err(|source| {
                    return Error::SubPackageFailed {
                        docs_root: self.docs_root.to_path_buf(),
                        package: sub_package.clone(),
                        source: Box::new(source),
                    };
                })?;
            index.merge(nested);
        }

        return Ok(index);
    }
}

/// Build the name index for `package_path` under `docs_root`, recursing into sub-packages.
///
/// `top_package` roots every fully qualified name. `name_prefix` is prepended to
/// every name found on the page; top-level builds pass an empty prefix.
///
/// # Errors
///
/// Returns `Error::IndexPageNotFound` if any page in the hierarchy cannot be opened,
/// wrapped in `Error::SubPackageFailed` when the missing page is a nested one.
pub fn build(
    docs_root: &Path,
    package_path: &str,
    top_package: &str,
    name_prefix: &str,
) -> Result<NameIndex, Error> {
    let mut walk = PackageWalk {
        docs_root,
        matcher: LineMatcher::new()?,
        top_package,
        visited: HashSet::from([normalize_package_path(package_path)]),
    };
    return walk.build_package(package_path, name_prefix);
}

/// Collapse `.` and `<dir>/..` segments of a `/`-separated package path.
///
/// Leading `..` segments with nothing left to pop are kept.
fn normalize_package_path(package_path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in package_path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.last().is_some_and(|last| return *last != "..") {
                    segments.pop();
                } else {
                    segments.push(segment);
                }
            }
            other => segments.push(other),
        }
    }
    return segments.join("/");
}

/// Every name one page entry is registered under, in registration order.
///
/// Members of a lower-case prefix (an extension on a foreign type named by its
/// fully qualified name) also get `<Type>.<member>` and bare `<member>` aliases.
/// Top-level lower-case names also get `_<name>`, which keeps builder functions
/// apart from the upper-case type of near-identical name. The prefixed name and
/// the fully qualified name are always present.
fn names_for_entry(name: &str, name_prefix: &str, top_package: &str) -> Vec<String> {
    let mut names = Vec::new();

    if starts_with_ascii_lower(name_prefix) {
        let receiver = name_prefix.strip_suffix('.').unwrap_or(name_prefix);
        if let Some((_, last_segment)) = receiver.rsplit_once('.') {
            names.push(format!("{last_segment}.{name}"));
        }
        names.push(name.to_string());
    }

    if name_prefix.is_empty() && starts_with_ascii_lower(name) {
        names.push(format!("_{name}"));
    }

    let ref_name = format!("{name_prefix}{name}");
    let fq_name = format!("{top_package}.{ref_name}");
    names.push(ref_name);
    names.push(fq_name);

    return names;
}

/// True when the first character is `a..=z`.
fn starts_with_ascii_lower(s: &str) -> bool {
    return s.chars().next().is_some_and(|c| return c.is_ascii_lowercase());
}

/// True when the first character is `A..=Z`.
fn starts_with_ascii_upper(s: &str) -> bool {
    return s.chars().next().is_some_and(|c| return c.is_ascii_uppercase());
}
