use std::path::PathBuf;

use indexmap::IndexSet;

use crate::cache::IndexCache;
use crate::error::Error;
use crate::types::IndexKey;

/// One documentation hierarchy to resolve names against.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct Source {
    /// Directory holding the generated documentation pages.
    pub docs_root: PathBuf,
    /// Top package walked from the documentation root.
    pub package: String,
}

/// Resolve as many of `remaining` as possible against one package's index.
///
/// Each resolved name produces a markdown link definition `[name]: site_root/link`
/// and is removed from `remaining`. Names without an index entry stay in the set
/// for a later source. When a name has several candidates the shortest link wins.
///
/// # Errors
///
/// Returns the index build error if the package's pages cannot be read.
pub fn resolve(
    cache: &mut IndexCache,
    site_root: &str,
    source: &Source,
    remaining: &mut IndexSet<String>,
) -> Result<Vec<String>, Error> {
    let key = IndexKey::new(source.docs_root.clone(), &source.package);
    let index = cache.get_or_build(&key)?;

    let mut definitions = Vec::new();
    remaining.retain(|name| {
        let Some(link) = index
            .candidates(name)
            .and_then(|links| return links.iter().min_by_key(|link| return link.len()))
        else {
            return true;
        };
        definitions.push(format!("[{name}]: {site_root}/{link}"));
        return false;
    });

    return Ok(definitions);
}

/// Resolve `remaining` against each source in turn, feeding the leftovers of one
/// source into the next.
///
/// # Errors
///
/// Returns `Error::NoSources` if `sources` is empty, or the first index build error.
pub fn resolve_all(
    cache: &mut IndexCache,
    site_root: &str,
    sources: &[Source],
    remaining: &mut IndexSet<String>,
) -> Result<Vec<String>, Error> {
    if sources.is_empty() {
        return Err(Error::NoSources);
    }

    let mut definitions = Vec::new();
    for source in sources {
        if remaining.is_empty() {
            break;
        }
        definitions.extend(resolve(cache, site_root, source, remaining)?);
    }
    return Ok(definitions);
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, reason = "tests")]
mod tests {
    use std::path::Path;

    use super::*;

    fn write_page(root: &Path, package_path: &str, content: &str) {
        let dir = root.join(package_path);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("index.md"), content).unwrap();
    }

    fn names(items: &[&str]) -> IndexSet<String> {
        return items.iter().map(|s| return (*s).to_string()).collect();
    }

    fn ordered(set: &IndexSet<String>) -> Vec<&str> {
        return set.iter().map(String::as_str).collect();
    }

    fn source(root: &Path, package: &str) -> Source {
        return Source {
            docs_root: root.to_path_buf(),
            package: package.to_string(),
        };
    }

    #[test]
    fn resolved_name_is_emitted_and_removed() {
        let dir = tempfile::tempdir().unwrap();
        write_page(dir.path(), "pkg", "| [Foo](foo.md) | desc |\n");
        let mut cache = IndexCache::new();
        let mut remaining = names(&["pkg.Foo"]);

        let lines = resolve(&mut cache, "https://x", &source(dir.path(), "pkg"), &mut remaining).unwrap();

        assert_eq!(lines, vec!["[pkg.Foo]: https://x/pkg/foo.html"]);
        assert!(remaining.is_empty());
    }

    #[test]
    fn unresolved_names_stay_in_caller_order() {
        let dir = tempfile::tempdir().unwrap();
        write_page(dir.path(), "pkg", "| [Foo](foo.md) | desc |\n");
        let mut cache = IndexCache::new();
        let mut remaining = names(&["Missing", "Foo", "AlsoMissing"]);

        let lines = resolve(&mut cache, "site", &source(dir.path(), "pkg"), &mut remaining).unwrap();

        assert_eq!(lines, vec!["[Foo]: site/pkg/foo.html"]);
        assert_eq!(ordered(&remaining), vec!["Missing", "AlsoMissing"]);
    }

    #[test]
    fn ambiguous_name_takes_the_shortest_link() {
        let dir = tempfile::tempdir().unwrap();
        write_page(
            dir.path(),
            "pkg",
            "### Functions\n\n| [await](long-await-link.md) | a |\n| [await](await.md) | b |\n",
        );
        let mut cache = IndexCache::new();
        let mut remaining = names(&["await"]);

        let lines = resolve(&mut cache, "s", &source(dir.path(), "pkg"), &mut remaining).unwrap();

        assert_eq!(lines, vec!["[await]: s/pkg/await.html"]);
    }

    #[test]
    fn lines_follow_resolution_order() {
        let dir = tempfile::tempdir().unwrap();
        write_page(dir.path(), "pkg", "| [A](a.md) | |\n| [B](b.md) | |\n");
        let mut cache = IndexCache::new();
        let mut remaining = names(&["B", "A"]);

        let lines = resolve(&mut cache, "s", &source(dir.path(), "pkg"), &mut remaining).unwrap();

        assert_eq!(lines, vec!["[B]: s/pkg/b.html", "[A]: s/pkg/a.html"]);
    }

    #[test]
    fn unreadable_package_fails_and_keeps_names() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = IndexCache::new();
        let mut remaining = names(&["Foo"]);

        let result = resolve(&mut cache, "s", &source(dir.path(), "nope"), &mut remaining);

        assert!(matches!(result, Err(Error::IndexPageNotFound { .. })));
        assert_eq!(ordered(&remaining), vec!["Foo"]);
    }

    #[test]
    fn later_sources_see_only_leftovers() {
        let dir = tempfile::tempdir().unwrap();
        write_page(dir.path(), "first", "| [Shared](shared.md) | |\n");
        write_page(dir.path(), "second", "| [Shared](shared.md) | |\n| [Extra](extra.md) | |\n");
        let sources = vec![source(dir.path(), "first"), source(dir.path(), "second")];
        let mut cache = IndexCache::new();
        let mut remaining = names(&["Shared", "Extra", "Nowhere"]);

        let lines = resolve_all(&mut cache, "s", &sources, &mut remaining).unwrap();

        assert_eq!(lines, vec!["[Shared]: s/first/shared.html", "[Extra]: s/second/extra.html"]);
        assert_eq!(ordered(&remaining), vec!["Nowhere"]);
    }

    #[test]
    fn no_sources_is_an_error() {
        let mut cache = IndexCache::new();
        let mut remaining = names(&["Foo"]);
        assert!(matches!(
            resolve_all(&mut cache, "s", &[], &mut remaining),
            Err(Error::NoSources)
        ));
    }
}
