//! CLI commands for apiref: resolve and index.

use std::path::PathBuf;
use std::process::ExitCode;

use indexmap::{IndexMap, IndexSet};

use crate::cache::IndexCache;
use crate::config::Config;
use crate::error;
use crate::resolver::{self, Source};
use crate::scanner;
use crate::types::IndexKey;

/// Inputs of the `resolve` command after argument parsing.
pub struct ResolveRequest {
    /// Markdown files or directories to scan for undefined references.
    pub from: Vec<PathBuf>,
    /// Names given directly on the command line.
    pub names: Vec<String>,
    /// Site root overriding the configured one.
    pub site_root: Option<String>,
    /// Source overriding the configured ones.
    pub source: Option<Source>,
}

/// Print every name of each source's index with its candidate links.
///
/// Text output groups entries under a `# <package>` heading per source. JSON output
/// is one object keyed by package, each mapping names to candidate arrays.
///
/// # Errors
///
/// Returns `Error::NoSources` if nothing is configured, index build errors,
/// or `Error::Json` if serialization fails.
pub fn index(source: Option<Source>, ambiguous_only: bool, json: bool) -> Result<(), error::Error> {
    let root = PathBuf::from(".");
    let config = Config::load(&root)?;
    let sources = select_sources(source, config.sources);
    if sources.is_empty() {
        return Err(error::Error::NoSources);
    }

    let mut cache = IndexCache::new();
    let mut dump: IndexMap<String, IndexMap<String, Vec<String>>> = IndexMap::new();
    for source in &sources {
        let key = IndexKey::new(source.docs_root.clone(), &source.package);
        let built = cache.get_or_build(&key)?;
        if built.is_empty() {
            tracing::warn!(package = %source.package, "index page has no references");
        }
        let entries: Vec<(String, Vec<String>)> = if ambiguous_only {
            built.ambiguous().map(|(name, links)| return (name.to_string(), links.to_vec())).collect()
        } else {
            built.iter().map(|(name, links)| return (name.to_string(), links.to_vec())).collect()
        };
        dump.entry(source.package.clone()).or_default().extend(entries);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&dump)?);
        return Ok(());
    }

    for (package, entries) in &dump {
        println!("# {package}");
        for (name, links) in entries {
            println!("{name} -> {}", links.join(", "));
        }
    }
    return Ok(());
}

/// Resolve names from the command line and from scanned markdown, printing link
/// definitions to stdout and unresolved names to stderr.
///
/// Exit code 0 when every name resolved, 1 when some remain unresolved.
///
/// # Errors
///
/// Returns errors from config loading, markdown scanning, or index building.
pub fn resolve(request: ResolveRequest) -> Result<ExitCode, error::Error> {
    let root = PathBuf::from(".");
    let config = Config::load(&root)?;

    let mut remaining: IndexSet<String> = request.names.into_iter().collect();
    for path in &request.from {
        remaining.extend(scanner::scan(path)?);
    }
    if remaining.is_empty() {
        eprintln!("Nothing to resolve.");
        return Ok(ExitCode::SUCCESS);
    }

    let sources = select_sources(request.source, config.sources);
    let site_root = request.site_root.unwrap_or(config.site_root);
    let mut cache = IndexCache::new();
    let definitions =
        resolver::resolve_all(&mut cache, site_root.trim_end_matches('/'), &sources, &mut remaining)?;

    for definition in &definitions {
        println!("{definition}");
    }
    for name in &remaining {
        eprintln!("unresolved: {name}");
    }
    tracing::info!(
        resolved = definitions.len(),
        unresolved = remaining.len(),
        indexes = cache.len(),
        "resolution finished"
    );

    if remaining.is_empty() {
        return Ok(ExitCode::SUCCESS);
    } else {
        return Ok(ExitCode::from(1));
    }
}

/// An explicit source replaces the configured ones.
fn select_sources(explicit: Option<Source>, configured: Vec<Source>) -> Vec<Source> {
    return explicit.map_or(configured, |source| return vec![source]);
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, reason = "tests")]
mod tests {
    use super::*;

    fn source(package: &str) -> Source {
        return Source {
            docs_root: PathBuf::from("docs"),
            package: package.to_string(),
        };
    }

    #[test]
    fn explicit_source_wins_over_configured() {
        let selected = select_sources(Some(source("cli")), vec![source("a"), source("b")]);
        assert_eq!(selected, vec![source("cli")]);
    }

    #[test]
    fn configured_sources_used_without_override() {
        let selected = select_sources(None, vec![source("a"), source("b")]);
        assert_eq!(selected, vec![source("a"), source("b")]);
    }
}
