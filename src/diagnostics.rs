use std::fmt::Write as _;
use std::path::Path;

use crate::config::CONFIG_FILE;
use crate::error::Error;

/// ANSI bold on.
const BOLD: &str = "\x1b[1m";
/// ANSI reset.
const RESET: &str = "\x1b[0m";

/// Render an error as valid markdown with bold headings and print to stderr.
pub fn print_error(e: &Error) {
    let md = render_error(e);
    for line in md.lines() {
        if line.starts_with('#') {
            eprintln!("{BOLD}{line}{RESET}");
        } else {
            eprintln!("{line}");
        }
    }
}

/// Render an error as a structured markdown diagnostic.
///
/// Each variant produces a block with what happened and how to fix it.
pub fn render_error(e: &Error) -> String {
    let mut chain = Vec::new();
    let mut current = e;
    while let Error::SubPackageFailed { package, source, .. } = current {
        chain.push(package.as_str());
        current = &**source;
    }

    return match e.root_cause() {
        Error::IndexPageNotFound { path, .. } => render_index_page_not_found(path, &chain),
        Error::NoSources => format!(
            "\
# Error: No Documentation Sources

Nothing to resolve against.

## Fix

Add a `[[sources]]` table to `{CONFIG_FILE}`, or pass `--docs-root` and `--package`.
"
        ),
        Error::TomlDe(err) => format!(
            "\
# Error: Invalid Config

`{CONFIG_FILE}` could not be parsed:

{err}
"
        ),
        Error::Walk(err) => format!(
            "\
# Error: Markdown Path Not Readable

{err}

## Fix

Check the paths passed to `--from`.
"
        ),
        other => format!("# Error\n\n{other}\n"),
    };
}

/// Render a missing index page, naming the nested package chain when there is one.
fn render_index_page_not_found(path: &Path, chain: &[&str]) -> String {
    let mut out = format!(
        "\
# Error: Index Page Not Found

`{}` does not exist or cannot be opened.
",
        path.display()
    );
    if !chain.is_empty() {
        out.push_str("\nReached through sub-packages:\n\n");
        for package in chain {
            let _ = writeln!(out, "- `{package}`");
        }
    }
    out.push_str(
        "
## Fix

Check `docs_root` and `package` in your source, and that the documentation has been generated.
",
    );
    return out;
}
