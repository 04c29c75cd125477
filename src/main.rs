mod cache;
mod commands;
mod config;
mod diagnostics;
mod error;
mod index;
mod matcher;
mod resolver;
mod scanner;
mod types;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::resolver::Source;

#[derive(Parser)]
#[command(
    name = "apiref",
    about = "Resolve API symbol references in markdown to generated documentation links"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the name index built from a documentation tree
    Index {
        /// Only show names with more than one candidate link
        #[arg(long)]
        ambiguous: bool,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Resolve reference names into markdown link definitions
    Resolve {
        /// Markdown file or directory to scan for undefined references
        #[arg(long, value_name = "PATH")]
        from: Vec<PathBuf>,
        /// Reference names to resolve
        names: Vec<String>,
        /// URL prefix for resolved links (overrides .apiref.toml)
        #[arg(long, value_name = "URL")]
        site_root: Option<String>,
        #[command(flatten)]
        source: SourceArgs,
    },
}

/// A documentation source given on the command line instead of `.apiref.toml`.
#[derive(Args)]
struct SourceArgs {
    /// Documentation root holding generated pages
    #[arg(long, value_name = "DIR", requires = "package")]
    docs_root: Option<PathBuf>,
    /// Top package under the documentation root
    #[arg(long, value_name = "PKG", requires = "docs_root")]
    package: Option<String>,
}

impl SourceArgs {
    /// Both flags together form a source; neither means "use the config".
    fn into_source(self) -> Option<Source> {
        let (Some(docs_root), Some(package)) = (self.docs_root, self.package) else {
            return None;
        };
        return Some(Source { docs_root, package });
    }
}

/// Send `tracing` output to stderr, filtered by `RUST_LOG` (default `warn`).
/// Stdout is reserved for command output.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_err| return EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Index { ambiguous, json, source } => {
            commands::index(source.into_source(), ambiguous, json).map(|()| return ExitCode::SUCCESS)
        },
        Commands::Resolve { from, names, site_root, source } => {
            commands::resolve(commands::ResolveRequest {
                from,
                names,
                site_root,
                source: source.into_source(),
            })
        },
    };

    return match result {
        Ok(code) => code,
        Err(e) => {
            diagnostics::print_error(&e);
            ExitCode::from(2)
        },
    };
}
