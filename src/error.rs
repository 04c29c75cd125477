/// Crate-level error types for apiref diagnostics.
use std::path::PathBuf;

/// All errors in apiref carry enough context to produce a useful diagnostic
/// without a debugger. Each variant names the page, package, or reason for failure.
#[allow(clippy::error_impl_error, reason = "crate-internal error type in binary")]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A package index page does not exist or cannot be opened.
    #[error("index page not found: {}", path.display())]
    IndexPageNotFound {
        /// Path of the `index.md` page that could not be opened.
        path: PathBuf,
        /// The underlying open failure.
        #[source]
        source: std::io::Error,
    },

    /// Underlying I/O error from the filesystem.
    #[error("io: {0}")]
    Io(
        /// The wrapped I/O error.
        #[from]
        std::io::Error,
    ),

    /// Index dump could not be serialized.
    #[error("json: {0}")]
    Json(
        /// The wrapped JSON serialization error.
        #[from]
        serde_json::Error,
    ),

    /// Resolution was requested without any documentation source.
    #[error("no documentation sources configured")]
    NoSources,

    /// A package index page was opened but could not be read.
    #[error("failed to read index page {}", path.display())]
    PageRead {
        /// Path of the `index.md` page being read.
        path: PathBuf,
        /// The underlying read failure.
        #[source]
        source: std::io::Error,
    },

    /// A reference pattern failed to compile.
    #[error("regex: {0}")]
    Regex(
        /// The wrapped regex compilation error.
        #[from]
        regex::Error,
    ),

    /// Building a nested package failed, which fails the enclosing package too.
    #[error("failed to parse sub-package `{package}` under {}", docs_root.display())]
    SubPackageFailed {
        /// Documentation root the build was walking.
        docs_root: PathBuf,
        /// Package path of the sub-package, relative to the documentation root.
        package: String,
        /// Why the sub-package build failed.
        #[source]
        source: Box<Error>,
    },

    /// TOML deserialization failed.
    #[error("toml deserialize: {0}")]
    TomlDe(
        /// The wrapped TOML deserialization error.
        #[from]
        toml::de::Error,
    ),

    /// A markdown path could not be walked, usually because it does not exist.
    #[error("walk: {0}")]
    Walk(
        /// The wrapped directory walk error.
        #[from]
        walkdir::Error,
    ),
}

impl Error {
    /// The innermost error, following nested sub-package failures.
    pub fn root_cause(&self) -> &Self {
        return match self {
            Self::SubPackageFailed { source, .. } => source.root_cause(),
            other => other,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_cause_unwraps_nested_sub_package_failures() {
        let missing = Error::IndexPageNotFound {
            path: PathBuf::from("docs/core/a/b/index.md"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        let inner = Error::SubPackageFailed {
            docs_root: PathBuf::from("docs"),
            package: "core/a/b".to_string(),
            source: Box::new(missing),
        };
        let outer = Error::SubPackageFailed {
            docs_root: PathBuf::from("docs"),
            package: "core/a".to_string(),
            source: Box::new(inner),
        };

        assert!(matches!(outer.root_cause(), Error::IndexPageNotFound { .. }));
        assert_eq!(
            outer.to_string(),
            "failed to parse sub-package `core/a` under docs"
        );
    }
}
