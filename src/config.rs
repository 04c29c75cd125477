use std::path::Path;

use crate::error::Error;
use crate::resolver::Source;

/// Name of the project configuration file.
pub const CONFIG_FILE: &str = ".apiref.toml";

/// Project configuration loaded from `.apiref.toml`.
/// Sources are tried in the order they are listed.
#[derive(Debug, Default, PartialEq, Eq, serde::Deserialize)]
pub struct Config {
    /// URL prefix prepended to every resolved link.
    #[serde(default)]
    pub site_root: String,
    /// Documentation hierarchies to resolve against.
    #[serde(default)]
    pub sources: Vec<Source>,
}

impl Config {
    /// Load config from `.apiref.toml` in the given root directory.
    /// Returns an empty default if the file doesn't exist.
    /// Returns an error if the file exists but is malformed, never silently
    /// falling back to defaults when the user wrote a config file.
    ///
    /// Relative documentation roots are taken relative to `root`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if reading fails (other than not-found),
    /// or `Error::TomlDe` if the TOML is malformed.
    pub fn load(root: &Path) -> Result<Self, Error> {
        let path = root.join(CONFIG_FILE);
        let content = match std::fs::read_to_string(&path) {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(Error::Io(e)),
            Ok(c) => c,
        };

        let mut config: Self = toml::from_str(&content)?;
        for source in &mut config.sources {
            source.docs_root = root.join(&source.docs_root);
        }
        return Ok(config);
    }
}
