//! Memoized name indexes, one per (documentation root, package) for the life of the run.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::error::Error;
use crate::index;
use crate::types::{IndexKey, NameIndex};

/// Built indexes keyed by [`IndexKey`]. Entries are added once and never invalidated.
/// Failed builds are not stored, so a later lookup with the same key retries.
#[derive(Debug, Default)]
pub struct IndexCache {
    /// Successfully built indexes.
    indexes: HashMap<IndexKey, NameIndex>,
}

#[allow(clippy::len_without_is_empty, reason = "the cache only grows; callers report its size")]
impl IndexCache {
    /// Return the index for `key`, building it from disk on first request.
    ///
    /// # Errors
    ///
    /// Returns the build error if the package's pages cannot be read.
    /// Nothing is cached in that case.
    pub fn get_or_build(&mut self, key: &IndexKey) -> Result<&NameIndex, Error> {
        return match self.indexes.entry(key.clone()) {
            Entry::Occupied(entry) => {
                tracing::debug!(docs_root = %key.docs_root.display(), package = %key.package, "index cache hit");
                Ok(entry.into_mut())
            },
            Entry::Vacant(entry) => {
                let built = index::build(&key.docs_root, &key.package, &key.package, "")?;
                tracing::debug!(
                    docs_root = %key.docs_root.display(),
                    package = %key.package,
                    definitions = built.len(),
                    "parsed API docs"
                );
                Ok(entry.insert(built))
            },
        };
    }

    /// Number of indexes built so far.
    pub fn len(&self) -> usize {
        return self.indexes.len();
    }

    /// An empty cache.
    pub fn new() -> Self {
        return Self::default();
    }
}
