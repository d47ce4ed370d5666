//! Path alias tables
//!
//! Aliases are plain prefix substitutions. Ordering matters: the first entry
//! whose `find` prefixes a specifier wins, even when a later entry would be a
//! longer match.

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::utils::{is_absolute, join_paths, normalize_slashes, path_to_module_id};

/// A single `find` → `replacement` entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alias {
    pub find: String,
    pub replacement: String,
}

impl Alias {
    pub fn new(find: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            find: find.into(),
            replacement: replacement.into(),
        }
    }
}

/// Alias configuration as users write it
///
/// Either an ordered list of entries or a map keyed by prefix. Map order is the
/// order the keys were written in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AliasConfig {
    List(Vec<Alias>),
    Map(IndexMap<String, String>),
}

impl AliasConfig {
    /// Anchor relative replacements at `root`
    pub fn relative_to(&self, root: &Path) -> Self {
        let root = path_to_module_id(root);
        let anchor = |replacement: &str| {
            if is_absolute(&normalize_slashes(replacement)) {
                replacement.to_string()
            } else {
                join_paths(&root, replacement)
            }
        };
        match self {
            AliasConfig::List(entries) => AliasConfig::List(
                entries
                    .iter()
                    .map(|a| Alias::new(a.find.clone(), anchor(&a.replacement)))
                    .collect(),
            ),
            AliasConfig::Map(map) => AliasConfig::Map(
                map.iter()
                    .map(|(find, replacement)| (find.clone(), anchor(replacement)))
                    .collect(),
            ),
        }
    }
}

/// Failure to resolve a specifier through the alias table
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("alias entry #{index} has an empty `find` prefix")]
    EmptyAliasPrefix { index: usize },

    #[error("`{import_path}` resolved to an empty module id")]
    EmptyModuleId { import_path: String },
}

/// Snapshot of the alias configuration in lookup order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasTable {
    entries: Vec<Alias>,
}

impl AliasTable {
    pub fn new(entries: Vec<Alias>) -> Self {
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Alias] {
        &self.entries
    }

    /// Rewrite `specifier` with the first matching entry
    ///
    /// Returns `Ok(None)` when no entry matches. An empty `find` is rejected
    /// once the lookup reaches it, since it would swallow every specifier.
    pub fn apply(&self, specifier: &str) -> Result<Option<String>, ResolveError> {
        for (index, alias) in self.entries.iter().enumerate() {
            if alias.find.is_empty() {
                return Err(ResolveError::EmptyAliasPrefix { index });
            }
            if let Some(rest) = specifier.strip_prefix(alias.find.as_str()) {
                return Ok(Some(join_paths(&alias.replacement, rest)));
            }
        }
        Ok(None)
    }
}

impl From<AliasConfig> for AliasTable {
    fn from(config: AliasConfig) -> Self {
        match config {
            AliasConfig::List(entries) => Self::new(entries),
            AliasConfig::Map(map) => Self::new(
                map.into_iter()
                    .map(|(find, replacement)| Alias { find, replacement })
                    .collect(),
            ),
        }
    }
}
