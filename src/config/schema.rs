//! Configuration schema definitions

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::plugins::ChunkPaths;
use crate::resolver::AliasConfig;

/// Project metadata configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Project name
    pub name: String,

    /// Project version
    #[serde(default = "default_version")]
    pub version: String,
}

fn default_version() -> String {
    "0.1.0".to_string()
}

/// `[resolve]` section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolveConfig {
    /// Import aliases, either a `find -> replacement` table or a list of
    /// `{ find, replacement }` entries. Relative replacements are taken
    /// from the project root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<AliasConfig>,
}

/// `[build]` section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildSection {
    /// Chunk name -> path fragment(s), checked in order
    #[serde(default, alias = "manualChunks", skip_serializing_if = "Option::is_none")]
    pub manual_chunks: Option<IndexMap<String, ChunkPaths>>,
}
