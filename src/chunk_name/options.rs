//! Plugin options

use serde::{Deserialize, Serialize};

/// One glob pattern or a list of them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterPattern {
    One(String),
    Many(Vec<String>),
}

impl FilterPattern {
    pub fn patterns(&self) -> &[String] {
        match self {
            FilterPattern::One(pattern) => std::slice::from_ref(pattern),
            FilterPattern::Many(patterns) => patterns,
        }
    }
}

/// Options of the chunk-name plugin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkNameOptions {
    /// Files scanned for annotated dynamic imports
    #[serde(default = "default_include")]
    pub include: FilterPattern,

    /// Files never scanned
    #[serde(default = "default_exclude")]
    pub exclude: FilterPattern,

    /// Give every package under `node_modules` its own chunk
    #[serde(default, alias = "minChunk")]
    pub min_chunk: bool,

    /// Emit diagnostic logging
    #[serde(default)]
    pub debug: bool,
}

impl Default for ChunkNameOptions {
    fn default() -> Self {
        Self {
            include: default_include(),
            exclude: default_exclude(),
            min_chunk: false,
            debug: false,
        }
    }
}

fn default_include() -> FilterPattern {
    FilterPattern::Many(vec!["src/**/*.{js,ts,jsx,tsx,vue}".to_string()])
}

fn default_exclude() -> FilterPattern {
    FilterPattern::Many(vec!["**/node_modules/**".to_string()])
}
