//! Host configuration as seen by plugins
//!
//! This is the slice of the resolved build configuration that plugin `config`
//! hooks may read and rewrite before the build starts.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::resolver::AliasConfig;

/// Resolved host configuration
#[derive(Debug, Clone, Default)]
pub struct HostConfig {
    /// Project root directory
    pub root: PathBuf,

    pub resolve: ResolveOptions,

    pub build: BuildConfig,
}

#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    /// Import path aliases
    pub alias: Option<AliasConfig>,
}

#[derive(Debug, Clone, Default)]
pub struct BuildConfig {
    pub output: OutputOptions,
}

#[derive(Debug, Clone, Default)]
pub struct OutputOptions {
    /// Decides the output chunk of each module
    pub manual_chunks: Option<ManualChunks>,
}

/// Signature of a manual chunking callback
pub type ManualChunksFn = dyn Fn(&str, &ManualChunkMeta<'_>) -> Option<String> + Send + Sync;

/// Manual chunking, either a callback or a static table
#[derive(Clone)]
pub enum ManualChunks {
    /// Called with every module id; its answer is final
    Callback(Arc<ManualChunksFn>),

    /// Chunk name → path fragment(s); a module joins the first chunk with a
    /// fragment contained in its id
    Table(IndexMap<String, ChunkPaths>),
}

impl ManualChunks {
    pub fn callback<F>(f: F) -> Self
    where
        F: Fn(&str, &ManualChunkMeta<'_>) -> Option<String> + Send + Sync + 'static,
    {
        ManualChunks::Callback(Arc::new(f))
    }

    /// Chunk name for `id`, if any
    pub fn resolve(&self, id: &str, meta: &ManualChunkMeta<'_>) -> Option<String> {
        match self {
            ManualChunks::Callback(f) => f(id, meta),
            ManualChunks::Table(table) => table
                .iter()
                .find(|(_, paths)| paths.matches(id))
                .map(|(name, _)| name.clone()),
        }
    }
}

impl fmt::Debug for ManualChunks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManualChunks::Callback(_) => f.write_str("ManualChunks::Callback(..)"),
            ManualChunks::Table(table) => f.debug_tuple("ManualChunks::Table").field(table).finish(),
        }
    }
}

/// One path fragment or a list of them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChunkPaths {
    One(String),
    Many(Vec<String>),
}

impl ChunkPaths {
    pub fn matches(&self, id: &str) -> bool {
        match self {
            ChunkPaths::One(path) => id.contains(path.as_str()),
            ChunkPaths::Many(paths) => paths.iter().any(|path| id.contains(path.as_str())),
        }
    }
}

/// What the host knows about a module while assigning chunks
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ModuleInfo {
    pub id: String,
    pub is_entry: bool,
    /// Modules importing this one statically
    pub importers: Vec<String>,
    /// Modules importing this one through `import()`
    pub dynamic_importers: Vec<String>,
}

/// Graph access handed to manual chunking callbacks
#[derive(Debug, Clone, Copy)]
pub struct ManualChunkMeta<'a> {
    modules: &'a [ModuleInfo],
}

impl<'a> ManualChunkMeta<'a> {
    pub fn new(modules: &'a [ModuleInfo]) -> Self {
        Self { modules }
    }

    /// Meta with no modules, for callers outside a build
    pub fn empty() -> ManualChunkMeta<'static> {
        ManualChunkMeta { modules: &[] }
    }

    pub fn get_module_ids(&self) -> impl Iterator<Item = &'a str> + 'a {
        self.modules.iter().map(|m| m.id.as_str())
    }

    pub fn get_module_info(&self, id: &str) -> Option<&'a ModuleInfo> {
        self.modules.iter().find(|m| m.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_table_first_match_in_order() {
        let mut table = IndexMap::new();
        table.insert("ui".to_string(), ChunkPaths::Many(vec!["element-plus".into(), "/src/ui/".into()]));
        table.insert("vue".to_string(), ChunkPaths::One("node_modules/vue".into()));
        let chunks = ManualChunks::Table(table);
        let meta = ManualChunkMeta::empty();

        assert_eq!(chunks.resolve("/p/src/ui/Button.vue", &meta), Some("ui".to_string()));
        assert_eq!(chunks.resolve("/p/node_modules/vue/index.js", &meta), Some("vue".to_string()));
        assert_eq!(chunks.resolve("/p/src/main.ts", &meta), None);
    }

    #[test]
    fn test_callback_sees_meta() {
        let modules = vec![ModuleInfo {
            id: "/p/a.ts".into(),
            is_entry: true,
            ..Default::default()
        }];
        let meta = ManualChunkMeta::new(&modules);
        let chunks = ManualChunks::callback(|id, meta| {
            meta.get_module_info(id).filter(|m| m.is_entry).map(|_| "entry".to_string())
        });

        assert_eq!(chunks.resolve("/p/a.ts", &meta), Some("entry".to_string()));
        assert_eq!(chunks.resolve("/p/b.ts", &meta), None);
        assert_eq!(meta.get_module_ids().collect::<Vec<_>>(), vec!["/p/a.ts"]);
    }
}
