//! Core bundler implementation
//!
//! Drives the plugin lifecycle the way a host build tool does: `config`
//! hooks, then the module graph is loaded with every module passed through
//! `transform`, and only once the whole graph is known is each module given a
//! chunk through the installed `manual_chunks` callback.

mod chunk;
mod graph;

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use indexmap::IndexMap;
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::config::Config;
use crate::plugins::{HostConfig, ManualChunkMeta, PluginManager, ResolveResult};
use crate::resolver::{AliasTable, Resolver};
use crate::utils::{clean_path, path_to_module_id};

pub use chunk::{Chunk, ChunkType};
pub use graph::{Module, ModuleGraph, ModuleId, ModuleType};

/// Result of a build operation
#[derive(Debug)]
pub struct BuildResult {
    /// Chunks in order of first appearance
    pub chunks: Vec<Chunk>,

    /// Module id strings, indexed by [`ModuleId`]
    pub modules: Vec<String>,

    pub duration: Duration,
}

impl BuildResult {
    /// Module id strings of a chunk
    pub fn chunk_modules<'a>(&'a self, chunk: &'a Chunk) -> impl Iterator<Item = &'a str> + 'a {
        chunk.module_ids.iter().map(|&id| self.modules[id].as_str())
    }

    /// Name of the chunk holding `module_id`
    pub fn chunk_of(&self, module_id: &str) -> Option<&str> {
        self.chunks
            .iter()
            .find(|chunk| self.chunk_modules(chunk).any(|id| id == module_id))
            .map(|chunk| chunk.name.as_str())
    }
}

/// The main bundler
pub struct Bundler {
    /// Project configuration
    config: Arc<Config>,

    /// Configuration after plugin `config` hooks
    host_config: HostConfig,

    plugins: PluginManager,

    /// Module resolver
    resolver: Resolver,

    /// Module graph
    graph: Arc<RwLock<ModuleGraph>>,
}

impl Bundler {
    /// Create a new bundler instance, running plugin `config` hooks
    pub async fn new(config: Config, plugins: PluginManager) -> Result<Self> {
        let config = Arc::new(config);
        let mut host_config = config.host_config();
        plugins
            .run_config(&mut host_config)
            .await
            .context("Plugin config hook failed")?;

        let aliases = host_config
            .resolve
            .alias
            .clone()
            .map(AliasTable::from)
            .unwrap_or_default();

        Ok(Self {
            config,
            host_config,
            plugins,
            resolver: Resolver::new(aliases),
            graph: Arc::new(RwLock::new(ModuleGraph::new())),
        })
    }

    pub fn host_config(&self) -> &HostConfig {
        &self.host_config
    }

    /// Build the project
    pub async fn build(&self) -> Result<BuildResult> {
        let start = Instant::now();

        self.plugins.run_build_start().await?;

        // 1. Load, transform and link every module
        info!("Building module graph...");
        self.build_module_graph().await?;

        // 2. Assign chunks once the transform phase is over
        info!("Assigning chunks...");
        let chunks = self.generate_chunks();

        self.plugins.run_build_end().await?;

        let modules = {
            let graph = self.graph.read();
            graph
                .all_module_ids()
                .into_iter()
                .filter_map(|id| graph.get_module(id).map(|m| m.id.clone()))
                .collect()
        };

        debug!("Build completed in {:?}", start.elapsed());

        Ok(BuildResult {
            chunks,
            modules,
            duration: start.elapsed(),
        })
    }

    /// Build the module graph by traversing from entrypoints
    async fn build_module_graph(&self) -> Result<()> {
        for (name, path) in self.config.all_entrypoints() {
            debug!("Processing entrypoint: {} -> {}", name, path.display());
            self.process_module(&path, Some(&name)).await?;
        }

        Ok(())
    }

    /// Process a single module and its dependencies
    ///
    /// Uses Box::pin for async recursion to avoid infinite type size issues
    async fn process_module(&self, path: &Path, entry_name: Option<&str>) -> Result<ModuleId> {
        let path = PathBuf::from(clean_path(&path_to_module_id(path)));
        let id = path_to_module_id(&path);

        if let Some(existing) = self.graph.read().get_module_id(&id) {
            return Ok(existing);
        }

        let source = match self.plugins.load(&id).await? {
            Some(content) => content,
            None => fs::read_to_string(&path)
                .with_context(|| format!("Failed to read module: {}", path.display()))?,
        };

        let (code, _map) = self
            .plugins
            .transform(&source, &id)
            .await
            .with_context(|| format!("Failed to transform module: {}", id))?;

        let module_type = Module::detect_type(&path);
        let dependencies = self.resolver.extract_dependencies(&code, &module_type);

        let module_id = self.graph.write().add_module(Module {
            path: path.clone(),
            id,
            code,
            module_type,
            entry_name: entry_name.map(str::to_string),
        });

        // Process dependencies recursively (Box::pin needed for async recursion)
        for dep in dependencies {
            let resolved = match self.plugins.resolve_id(&dep.specifier, Some(&path)).await? {
                ResolveResult::Resolved(resolved) => Some(PathBuf::from(resolved)),
                ResolveResult::External => {
                    debug!("Treating '{}' as external", dep.specifier);
                    continue;
                }
                ResolveResult::Skip => self.resolver.resolve(&dep.specifier, &path)?,
            };
            match resolved {
                Some(resolved) => {
                    let dep_id = Box::pin(self.process_module(&resolved, None)).await?;
                    self.graph.write().add_dependency(module_id, dep_id, dep.kind);
                }
                None => debug!("Leaving '{}' unresolved", dep.specifier),
            }
        }

        Ok(module_id)
    }

    /// Group the module graph into chunks
    ///
    /// The installed `manual_chunks` callback speaks first. Modules it leaves
    /// unassigned fall back to the default heuristic: entries and dynamic
    /// import targets open their own chunk, everything else joins the first
    /// chunk whose modules statically reach it.
    fn generate_chunks(&self) -> Vec<Chunk> {
        let graph = self.graph.read();
        let infos = graph.module_infos();
        let meta = ManualChunkMeta::new(&infos);
        let ids = graph.all_module_ids();

        let mut names: Vec<Option<String>> = ids
            .iter()
            .map(|&id| {
                let module = graph.get_module(id)?;
                let name = self
                    .host_config
                    .build
                    .output
                    .manual_chunks
                    .as_ref()?
                    .resolve(&module.id, &meta);
                if let Some(name) = &name {
                    debug!("{} -> {}", module.id, name);
                }
                name
            })
            .collect();

        let boundary = |id: ModuleId| -> Option<ChunkType> {
            let module = graph.get_module(id)?;
            if module.is_entry() {
                Some(ChunkType::Entry)
            } else if graph.is_dynamic_target(id) {
                Some(ChunkType::Async)
            } else {
                None
            }
        };

        let mut taken: HashSet<String> = names.iter().flatten().cloned().collect();
        for &id in &ids {
            if names[id].is_some() {
                continue;
            }
            let Some(module) = graph.get_module(id) else {
                continue;
            };
            names[id] = match boundary(id) {
                Some(ChunkType::Entry) => module.entry_name.clone(),
                Some(_) => Some(unique_name(&file_stem(&module.path), &mut taken)),
                None => None,
            };
        }

        for &id in &ids {
            let Some(name) = names[id].clone() else {
                continue;
            };
            for reached in graph.get_reachable_modules(id) {
                if names[reached].is_none() {
                    names[reached] = Some(name.clone());
                }
            }
        }

        let mut chunks: IndexMap<String, Chunk> = IndexMap::new();
        for &id in &ids {
            let name = names[id].take().unwrap_or_else(|| {
                graph
                    .get_module(id)
                    .map(|m| file_stem(&m.path))
                    .unwrap_or_default()
            });
            chunks
                .entry(name.clone())
                .or_insert_with(|| Chunk::new(name, ChunkType::Shared))
                .push(id, boundary(id));
        }

        chunks.into_values().collect()
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "chunk".to_string())
}

/// `stem`, or `stem2`, `stem3`, ... when taken
fn unique_name(stem: &str, taken: &mut HashSet<String>) -> String {
    let mut candidate = stem.to_string();
    let mut suffix = 2;
    while taken.contains(&candidate) {
        candidate = format!("{}{}", stem, suffix);
        suffix += 1;
    }
    taken.insert(candidate.clone());
    candidate
}
