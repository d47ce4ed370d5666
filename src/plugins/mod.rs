//! Plugin system
//!
//! Provides a Vite/Rollup-style plugin API for extending the bundler.

mod host;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

pub use host::{
    BuildConfig, ChunkPaths, HostConfig, ManualChunkMeta, ManualChunks, ManualChunksFn, ModuleInfo,
    OutputOptions, ResolveOptions,
};

/// Plugin hook context
pub struct PluginContext {
    /// Project root directory
    pub root: PathBuf,
}

/// Result of a resolve_id hook
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveResult {
    /// Continue to next plugin
    Skip,
    /// Resolved path
    Resolved(String),
    /// Mark as external (left out of the graph)
    External,
}

/// Result of a load hook
pub enum LoadResult {
    /// Continue to next plugin
    Skip,
    /// Loaded content
    Loaded(String),
}

/// Result of a transform hook
pub enum TransformResult {
    /// Continue to next plugin (no transformation)
    Skip,
    /// Transformed code
    Transformed {
        code: String,
        /// Optional source map
        map: Option<String>,
    },
}

/// Where a plugin sits relative to the others
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Enforce {
    Pre,
    #[default]
    Normal,
    Post,
}

/// The command a plugin manager drives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Build,
    Serve,
}

/// Which commands a plugin takes part in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Apply {
    #[default]
    Always,
    Build,
    Serve,
}

impl Apply {
    pub fn applies_to(self, command: Command) -> bool {
        match self {
            Apply::Always => true,
            Apply::Build => command == Command::Build,
            Apply::Serve => command == Command::Serve,
        }
    }
}

/// Plugin trait - implement this to create a plugin
#[async_trait]
pub trait Plugin: Send + Sync {
    /// Plugin name for logging and debugging
    fn name(&self) -> &str;

    fn enforce(&self) -> Enforce {
        Enforce::Normal
    }

    fn apply(&self) -> Apply {
        Apply::Always
    }

    /// Called with the resolved configuration before the build starts
    async fn config(&self, _config: &mut HostConfig, _ctx: &PluginContext) -> Result<()> {
        Ok(())
    }

    /// Called when the build starts
    async fn build_start(&self, _ctx: &PluginContext) -> Result<()> {
        Ok(())
    }

    /// Called when the build ends
    async fn build_end(&self, _ctx: &PluginContext) -> Result<()> {
        Ok(())
    }

    /// Resolve an import specifier
    /// Return ResolveResult::Skip to let other plugins handle it
    async fn resolve_id(&self, _specifier: &str, _importer: Option<&Path>, _ctx: &PluginContext) -> Result<ResolveResult> {
        Ok(ResolveResult::Skip)
    }

    /// Load the content of a module
    /// Return LoadResult::Skip to read it from disk
    async fn load(&self, _id: &str, _ctx: &PluginContext) -> Result<LoadResult> {
        Ok(LoadResult::Skip)
    }

    /// Transform the code of a module
    /// Return TransformResult::Skip to leave code unchanged
    async fn transform(&self, _code: &str, _id: &str, _ctx: &PluginContext) -> Result<TransformResult> {
        Ok(TransformResult::Skip)
    }
}

/// Plugin manager
pub struct PluginManager {
    plugins: Vec<Arc<dyn Plugin>>,
    command: Command,
    context: PluginContext,
}

impl PluginManager {
    /// Create a new plugin manager
    pub fn new(root: PathBuf, command: Command) -> Self {
        Self {
            plugins: Vec::new(),
            command,
            context: PluginContext { root },
        }
    }

    /// Register a plugin
    ///
    /// Plugins that do not apply to the current command are dropped; the rest
    /// run in `pre`, `normal`, `post` order, keeping registration order within
    /// each group.
    pub fn register(&mut self, plugin: Arc<dyn Plugin>) {
        if !plugin.apply().applies_to(self.command) {
            debug!("Skipping plugin '{}' for {:?}", plugin.name(), self.command);
            return;
        }
        self.plugins.push(plugin);
        self.plugins.sort_by_key(|p| p.enforce());
    }

    /// Names of the active plugins in run order
    pub fn plugin_names(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    /// Run config hooks
    pub async fn run_config(&self, config: &mut HostConfig) -> Result<()> {
        for plugin in &self.plugins {
            debug!("Running config hook of '{}'", plugin.name());
            plugin.config(config, &self.context).await?;
        }
        Ok(())
    }

    /// Run build_start hooks
    pub async fn run_build_start(&self) -> Result<()> {
        for plugin in &self.plugins {
            plugin.build_start(&self.context).await?;
        }
        Ok(())
    }

    /// Run build_end hooks
    pub async fn run_build_end(&self) -> Result<()> {
        for plugin in &self.plugins {
            plugin.build_end(&self.context).await?;
        }
        Ok(())
    }

    /// Run resolve_id hooks, first answer wins
    pub async fn resolve_id(&self, specifier: &str, importer: Option<&Path>) -> Result<ResolveResult> {
        for plugin in &self.plugins {
            match plugin.resolve_id(specifier, importer, &self.context).await? {
                ResolveResult::Skip => continue,
                result => return Ok(result),
            }
        }
        Ok(ResolveResult::Skip)
    }

    /// Run load hooks
    pub async fn load(&self, id: &str) -> Result<Option<String>> {
        for plugin in &self.plugins {
            if let LoadResult::Loaded(content) = plugin.load(id, &self.context).await? {
                return Ok(Some(content));
            }
        }
        Ok(None)
    }

    /// Run transform hooks
    pub async fn transform(&self, code: &str, id: &str) -> Result<(String, Option<String>)> {
        let mut current_code = code.to_string();
        let mut current_map = None;

        for plugin in &self.plugins {
            match plugin.transform(&current_code, id, &self.context).await? {
                TransformResult::Skip => continue,
                TransformResult::Transformed { code, map } => {
                    current_code = code;
                    if map.is_some() {
                        current_map = map;
                    }
                }
            }
        }

        Ok((current_code, current_map))
    }
}
