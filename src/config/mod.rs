//! Configuration handling
//!
//! Parses and manages chunkname.toml configuration files.

mod schema;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::chunk_name::ChunkNameOptions;
use crate::plugins::{BuildConfig, HostConfig, ManualChunks, OutputOptions, ResolveOptions};
use crate::utils::{clean_path, path_to_module_id};

pub use schema::*;

/// Default config file name
pub const CONFIG_FILE: &str = "chunkname.toml";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Project metadata
    pub project: ProjectConfig,

    /// Entry points of the module graph
    #[serde(default)]
    pub entrypoints: IndexMap<String, String>,

    #[serde(default)]
    pub resolve: ResolveConfig,

    #[serde(default)]
    pub build: BuildSection,

    /// Chunk-name plugin options
    #[serde(default)]
    pub plugin: ChunkNameOptions,

    /// Root directory (computed from config file location)
    #[serde(skip)]
    pub root: PathBuf,
}

impl Config {
    /// Load configuration from a file path
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let absolute_path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()?.join(path)
        };

        let content = fs::read_to_string(&absolute_path)
            .with_context(|| format!("Failed to read config file: {}", absolute_path.display()))?;

        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", absolute_path.display()))?;

        // Set root directory to the directory containing the config file
        config.root = absolute_path
            .parent()
            .map(|p| PathBuf::from(clean_path(&path_to_module_id(p))))
            .unwrap_or_else(|| PathBuf::from("."));

        config.validate()?;

        Ok(config)
    }

    /// Load the config file if present, otherwise defaults rooted at the
    /// current directory
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Self::load(path);
        }

        let mut config = Self::default_config();
        config.root = PathBuf::from(clean_path(&path_to_module_id(&std::env::current_dir()?)));
        Ok(config)
    }

    /// Create a default configuration
    pub fn default_config() -> Self {
        let mut entrypoints = IndexMap::new();
        entrypoints.insert("main".to_string(), "src/main.ts".to_string());

        Self {
            project: ProjectConfig {
                name: "my-app".to_string(),
                version: "0.1.0".to_string(),
            },
            entrypoints,
            resolve: ResolveConfig::default(),
            build: BuildSection::default(),
            plugin: ChunkNameOptions::default(),
            root: PathBuf::from("."),
        }
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        if self.entrypoints.is_empty() {
            anyhow::bail!("At least one entrypoint must be specified in {}", CONFIG_FILE);
        }

        for (name, path) in &self.entrypoints {
            let full_path = self.root.join(path);
            if !full_path.is_file() {
                anyhow::bail!(
                    "Entrypoint '{}' points to non-existent file: {}",
                    name,
                    full_path.display()
                );
            }
        }

        Ok(())
    }

    /// Configuration handed to plugin `config` hooks
    pub fn host_config(&self) -> HostConfig {
        HostConfig {
            root: self.root.clone(),
            resolve: ResolveOptions {
                alias: self.resolve.alias.as_ref().map(|alias| alias.relative_to(&self.root)),
            },
            build: BuildConfig {
                output: OutputOptions {
                    manual_chunks: self.build.manual_chunks.clone().map(ManualChunks::Table),
                },
            },
        }
    }

    /// Get all entrypoint paths
    pub fn all_entrypoints(&self) -> Vec<(String, PathBuf)> {
        self.entrypoints
            .iter()
            .map(|(name, path)| (name.clone(), self.root.join(path)))
            .collect()
    }
}
