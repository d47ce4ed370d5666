//! Build command implementation

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tracing::info;

use super::display_id;
use crate::bundler::{BuildResult, Bundler, ChunkType};
use crate::chunk_name::ChunkNamePlugin;
use crate::config::Config;
use crate::plugins::{Command, PluginManager};
use crate::utils::format_duration;

/// Build the module graph and assign chunks
#[derive(Args, Debug)]
pub struct BuildCommand {
    /// Print the chunk assignment as JSON
    #[arg(long)]
    pub json: bool,

    /// Give every package under node_modules its own chunk
    #[arg(long)]
    pub min_chunk: bool,

    /// Log chunk-name diagnostics
    #[arg(long)]
    pub debug: bool,
}

/// One chunk of the JSON report
#[derive(Debug, Serialize)]
pub struct ChunkSummary {
    pub name: String,
    #[serde(rename = "type")]
    pub chunk_type: ChunkType,
    pub modules: Vec<String>,
}

impl ChunkSummary {
    fn collect(result: &BuildResult, root: &Path) -> Vec<Self> {
        result
            .chunks
            .iter()
            .map(|chunk| ChunkSummary {
                name: chunk.name.clone(),
                chunk_type: chunk.chunk_type,
                modules: result.chunk_modules(chunk).map(|id| display_id(root, id)).collect(),
            })
            .collect()
    }
}

impl BuildCommand {
    pub async fn execute(&self, config_path: &str) -> Result<()> {
        info!("Loading configuration from {}", config_path);
        let mut config = Config::load(config_path)?;
        config.plugin.min_chunk |= self.min_chunk;
        config.plugin.debug |= self.debug;

        let root = config.root.clone();
        let plugin = ChunkNamePlugin::new(config.plugin.clone(), &root)?;
        let mut plugins = PluginManager::new(root.clone(), Command::Build);
        plugins.register(Arc::new(plugin));

        eprintln!("{} Building project...", "→".blue());

        let bundler = Bundler::new(config, plugins).await?;
        let result = bundler.build().await?;
        let summary = ChunkSummary::collect(&result, &root);

        if self.json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
            return Ok(());
        }

        eprintln!(
            "\n{} Assigned {} module(s) to {} chunk(s) in {}\n",
            "✓".green().bold(),
            result.modules.len(),
            summary.len(),
            format_duration(result.duration)
        );

        for chunk in &summary {
            let kind = match chunk.chunk_type {
                ChunkType::Entry => "entry",
                ChunkType::Async => "async",
                ChunkType::Shared => "shared",
            };
            println!("{} {}", chunk.name.cyan().bold(), format!("({})", kind).dimmed());
            for module in &chunk.modules {
                println!("  {} {}", "•".dimmed(), module);
            }
        }

        Ok(())
    }
}
