//! Scan command implementation

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use tracing::{debug, info};
use walkdir::WalkDir;

use super::display_id;
use crate::bundler::Module;
use crate::chunk_name::{ChunkNamePlugin, VENDOR_DIR};
use crate::config::Config;
use crate::plugins::{Command, PluginManager};
use crate::utils::{clean_path, path_to_module_id};

/// Record the chunk names annotated in the given files
#[derive(Args, Debug)]
pub struct ScanCommand {
    /// Files or directories to scan
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Print the table as JSON
    #[arg(long)]
    pub json: bool,
}

impl ScanCommand {
    pub async fn execute(&self, config_path: &str) -> Result<()> {
        let config = Config::load_or_default(config_path)?;
        let root = config.root.clone();

        let plugin = Arc::new(ChunkNamePlugin::new(config.plugin.clone(), &root)?);
        let mut plugins = PluginManager::new(root.clone(), Command::Build);
        plugins.register(plugin.clone());

        let mut host_config = config.host_config();
        plugins.run_config(&mut host_config).await?;

        let files = collect_files(&self.paths)?;
        info!("Scanning {} file(s)", files.len());

        for file in &files {
            let code = fs::read_to_string(file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            plugins.transform(&code, &path_to_module_id(file)).await?;
        }

        let table = plugin.table();

        if self.json {
            println!("{}", serde_json::to_string_pretty(&table)?);
            return Ok(());
        }

        for (module_id, chunk_name) in table.iter() {
            println!("{} {} {}", display_id(&root, module_id), "→".dimmed(), chunk_name.green());
        }
        eprintln!(
            "\n{} Recorded {} chunk name(s) from {} file(s)\n",
            "✓".green().bold(),
            table.len(),
            files.len()
        );

        Ok(())
    }
}

/// Expand directories into the script files below them, skipping
/// `node_modules`
fn collect_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let cwd = std::env::current_dir()?;
    let mut files = Vec::new();

    for path in paths {
        let path = PathBuf::from(clean_path(&path_to_module_id(&cwd.join(path))));
        if !path.is_dir() {
            files.push(path);
            continue;
        }

        let walker = WalkDir::new(&path)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.file_name() != VENDOR_DIR);
        for entry in walker {
            let entry = entry.with_context(|| format!("Failed to walk {}", path.display()))?;
            if entry.file_type().is_file() && is_script(entry.path()) {
                files.push(entry.into_path());
            } else {
                debug!("Skipping {}", entry.path().display());
            }
        }
    }

    Ok(files)
}

fn is_script(path: &Path) -> bool {
    Module::detect_type(path).is_js_like()
}
