//! Command-line interface
//!
//! Provides the main CLI structure using clap with subcommands for:
//! - `build`: Assign every module of the project to a chunk
//! - `scan`: Record annotated chunk names of the given files

mod build;
mod scan;

use std::path::Path;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;

use crate::config::CONFIG_FILE;
use crate::utils::relative_path;

pub use build::{BuildCommand, ChunkSummary};
pub use scan::ScanCommand;

/// chunk-name - Comment-driven chunk naming for dynamic imports
#[derive(Parser, Debug)]
#[command(name = "chunk-name")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to chunkname.toml config file
    #[arg(short, long, global = true, default_value = CONFIG_FILE)]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the module graph and print the chunk of every module
    Build(BuildCommand),

    /// Scan files for chunk name annotations
    Scan(ScanCommand),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<()> {
        print_banner();

        match &self.command {
            Commands::Build(cmd) => cmd.execute(&self.config).await,
            Commands::Scan(cmd) => cmd.execute(&self.config).await,
        }
    }
}

/// Print the banner
fn print_banner() {
    eprintln!(
        "\n{} {} {}\n",
        "⚡".cyan(),
        "chunk-name".bold().cyan(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
}

/// Module id shown relative to the project root when it lives inside it
fn display_id(root: &Path, id: &str) -> String {
    match relative_path(root, Path::new(id)) {
        Some(rel) if !rel.starts_with("..") => rel,
        _ => id.to_string(),
    }
}
