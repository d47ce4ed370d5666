//! chunk-name library
//!
//! Names output chunks from `/* chunkName: '...' */` comments on dynamic
//! imports, together with the plugin host and bundler that drive it.

pub mod bundler;
pub mod chunk_name;
pub mod cli;
pub mod config;
pub mod plugins;
pub mod resolver;
pub mod utils;

pub use bundler::Bundler;
pub use chunk_name::{ChunkNameOptions, ChunkNamePlugin};
pub use cli::Cli;
pub use config::Config;
