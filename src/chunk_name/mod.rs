//! Comment-driven chunk names for dynamic imports
//!
//! ```js
//! const Home = () => import(/* chunkName: "home" */ "./pages/Home.vue");
//! ```
//!
//! The transform hook records `pages/Home.vue → home` for every annotated
//! import it sees. The config hook installs a `manual_chunks` callback that
//! answers from those records during chunk assignment, and otherwise defers to
//! the user's own manual chunking and a vendor bucket for `node_modules`.

mod chunk_resolver;
mod logger;
mod options;
mod scanner;
mod table;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use parking_lot::RwLock;

use crate::plugins::{
    Apply, Enforce, HostConfig, ManualChunks, Plugin, PluginContext, TransformResult,
};
use crate::resolver::AliasTable;
use crate::utils::Filter;

pub use chunk_resolver::{package_name, ChunkResolver, PackageNameError};
pub use logger::Logger;
pub use options::{ChunkNameOptions, FilterPattern};
pub use scanner::{find_imports, ImportRecord, Scanner};
pub use table::ChunkNameTable;

pub const PLUGIN_NAME: &str = "chunk-name";

/// Shared chunk for third-party modules
pub const VENDOR_CHUNK: &str = "vendor";

/// Directory holding third-party dependencies
pub const VENDOR_DIR: &str = "node_modules";

const VENDOR_MARKER: &str = "node_modules/";

/// The chunk-name plugin
///
/// Runs before other plugins and only for builds. One instance owns one
/// [`ChunkNameTable`] for the lifetime of a build.
pub struct ChunkNamePlugin {
    options: ChunkNameOptions,
    filter: Arc<Filter>,
    logger: Logger,
    scanner: RwLock<Scanner>,
    table: Arc<RwLock<ChunkNameTable>>,
}

impl ChunkNamePlugin {
    /// Create the plugin, anchoring relative filter patterns at `root`
    pub fn new(options: ChunkNameOptions, root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        let filter = Filter::new(options.include.patterns(), options.exclude.patterns(), root)
            .with_context(|| format!("[{}] invalid include/exclude pattern", PLUGIN_NAME))?;
        let filter = Arc::new(filter);
        let logger = Logger::new(options.debug);
        let scanner = Scanner::new(Arc::clone(&filter), AliasTable::default(), root.to_path_buf(), logger);

        Ok(Self {
            options,
            filter,
            logger,
            scanner: RwLock::new(scanner),
            table: Arc::new(RwLock::new(ChunkNameTable::new())),
        })
    }

    /// Scan one file into the table, returning how many records were stored
    pub fn scan(&self, file_id: &str, code: &str) -> usize {
        let scanner = self.scanner.read();
        let mut table = self.table.write();
        scanner.scan(&mut table, file_id, code)
    }

    /// Snapshot of the recorded chunk names
    pub fn table(&self) -> ChunkNameTable {
        self.table.read().clone()
    }
}

#[async_trait]
impl Plugin for ChunkNamePlugin {
    fn name(&self) -> &str {
        PLUGIN_NAME
    }

    fn enforce(&self) -> Enforce {
        Enforce::Pre
    }

    fn apply(&self) -> Apply {
        Apply::Build
    }

    async fn config(&self, config: &mut HostConfig, _ctx: &PluginContext) -> Result<()> {
        let aliases = config
            .resolve
            .alias
            .clone()
            .map(AliasTable::from)
            .unwrap_or_default();
        self.logger
            .info(format_args!("Using {} alias entries", aliases.entries().len()));
        self.scanner.write().set_aliases(aliases);

        let user_chunks = config.build.output.manual_chunks.take();
        let resolver = ChunkResolver::new(
            Arc::clone(&self.filter),
            user_chunks,
            self.options.min_chunk,
            self.logger,
        );
        let table = Arc::clone(&self.table);
        config.build.output.manual_chunks = Some(ManualChunks::callback(move |id, meta| {
            resolver.resolve(&table.read(), id, meta)
        }));

        Ok(())
    }

    async fn transform(&self, code: &str, id: &str, _ctx: &PluginContext) -> Result<TransformResult> {
        self.scan(id, code);
        Ok(TransformResult::Skip)
    }
}
