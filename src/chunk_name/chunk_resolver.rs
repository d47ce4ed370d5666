//! Per-module chunk assignment

use std::sync::Arc;

use thiserror::Error;

use super::{ChunkNameTable, Logger, VENDOR_CHUNK, VENDOR_MARKER};
use crate::plugins::{ManualChunkMeta, ManualChunks};
use crate::utils::{normalize_slashes, Filter};

/// Failure to derive a package name from a vendor module id
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PackageNameError {
    #[error("no package segment follows `node_modules/` in {0}")]
    MissingSegment(String),

    #[error("scoped package `{scope}` has no name in {id}")]
    IncompleteScope { scope: String, id: String },
}

/// Package owning a vendor module id
///
/// Looks at the segment after the first `node_modules/`. Scoped packages keep
/// their scope, as in `@vue/runtime-core`.
pub fn package_name(id: &str) -> Result<&str, PackageNameError> {
    let start = id
        .find(VENDOR_MARKER)
        .map(|idx| idx + VENDOR_MARKER.len())
        .ok_or_else(|| PackageNameError::MissingSegment(id.to_string()))?;
    let rest = &id[start..];

    let first_end = rest.find('/').unwrap_or(rest.len());
    let first = &rest[..first_end];
    if first.is_empty() {
        return Err(PackageNameError::MissingSegment(id.to_string()));
    }
    if !first.starts_with('@') {
        return Ok(first);
    }

    let incomplete = || PackageNameError::IncompleteScope {
        scope: first.to_string(),
        id: id.to_string(),
    };
    let after_scope = rest.get(first_end + 1..).ok_or_else(incomplete)?;
    let name_len = after_scope.find('/').unwrap_or(after_scope.len());
    if name_len == 0 {
        return Err(incomplete());
    }
    Ok(&rest[..first_end + 1 + name_len])
}

/// Decides the output chunk of each module the bundler visits
///
/// Rules, first hit wins:
/// 1. ids accepted by the filter get their recorded chunk name, or none at all
/// 2. the user's own manual chunking
/// 3. `node_modules` ids go to the vendor chunk, or a per-package chunk with
///    `min_chunk`
pub struct ChunkResolver {
    filter: Arc<Filter>,
    user_chunks: Option<ManualChunks>,
    min_chunk: bool,
    logger: Logger,
}

impl ChunkResolver {
    pub fn new(filter: Arc<Filter>, user_chunks: Option<ManualChunks>, min_chunk: bool, logger: Logger) -> Self {
        Self {
            filter,
            user_chunks,
            min_chunk,
            logger,
        }
    }

    pub fn resolve(&self, table: &ChunkNameTable, id: &str, meta: &ManualChunkMeta<'_>) -> Option<String> {
        let normalized = normalize_slashes(id);

        if self.filter.matches(&normalized) {
            return table.get(&normalized).map(str::to_string);
        }

        match &self.user_chunks {
            Some(ManualChunks::Callback(callback)) => return callback(id, meta),
            Some(chunks @ ManualChunks::Table(_)) => {
                if let Some(name) = chunks.resolve(id, meta) {
                    return Some(name);
                }
            }
            None => {}
        }

        if normalized.contains(VENDOR_MARKER) {
            return Some(self.vendor_chunk(&normalized));
        }

        None
    }

    fn vendor_chunk(&self, id: &str) -> String {
        if !self.min_chunk {
            return VENDOR_CHUNK.to_string();
        }
        match package_name(id) {
            Ok(name) => name.to_string(),
            Err(err) => {
                self.logger
                    .warn(format_args!("Failed to extract package name from {}: {}", id, err));
                VENDOR_CHUNK.to_string()
            }
        }
    }
}
