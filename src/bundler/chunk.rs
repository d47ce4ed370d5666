//! Chunk grouping for code splitting

use serde::Serialize;

use super::ModuleId;

/// Type of chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkType {
    /// Entry point chunk - loaded immediately
    Entry,
    /// Async chunk - loaded on demand via dynamic import
    Async,
    /// Shared chunk - named by manual chunking, e.g. a vendor bucket
    Shared,
}

/// A chunk is a group of modules that will be bundled together
#[derive(Debug, Clone)]
pub struct Chunk {
    /// Chunk name (used for output filename)
    pub name: String,

    /// Type of chunk
    pub chunk_type: ChunkType,

    /// Module IDs included in this chunk
    pub module_ids: Vec<ModuleId>,
}

impl Chunk {
    pub fn new(name: String, chunk_type: ChunkType) -> Self {
        Self {
            name,
            chunk_type,
            module_ids: Vec::new(),
        }
    }

    /// Add a module, upgrading the chunk type when an entry or async
    /// boundary lands in it
    pub fn push(&mut self, module_id: ModuleId, boundary: Option<ChunkType>) {
        self.module_ids.push(module_id);
        match (boundary, self.chunk_type) {
            (Some(ChunkType::Entry), _) => self.chunk_type = ChunkType::Entry,
            (Some(ChunkType::Async), ChunkType::Shared) => self.chunk_type = ChunkType::Async,
            _ => {}
        }
    }

    /// Check if chunk is empty
    pub fn is_empty(&self) -> bool {
        self.module_ids.is_empty()
    }

    /// Number of modules in chunk
    pub fn len(&self) -> usize {
        self.module_ids.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries_upgrade_type() {
        let mut chunk = Chunk::new("home".into(), ChunkType::Shared);
        chunk.push(3, None);
        assert_eq!(chunk.chunk_type, ChunkType::Shared);
        chunk.push(4, Some(ChunkType::Async));
        assert_eq!(chunk.chunk_type, ChunkType::Async);
        chunk.push(0, Some(ChunkType::Entry));
        chunk.push(5, Some(ChunkType::Async));
        assert_eq!(chunk.chunk_type, ChunkType::Entry);
        assert_eq!(chunk.len(), 4);
    }
}
