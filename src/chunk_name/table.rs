//! Module id → chunk name table

use std::collections::BTreeMap;

use serde::Serialize;

/// Chunk names requested by annotated dynamic imports
///
/// Keys are canonical module ids with `/` separators. A later insert for the
/// same id replaces the earlier one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ChunkNameTable {
    entries: BTreeMap<String, String>,
}

impl ChunkNameTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a chunk name, returning the one it replaced
    pub fn insert(&mut self, module_id: String, chunk_name: String) -> Option<String> {
        self.entries.insert(module_id, chunk_name)
    }

    pub fn get(&self, module_id: &str) -> Option<&str> {
        self.entries.get(module_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries ordered by module id
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(id, name)| (id.as_str(), name.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_write_wins() {
        let mut table = ChunkNameTable::new();
        assert_eq!(table.insert("/a.ts".into(), "one".into()), None);
        assert_eq!(table.insert("/a.ts".into(), "two".into()), Some("one".to_string()));
        assert_eq!(table.get("/a.ts"), Some("two"));
        assert_eq!(table.len(), 1);
    }
}
