//! Module graph data structures

use std::collections::{HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};

use crate::plugins::ModuleInfo;
use crate::resolver::ImportKind;

/// Unique identifier for a module
pub type ModuleId = usize;

/// Types of modules the bundler can handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleType {
    JavaScript,
    TypeScript,
    Jsx,
    Tsx,
    Vue,
    Css,
    Json,
    Unknown,
}

impl ModuleType {
    /// Determine module type from file extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "js" | "mjs" | "cjs" => ModuleType::JavaScript,
            "ts" | "mts" | "cts" => ModuleType::TypeScript,
            "jsx" => ModuleType::Jsx,
            "tsx" => ModuleType::Tsx,
            "vue" => ModuleType::Vue,
            "css" | "scss" | "sass" | "less" => ModuleType::Css,
            "json" => ModuleType::Json,
            _ => ModuleType::Unknown,
        }
    }

    /// Check if this module can contain imports
    pub fn is_js_like(&self) -> bool {
        matches!(
            self,
            ModuleType::JavaScript
                | ModuleType::TypeScript
                | ModuleType::Jsx
                | ModuleType::Tsx
                | ModuleType::Vue
        )
    }
}

/// A module in the dependency graph
#[derive(Debug, Clone)]
pub struct Module {
    /// Absolute path to the module
    pub path: PathBuf,

    /// Module id handed to plugins, `/`-separated
    pub id: String,

    /// Code after plugin transforms
    pub code: String,

    /// Module type
    pub module_type: ModuleType,

    /// Entrypoint name, when this module is one
    pub entry_name: Option<String>,
}

impl Module {
    /// Detect module type from path
    pub fn detect_type(path: &Path) -> ModuleType {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(ModuleType::from_extension)
            .unwrap_or(ModuleType::Unknown)
    }

    pub fn is_entry(&self) -> bool {
        self.entry_name.is_some()
    }
}

/// The module dependency graph
#[derive(Debug, Default)]
pub struct ModuleGraph {
    /// All modules, indexed by their ID
    modules: Vec<Module>,

    /// Map from module id string to module ID
    id_to_index: HashMap<String, ModuleId>,

    /// Static dependency edges: module ID -> dependency IDs in import order
    static_edges: Vec<Vec<ModuleId>>,

    /// Dynamic import edges: module ID -> imported module IDs
    dynamic_edges: Vec<Vec<ModuleId>>,
}

impl ModuleGraph {
    /// Create a new empty module graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a module to the graph
    pub fn add_module(&mut self, module: Module) -> ModuleId {
        if let Some(&id) = self.id_to_index.get(&module.id) {
            return id;
        }

        let id = self.modules.len();
        self.id_to_index.insert(module.id.clone(), id);
        self.modules.push(module);
        self.static_edges.push(Vec::new());
        self.dynamic_edges.push(Vec::new());

        id
    }

    /// Add a dependency edge between modules
    pub fn add_dependency(&mut self, from: ModuleId, to: ModuleId, kind: ImportKind) {
        let edges = match kind {
            ImportKind::Static => &mut self.static_edges,
            ImportKind::Dynamic => &mut self.dynamic_edges,
        };
        if let Some(deps) = edges.get_mut(from) {
            if !deps.contains(&to) {
                deps.push(to);
            }
        }
    }

    /// Get module ID from its id string
    pub fn get_module_id(&self, id: &str) -> Option<ModuleId> {
        self.id_to_index.get(id).copied()
    }

    /// Get a module by ID
    pub fn get_module(&self, id: ModuleId) -> Option<&Module> {
        self.modules.get(id)
    }

    /// Get all module IDs, in discovery order
    pub fn all_module_ids(&self) -> Vec<ModuleId> {
        (0..self.modules.len()).collect()
    }

    /// Whether some module imports `id` through `import()`
    pub fn is_dynamic_target(&self, id: ModuleId) -> bool {
        self.dynamic_edges.iter().any(|deps| deps.contains(&id))
    }

    /// Modules reachable from `start` through static imports only (BFS)
    pub fn get_reachable_modules(&self, start: ModuleId) -> Vec<ModuleId> {
        let mut visited = HashSet::new();
        let mut result = Vec::new();
        let mut queue = VecDeque::new();

        queue.push_back(start);
        visited.insert(start);

        while let Some(id) = queue.pop_front() {
            result.push(id);

            if let Some(deps) = self.static_edges.get(id) {
                for &dep_id in deps {
                    if visited.insert(dep_id) {
                        queue.push_back(dep_id);
                    }
                }
            }
        }

        result
    }

    /// Snapshot handed to manual chunking callbacks
    pub fn module_infos(&self) -> Vec<ModuleInfo> {
        let mut infos: Vec<ModuleInfo> = self
            .modules
            .iter()
            .map(|m| ModuleInfo {
                id: m.id.clone(),
                is_entry: m.is_entry(),
                ..Default::default()
            })
            .collect();

        for (from, deps) in self.static_edges.iter().enumerate() {
            for &to in deps {
                let importer = self.modules[from].id.clone();
                infos[to].importers.push(importer);
            }
        }
        for (from, deps) in self.dynamic_edges.iter().enumerate() {
            for &to in deps {
                let importer = self.modules[from].id.clone();
                infos[to].dynamic_importers.push(importer);
            }
        }

        infos
    }

    /// Total number of modules
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Check if graph is empty
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn module(id: &str, entry: Option<&str>) -> Module {
        Module {
            path: PathBuf::from(id),
            id: id.to_string(),
            code: String::new(),
            module_type: ModuleType::TypeScript,
            entry_name: entry.map(str::to_string),
        }
    }

    #[test]
    fn test_module_type_detection() {
        assert_eq!(ModuleType::from_extension("js"), ModuleType::JavaScript);
        assert_eq!(ModuleType::from_extension("ts"), ModuleType::TypeScript);
        assert_eq!(ModuleType::from_extension("vue"), ModuleType::Vue);
        assert_eq!(ModuleType::from_extension("css"), ModuleType::Css);
        assert_eq!(ModuleType::from_extension("xyz"), ModuleType::Unknown);
        assert!(ModuleType::Vue.is_js_like());
        assert!(!ModuleType::Json.is_js_like());
    }

    #[test]
    fn test_module_graph_basic() {
        let mut graph = ModuleGraph::new();

        let id = graph.add_module(module("/test/main.js", Some("main")));
        assert_eq!(graph.add_module(module("/test/main.js", None)), id);
        assert_eq!(graph.len(), 1);
        assert!(graph.get_module(id).unwrap().is_entry());
        assert_eq!(graph.get_module_id("/test/main.js"), Some(id));
    }

    #[test]
    fn test_static_reachability_stops_at_dynamic_imports() {
        let mut graph = ModuleGraph::new();
        let main = graph.add_module(module("/main.ts", Some("main")));
        let util = graph.add_module(module("/util.ts", None));
        let page = graph.add_module(module("/page.ts", None));
        graph.add_dependency(main, util, ImportKind::Static);
        graph.add_dependency(main, page, ImportKind::Dynamic);
        graph.add_dependency(page, util, ImportKind::Static);

        assert_eq!(graph.get_reachable_modules(main), vec![main, util]);
        assert!(graph.is_dynamic_target(page));
        assert!(!graph.is_dynamic_target(util));

        let infos = graph.module_infos();
        assert_eq!(infos[util].importers, vec!["/main.ts", "/page.ts"]);
        assert_eq!(infos[page].dynamic_importers, vec!["/main.ts"]);
        assert!(infos[main].is_entry);
    }
}
