//! Module resolution
//!
//! Handles resolving import specifiers to actual file paths for the bundler
//! host. Aliases are shared with the chunk-name scanner so both agree on
//! where an aliased specifier points.

mod alias;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::bundler::ModuleType;
use crate::utils::{clean_path, path_to_module_id};

pub use alias::{Alias, AliasConfig, AliasTable, ResolveError};

/// Regex patterns for extracting imports
static IMPORT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?:import|export)\s+(?:(?:\{[^}]*\}|\*\s+as\s+\w+|\w+)\s+from\s+)?["']([^"']+)["']|require\s*\(\s*["']([^"']+)["']\s*\)"#).unwrap()
});

/// Dynamic imports, optionally led by a block comment
static DYNAMIC_IMPORT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"import\s*\(\s*(?:/\*[^*]*\*+(?:[^/*][^*]*\*+)*/\s*)?["']([^"']+)["']\s*\)"#).unwrap()
});

const EXTENSIONS: [&str; 8] = ["js", "ts", "jsx", "tsx", "mjs", "cjs", "vue", "json"];

/// How a dependency is imported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    Static,
    Dynamic,
}

/// An import specifier found in a module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    pub specifier: String,
    pub kind: ImportKind,
}

/// Module resolver
pub struct Resolver {
    /// Aliases from the resolved host configuration
    aliases: AliasTable,
}

impl Resolver {
    /// Create a new resolver
    pub fn new(aliases: AliasTable) -> Self {
        Self { aliases }
    }

    /// Extract import/require dependencies from source code
    pub fn extract_dependencies(&self, source: &str, module_type: &ModuleType) -> Vec<Dependency> {
        if !module_type.is_js_like() {
            return Vec::new();
        }

        let mut dependencies: Vec<Dependency> = Vec::new();
        let mut push = |specifier: &str, kind: ImportKind| {
            if !dependencies.iter().any(|d| d.specifier == specifier && d.kind == kind) {
                dependencies.push(Dependency {
                    specifier: specifier.to_string(),
                    kind,
                });
            }
        };

        for cap in IMPORT_REGEX.captures_iter(source) {
            if let Some(specifier) = cap.get(1).or_else(|| cap.get(2)) {
                push(specifier.as_str(), ImportKind::Static);
            }
        }

        for cap in DYNAMIC_IMPORT_REGEX.captures_iter(source) {
            if let Some(specifier) = cap.get(1) {
                push(specifier.as_str(), ImportKind::Dynamic);
            }
        }

        debug!("Found {} dependencies", dependencies.len());

        dependencies
    }

    /// Resolve an import specifier to an absolute file path
    pub fn resolve(&self, specifier: &str, from: &Path) -> Result<Option<PathBuf>> {
        debug!("Resolving '{}' from '{}'", specifier, from.display());

        let base_dir = from.parent().unwrap_or(Path::new("/"));

        if specifier.starts_with('.') {
            return self.resolve_relative(specifier, base_dir);
        }
        if specifier.starts_with('/') {
            return self.resolve_relative(specifier, Path::new("/"));
        }

        match self.aliases.apply(specifier) {
            Ok(Some(aliased)) => {
                debug!("Alias rewrote '{}' to '{}'", specifier, aliased);
                return self.resolve_relative(&aliased, base_dir);
            }
            Ok(None) => {}
            Err(err) => {
                warn!("Ignoring alias table for '{}': {}", specifier, err);
            }
        }

        self.resolve_bare(specifier, base_dir)
    }

    /// Resolve a relative import
    fn resolve_relative(&self, specifier: &str, base_dir: &Path) -> Result<Option<PathBuf>> {
        let target = PathBuf::from(clean_path(&path_to_module_id(&base_dir.join(specifier))));

        // Try exact path first
        if target.is_file() {
            return Ok(Some(target));
        }

        // Try adding extensions
        for ext in &EXTENSIONS {
            let with_ext = PathBuf::from(format!("{}.{}", target.display(), ext));
            if with_ext.is_file() {
                return Ok(Some(with_ext));
            }
        }

        // Try as directory with index file
        if target.is_dir() {
            for ext in &EXTENSIONS {
                let index = target.join(format!("index.{}", ext));
                if index.is_file() {
                    return Ok(Some(index));
                }
            }
        }

        Ok(None)
    }

    /// Resolve a bare import (from node_modules)
    fn resolve_bare(&self, specifier: &str, from: &Path) -> Result<Option<PathBuf>> {
        let mut current = from.to_path_buf();

        // Walk up directory tree looking for node_modules
        loop {
            let node_modules = current.join("node_modules");

            if node_modules.is_dir() {
                if let Some(resolved) = self.resolve_in_node_modules(&node_modules, specifier)? {
                    return Ok(Some(resolved));
                }
            }

            if !current.pop() {
                break;
            }
        }

        debug!("Could not resolve bare specifier: {}", specifier);
        Ok(None)
    }

    /// Resolve a module within a node_modules directory
    fn resolve_in_node_modules(&self, node_modules: &Path, specifier: &str) -> Result<Option<PathBuf>> {
        // Split specifier into package name and subpath
        let (package_name, subpath) = if specifier.starts_with('@') {
            // Scoped package: @scope/name or @scope/name/subpath
            let parts: Vec<&str> = specifier.splitn(3, '/').collect();
            if parts.len() < 2 {
                return Ok(None);
            }
            let name = format!("{}/{}", parts[0], parts[1]);
            (name, parts.get(2).map(|s| s.to_string()))
        } else {
            let parts: Vec<&str> = specifier.splitn(2, '/').collect();
            (parts[0].to_string(), parts.get(1).map(|s| s.to_string()))
        };

        let package_dir = node_modules.join(&package_name);

        if !package_dir.is_dir() {
            return Ok(None);
        }

        if let Some(sub) = subpath {
            return self.resolve_relative(&sub, &package_dir);
        }

        let package_json = package_dir.join("package.json");

        if package_json.is_file() {
            let content = fs::read_to_string(&package_json)
                .with_context(|| format!("Failed to read {}", package_json.display()))?;
            let pkg: serde_json::Value = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse {}", package_json.display()))?;

            // Try module field first (ESM)
            if let Some(module) = pkg.get("module").and_then(|v| v.as_str()) {
                if let Some(resolved) = self.resolve_relative(module, &package_dir)? {
                    return Ok(Some(resolved));
                }
            }

            if let Some(main) = pkg.get("main").and_then(|v| v.as_str()) {
                if let Some(resolved) = self.resolve_relative(main, &package_dir)? {
                    return Ok(Some(resolved));
                }
            }
        }

        self.resolve_relative("index.js", &package_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn specifiers(deps: &[Dependency], kind: ImportKind) -> Vec<&str> {
        deps.iter()
            .filter(|d| d.kind == kind)
            .map(|d| d.specifier.as_str())
            .collect()
    }

    #[test]
    fn test_extract_imports() {
        let source = r#"
            import foo from './foo';
            import { bar } from './bar.js';
            import * as baz from '../baz';
            export { qux } from './qux';
            const x = require('./x');
        "#;

        let resolver = Resolver::new(AliasTable::default());
        let deps = resolver.extract_dependencies(source, &ModuleType::JavaScript);

        assert_eq!(
            specifiers(&deps, ImportKind::Static),
            vec!["./foo", "./bar.js", "../baz", "./qux", "./x"]
        );
    }

    #[test]
    fn test_extract_dynamic_imports() {
        let source = r#"
            const module = import('./dynamic');
            const other = import("./other");
            const named = import(/* chunkName: "home" */ "./pages/Home.vue");
        "#;

        let resolver = Resolver::new(AliasTable::default());
        let deps = resolver.extract_dependencies(source, &ModuleType::TypeScript);

        assert_eq!(
            specifiers(&deps, ImportKind::Dynamic),
            vec!["./dynamic", "./other", "./pages/Home.vue"]
        );
        assert!(specifiers(&deps, ImportKind::Static).is_empty());
    }

    #[test]
    fn test_dynamic_import_comment_ends_at_first_close() {
        let source = r#"
            const a = import(/* a */ x); /* b */ "y");
            const b = import(/* multi
                line ** comment */ './real');
        "#;

        let resolver = Resolver::new(AliasTable::default());
        let deps = resolver.extract_dependencies(source, &ModuleType::JavaScript);

        assert_eq!(specifiers(&deps, ImportKind::Dynamic), vec!["./real"]);
    }

    #[test]
    fn test_css_has_no_dependencies() {
        let resolver = Resolver::new(AliasTable::default());
        assert!(resolver.extract_dependencies("@import './a.css';", &ModuleType::Css).is_empty());
    }

    #[test]
    fn test_resolve_relative_alias_and_bare() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("src/pages")).unwrap();
        fs::create_dir_all(root.join("node_modules/lodash")).unwrap();
        fs::write(root.join("src/main.ts"), "").unwrap();
        fs::write(root.join("src/pages/Home.vue"), "").unwrap();
        fs::write(root.join("node_modules/lodash/package.json"), r#"{"main": "lodash.js"}"#).unwrap();
        fs::write(root.join("node_modules/lodash/lodash.js"), "").unwrap();

        let src = path_to_module_id(&root.join("src"));
        let resolver = Resolver::new(AliasTable::new(vec![Alias::new("@", src)]));
        let main = root.join("src/main.ts");

        let relative = resolver.resolve("./pages/Home", &main).unwrap().unwrap();
        assert!(relative.ends_with("src/pages/Home.vue"));

        let aliased = resolver.resolve("@/pages/Home.vue", &main).unwrap().unwrap();
        assert_eq!(aliased, relative);

        let bare = resolver.resolve("lodash", &main).unwrap().unwrap();
        assert!(bare.ends_with("node_modules/lodash/lodash.js"));

        assert_eq!(resolver.resolve("./missing", &main).unwrap(), None);
    }
}
