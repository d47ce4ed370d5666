//! Extraction of chunk-name annotations from source text
//!
//! The annotation is matched with a fixed regular expression, not a parser.
//! Only the exact shape `import(/* chunkName: '<name>' */ '<path>')` is seen;
//! an annotation split across other tokens, or a template-literal path, is
//! ignored.

use std::path::PathBuf;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use super::{ChunkNameTable, Logger, VENDOR_DIR};
use crate::resolver::{AliasTable, ResolveError};
use crate::utils::{dirname, normalize_slashes, resolve_path, Filter};

static CHUNK_NAME_IMPORT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"import\s*\(\s*/\*\s*chunkName\s*:\s*['"]([^'"]+)['"]\s*\*/\s*['"]([^'"]+)['"]\s*\)"#).unwrap()
});

/// One annotated dynamic import
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRecord {
    pub import_path: String,
    pub chunk_name: String,
}

/// Find every annotated dynamic import in `code`, in source order
pub fn find_imports(code: &str) -> Vec<ImportRecord> {
    CHUNK_NAME_IMPORT_REGEX
        .captures_iter(code)
        .filter_map(|cap| {
            let chunk_name = cap.get(1)?.as_str().trim();
            let import_path = cap.get(2)?.as_str().trim();
            if chunk_name.is_empty() || import_path.is_empty() {
                return None;
            }
            Some(ImportRecord {
                import_path: import_path.to_string(),
                chunk_name: chunk_name.to_string(),
            })
        })
        .collect()
}

/// Records the chunk names requested by the files it scans
#[derive(Debug, Clone)]
pub struct Scanner {
    filter: Arc<Filter>,
    aliases: AliasTable,
    /// Anchor for files whose id is not absolute
    root: PathBuf,
    logger: Logger,
}

impl Scanner {
    pub fn new(filter: Arc<Filter>, aliases: AliasTable, root: PathBuf, logger: Logger) -> Self {
        Self {
            filter,
            aliases,
            root,
            logger,
        }
    }

    pub fn set_aliases(&mut self, aliases: AliasTable) {
        self.aliases = aliases;
    }

    /// Whether `file_id` is scanned at all
    pub fn should_scan(&self, file_id: &str) -> bool {
        self.filter.matches(file_id) && !file_id.contains(VENDOR_DIR)
    }

    /// Scan one file and record its annotations into `table`
    ///
    /// Returns how many records were stored. A record whose path cannot be
    /// resolved is logged and skipped without affecting the others.
    pub fn scan(&self, table: &mut ChunkNameTable, file_id: &str, code: &str) -> usize {
        if !self.should_scan(file_id) {
            return 0;
        }

        let file_dir = dirname(file_id);
        let mut stored = 0;

        for ImportRecord {
            import_path,
            chunk_name,
        } in find_imports(code)
        {
            match self.resolve_import_path(&import_path, &file_dir) {
                Ok(module_id) => {
                    self.logger.info(format_args!("{} -> {}", module_id, chunk_name));
                    table.insert(module_id, chunk_name);
                    stored += 1;
                }
                Err(err) => {
                    self.logger.warn(format_args!(
                        "Failed to resolve path mapping for {}: {}",
                        import_path, err
                    ));
                }
            }
        }

        stored
    }

    /// Canonical module id for `import_path` as written in a file under `file_dir`
    ///
    /// Relative paths are resolved against the directory. Anything else goes
    /// through the alias table and is kept verbatim when no alias matches.
    pub fn resolve_import_path(&self, import_path: &str, file_dir: &str) -> Result<String, ResolveError> {
        let resolved = if import_path.starts_with('.') {
            resolve_path(&self.root, file_dir, import_path)
        } else {
            self.aliases
                .apply(import_path)?
                .unwrap_or_else(|| import_path.to_string())
        };

        let module_id = normalize_slashes(&resolved);
        if module_id.is_empty() {
            return Err(ResolveError::EmptyModuleId {
                import_path: import_path.to_string(),
            });
        }
        Ok(module_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::Alias;
    use pretty_assertions::assert_eq;
    use std::path::Path;

    fn scanner(aliases: Vec<Alias>) -> Scanner {
        let filter = Filter::new(
            &["src/**/*.{js,ts,jsx,tsx,vue}"],
            &["**/node_modules/**"],
            Path::new("/project"),
        )
        .unwrap();
        Scanner::new(
            Arc::new(filter),
            AliasTable::new(aliases),
            PathBuf::from("/project"),
            Logger::default(),
        )
    }

    fn record(import_path: &str, chunk_name: &str) -> ImportRecord {
        ImportRecord {
            import_path: import_path.to_string(),
            chunk_name: chunk_name.to_string(),
        }
    }

    #[test]
    fn test_find_imports_quotes_and_whitespace() {
        let code = r#"
            const a = () => import(/* chunkName: "home" */ "./Home.vue");
            const b = () => import( /*chunkName:'about'*/ '../About.vue' );
            const c = () => import(
                /* chunkName : " spaced " */
                "@/pages/Test.vue"
            );
        "#;
        assert_eq!(
            find_imports(code),
            vec![
                record("./Home.vue", "home"),
                record("../About.vue", "about"),
                record("@/pages/Test.vue", "spaced"),
            ]
        );
    }

    #[test]
    fn test_find_imports_rejects_malformed_annotations() {
        let code = r#"
            import("./plain.ts");
            import(/* webpackChunkName: "x" */ "./webpack.ts");
            import(/* chunkName: home */ "./unquoted.ts");
            import(/* chunkName: "missing-path" */);
            import(/* chunkName: "tpl" */ `./tpl.ts`);
            import(/* chunkName: "   " */ "./blank-name.ts");
        "#;
        assert_eq!(find_imports(code), vec![]);
    }

    #[test]
    fn test_find_imports_counts_every_occurrence() {
        let code = r#"import(/* chunkName: "a" */ "./a");import(/* chunkName: "b" */ "./b")"#;
        assert_eq!(find_imports(code).len(), 2);
    }

    #[test]
    fn test_scan_relative_path() {
        let scanner = scanner(vec![]);
        let mut table = ChunkNameTable::new();
        let stored = scanner.scan(
            &mut table,
            "/project/src/pages/Home.vue",
            r#"import(/* chunkName: "home" */ "./widgets/Chart.vue")"#,
        );
        assert_eq!(stored, 1);
        assert_eq!(table.get("/project/src/pages/widgets/Chart.vue"), Some("home"));
    }

    #[test]
    fn test_same_relative_path_from_different_dirs() {
        let scanner = scanner(vec![]);
        let mut table = ChunkNameTable::new();
        let code = r#"import(/* chunkName: "w" */ "./Widget.vue")"#;
        scanner.scan(&mut table, "/project/src/a/Index.vue", code);
        scanner.scan(&mut table, "/project/src/b/Index.vue", code);
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("/project/src/a/Widget.vue"), Some("w"));
        assert_eq!(table.get("/project/src/b/Widget.vue"), Some("w"));
    }

    #[test]
    fn test_alias_order_decides() {
        let code = r#"import(/* chunkName: "x" */ "@/sub/x")"#;

        let first = scanner(vec![Alias::new("@", "/src"), Alias::new("@/sub", "/other")]);
        let mut table = ChunkNameTable::new();
        first.scan(&mut table, "/project/src/main.ts", code);
        assert_eq!(table.get("/src/sub/x"), Some("x"));

        let second = scanner(vec![Alias::new("@/sub", "/other"), Alias::new("@", "/src")]);
        let mut table = ChunkNameTable::new();
        second.scan(&mut table, "/project/src/main.ts", code);
        assert_eq!(table.get("/other/x"), Some("x"));
    }

    #[test]
    fn test_bare_specifier_kept_verbatim() {
        let scanner = scanner(vec![Alias::new("@", "/project/src")]);
        let mut table = ChunkNameTable::new();
        scanner.scan(&mut table, "/project/src/main.ts", r#"import(/* chunkName: "charts" */ "echarts")"#);
        assert_eq!(table.get("echarts"), Some("charts"));
    }

    #[test]
    fn test_windows_ids_are_normalized() {
        let filter = Filter::new(&["src/**/*.ts"], &[] as &[&str], Path::new("C:/project")).unwrap();
        let scanner = Scanner::new(
            Arc::new(filter),
            AliasTable::default(),
            PathBuf::from("C:/project"),
            Logger::default(),
        );
        let mut table = ChunkNameTable::new();
        scanner.scan(
            &mut table,
            "C:\\project\\src\\main.ts",
            r#"import(/* chunkName: "home" */ ".\\pages\\Home.ts")"#,
        );
        assert_eq!(table.get("C:/project/src/pages/Home.ts"), Some("home"));
    }

    #[test]
    fn test_bad_record_does_not_stop_the_rest() {
        let scanner = scanner(vec![Alias::new("", "/broken")]);
        let mut table = ChunkNameTable::new();
        let code = r#"
            import(/* chunkName: "aliased" */ "@/x.ts");
            import(/* chunkName: "relative" */ "./y.ts");
        "#;
        assert_eq!(scanner.scan(&mut table, "/project/src/main.ts", code), 1);
        assert_eq!(table.get("/project/src/y.ts"), Some("relative"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_filtered_and_vendor_files_are_skipped() {
        let scanner = scanner(vec![]);
        let mut table = ChunkNameTable::new();
        let code = r#"import(/* chunkName: "x" */ "./x.ts")"#;
        assert_eq!(scanner.scan(&mut table, "/project/lib/main.ts", code), 0);
        assert_eq!(scanner.scan(&mut table, "/project/src/node_modules/p/index.ts", code), 0);
        assert!(table.is_empty());
    }

    #[test]
    fn test_scanning_twice_is_idempotent() {
        let scanner = scanner(vec![]);
        let code = r#"
            import(/* chunkName: "a" */ "./a.ts");
            import(/* chunkName: "b" */ "./b.ts");
        "#;
        let mut once = ChunkNameTable::new();
        scanner.scan(&mut once, "/project/src/main.ts", code);
        let mut twice = once.clone();
        scanner.scan(&mut twice, "/project/src/main.ts", code);
        assert_eq!(once, twice);
    }
}
