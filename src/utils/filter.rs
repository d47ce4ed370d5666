//! Include/exclude glob filter for module ids

use std::path::Path;

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

use super::{is_absolute, join_paths, normalize_slashes, path_to_module_id};

/// Decides whether a module id takes part in processing
///
/// An id is accepted when it matches no `exclude` pattern and either matches an
/// `include` pattern or no include patterns were given. Relative patterns are
/// anchored at the base directory; patterns starting with `**` or `/` are used
/// as written.
#[derive(Debug, Clone)]
pub struct Filter {
    include: GlobSet,
    exclude: GlobSet,
    has_include: bool,
}

impl Filter {
    pub fn new<S: AsRef<str>>(include: &[S], exclude: &[S], base: &Path) -> Result<Self, globset::Error> {
        Ok(Self {
            include: build_set(include, base)?,
            exclude: build_set(exclude, base)?,
            has_include: !include.is_empty(),
        })
    }

    pub fn matches(&self, id: &str) -> bool {
        // virtual modules
        if id.contains('\0') {
            return false;
        }
        let id = normalize_slashes(id);
        if self.exclude.is_match(&id) {
            return false;
        }
        if self.include.is_match(&id) {
            return true;
        }
        !self.has_include
    }
}

fn build_set<S: AsRef<str>>(patterns: &[S], base: &Path) -> Result<GlobSet, globset::Error> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let anchored = anchor_pattern(pattern.as_ref(), base);
        builder.add(GlobBuilder::new(&anchored).literal_separator(true).build()?);
    }
    builder.build()
}

fn anchor_pattern(pattern: &str, base: &Path) -> String {
    let pattern = normalize_slashes(pattern);
    if is_absolute(&pattern) || pattern.starts_with("**") {
        return pattern;
    }
    let base = globset::escape(&path_to_module_id(base));
    join_paths(&base, &pattern)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_filter() -> Filter {
        Filter::new(
            &["src/**/*.{js,ts,jsx,tsx,vue}"],
            &["**/node_modules/**"],
            Path::new("/project"),
        )
        .unwrap()
    }

    #[test]
    fn test_relative_include_is_anchored_at_base() {
        let filter = default_filter();
        assert!(filter.matches("/project/src/main.ts"));
        assert!(filter.matches("/project/src/pages/widgets/Chart.vue"));
        assert!(!filter.matches("/other/src/main.ts"));
        assert!(!filter.matches("/project/src/styles/app.css"));
    }

    #[test]
    fn test_exclude_wins_over_include() {
        let filter = default_filter();
        assert!(!filter.matches("/project/src/node_modules/x/index.js"));
        assert!(!filter.matches("/project/node_modules/lodash/index.js"));
    }

    #[test]
    fn test_backslashes_and_virtual_ids() {
        let filter = default_filter();
        assert!(filter.matches("\\project\\src\\main.ts"));
        assert!(!filter.matches("\0/project/src/main.ts"));
    }

    #[test]
    fn test_no_include_accepts_everything_not_excluded() {
        let filter = Filter::new::<&str>(&[], &["**/*.css"], Path::new("/project")).unwrap();
        assert!(filter.matches("/anywhere/a.ts"));
        assert!(!filter.matches("/anywhere/a.css"));
    }

    #[test]
    fn test_invalid_pattern_is_an_error() {
        assert!(Filter::new(&["src/[a"], &[] as &[&str], Path::new("/project")).is_err());
    }
}
