//! Utility functions and helpers
//!
//! Module ids are compared as strings, so every helper here works on
//! `/`-separated text rather than on `std::path` components.

mod filter;

use std::path::Path;

pub use filter::Filter;

/// Replace every `\` with `/`
pub fn normalize_slashes(path: &str) -> String {
    path.replace('\\', "/")
}

/// Whether a `/`-separated path is absolute (`/x` or `C:/x`)
pub fn is_absolute(path: &str) -> bool {
    path.starts_with('/') || drive_prefix(path).is_some()
}

/// Windows drive prefix such as `C:/`
fn drive_prefix(path: &str) -> Option<&str> {
    let bytes = path.as_bytes();
    if bytes.len() >= 3 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' && bytes[2] == b'/' {
        Some(&path[..3])
    } else {
        None
    }
}

/// Clean a path by removing . and .. components
///
/// `..` never climbs above the root of an absolute path; for relative paths
/// leading `..` segments are kept.
pub fn clean_path(path: &str) -> String {
    let path = normalize_slashes(path);
    let (prefix, rest) = match drive_prefix(&path) {
        Some(drive) => (drive.to_string(), &path[drive.len()..]),
        None if path.starts_with('/') => ("/".to_string(), &path[1..]),
        None => (String::new(), path.as_str()),
    };
    let absolute = !prefix.is_empty();

    let mut parts: Vec<&str> = Vec::new();
    for part in rest.split('/') {
        match part {
            "" | "." => continue,
            ".." => {
                if parts.last().map_or(absolute, |last| *last != "..") {
                    parts.pop();
                } else if !absolute {
                    parts.push("..");
                }
            }
            _ => parts.push(part),
        }
    }

    let joined = parts.join("/");
    if absolute {
        format!("{prefix}{joined}")
    } else if joined.is_empty() {
        ".".to_string()
    } else {
        joined
    }
}

/// Concatenate two path fragments and clean the result
///
/// The second fragment is appended even when it starts with `/`, so
/// `join_paths("/src", "/pages")` is `/src/pages`.
pub fn join_paths(base: &str, rest: &str) -> String {
    match (base.is_empty(), rest.is_empty()) {
        (true, true) => ".".to_string(),
        (true, false) => clean_path(rest),
        (false, true) => clean_path(base),
        (false, false) => clean_path(&format!("{base}/{rest}")),
    }
}

/// Resolve `target` against `dir` into an absolute path
///
/// An absolute `target` wins outright; a relative `dir` is anchored at `root`.
pub fn resolve_path(root: &Path, dir: &str, target: &str) -> String {
    let target = normalize_slashes(target);
    if is_absolute(&target) {
        return clean_path(&target);
    }
    let dir = normalize_slashes(dir);
    if is_absolute(&dir) {
        join_paths(&dir, &target)
    } else {
        let root = path_to_module_id(root);
        join_paths(&join_paths(&root, &dir), &target)
    }
}

/// Directory part of a `/`-separated path
pub fn dirname(path: &str) -> String {
    let path = normalize_slashes(path);
    let trimmed = path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(0) => "/".to_string(),
        Some(idx) => {
            let dir = &trimmed[..idx];
            if drive_prefix(&path).is_some_and(|drive| dir.len() + 1 == drive.len()) {
                path[..3].to_string()
            } else {
                dir.to_string()
            }
        }
        None if path.starts_with('/') => "/".to_string(),
        None => ".".to_string(),
    }
}

/// Get relative path from base to target
pub fn relative_path(from: &Path, to: &Path) -> Option<String> {
    pathdiff::diff_paths(to, from).map(|p| path_to_module_id(&p))
}

/// Convert a file path to a module ID
pub fn path_to_module_id(path: &Path) -> String {
    normalize_slashes(&path.display().to_string())
}

/// Format duration as human-readable string
pub fn format_duration(duration: std::time::Duration) -> String {
    let secs = duration.as_secs_f64();

    if secs >= 60.0 {
        let mins = (secs / 60.0).floor() as u64;
        let remaining_secs = secs - (mins as f64 * 60.0);
        format!("{}m {:.2}s", mins, remaining_secs)
    } else if secs >= 1.0 {
        format!("{:.2}s", secs)
    } else {
        format!("{:.0}ms", secs * 1000.0)
    }
}
