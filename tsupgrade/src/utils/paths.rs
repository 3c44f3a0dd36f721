//! Path utilities for tsupgrade.
//!
//! This module consolidates all path-related logic for:
//! - Cross-platform path normalization
//! - TypeScript file discovery with gitignore support

use crate::constants::{DECLARATION_SUFFIXES, DEFAULT_EXCLUDE_FOLDERS, SOURCE_EXTENSIONS, TSX_EXTENSION};
use std::path::{Component, Path, PathBuf};

/// Normalizes a path for CLI display.
///
/// - Converts backslashes to forward slashes (for cross-platform consistency)
/// - Strips leading "./" or ".\" prefix (for cleaner output)
///
/// # Examples
/// ```
/// use std::path::Path;
/// use tsupgrade::utils::normalize_display_path;
///
/// assert_eq!(normalize_display_path(Path::new(".\\src\\index.ts")), "src/index.ts");
/// assert_eq!(normalize_display_path(Path::new("./src/main.ts")), "src/main.ts");
/// ```
#[must_use]
pub fn normalize_display_path(path: &Path) -> String {
    let s = path.to_string_lossy();
    // Strip Windows extended path prefix if present
    let clean = s.trim_start_matches(r"\\?\");
    let normalized = clean.replace('\\', "/");
    normalized
        .strip_prefix("./")
        .unwrap_or(&normalized)
        .to_owned()
}

/// Resolve `.` and `..` components without touching the filesystem.
///
/// Module specifiers are resolved against paths that may not exist yet
/// (in-memory snapshots), so canonicalization is not an option.
#[must_use]
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let popped = matches!(out.components().next_back(), Some(Component::Normal(_))) && out.pop();
                if !popped {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Checks if a name matches any exclusion pattern.
/// Supports exact matching and wildcard patterns starting with `*.`.
#[must_use]
pub fn is_excluded(name: &str, excludes: &[String]) -> bool {
    excludes.iter().any(|exclude| match exclude.strip_prefix('*') {
        Some(suffix) if suffix.starts_with('.') => name.ends_with(suffix),
        _ => name == exclude,
    })
}

/// Whether `path` is a TypeScript source the upgrader should touch.
#[must_use]
pub fn is_typescript_source(path: &Path, include_tsx: bool, include_declarations: bool) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    let wanted = SOURCE_EXTENSIONS.contains(&ext) || (include_tsx && ext == TSX_EXTENSION);
    if !wanted {
        return false;
    }
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    include_declarations || !DECLARATION_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
}

/// Options for [`collect_typescript_files`].
#[derive(Debug, Clone, Default)]
pub struct DiscoveryOptions {
    /// Additional folder names or `*.ext` patterns to skip.
    pub exclude: Vec<String>,
    /// Folders to force-include (overrides excludes).
    pub include: Vec<String>,
    /// Collect `.tsx` files too.
    pub include_tsx: bool,
    /// Collect `.d.ts` declaration files too.
    pub include_declarations: bool,
}

/// Collects TypeScript files from a directory with gitignore support.
///
/// Uses the `ignore` crate to respect .gitignore, .git/info/exclude, and global gitignore
/// IN ADDITION to the hardcoded default exclusions (`node_modules`, dist, build, etc.).
///
/// A `root` that is itself a file is returned as-is when it is a TypeScript source.
///
/// # Returns
/// Tuple of (sorted vector of `PathBuf` for all files found, directory count)
#[must_use]
pub fn collect_typescript_files(root: &Path, options: &DiscoveryOptions) -> (Vec<PathBuf>, usize) {
    use ignore::WalkBuilder;

    if root.is_file() {
        let keep = is_typescript_source(root, options.include_tsx, options.include_declarations);
        return (if keep { vec![root.to_path_buf()] } else { Vec::new() }, 0);
    }

    // Merge user excludes with default excludes
    let mut all_excludes: Vec<String> = options
        .exclude
        .iter()
        .cloned()
        .chain(DEFAULT_EXCLUDE_FOLDERS().iter().map(|&s| s.to_owned()))
        .collect();

    // Remove force-included folders from exclusion list
    all_excludes.retain(|ex| !options.include.iter().any(|inc| ex == inc));

    let root_for_filter = root.to_path_buf();

    // Skip excluded directories at traversal time so node_modules is never entered.
    let walker = WalkBuilder::new(root)
        .hidden(false)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .filter_entry(move |entry| {
            if entry.path() == root_for_filter {
                return true;
            }
            if !entry.file_type().is_some_and(|ft| ft.is_dir()) {
                return true;
            }
            entry
                .file_name()
                .to_str()
                .is_none_or(|name| !is_excluded(name, &all_excludes))
        })
        .build();

    let mut files = Vec::new();
    let mut dir_count = 0;

    for result in walker {
        match result {
            Ok(entry) => {
                let path = entry.path();
                if entry.file_type().is_some_and(|ft| ft.is_dir()) {
                    if path != root {
                        dir_count += 1;
                    }
                    continue;
                }
                if is_typescript_source(path, options.include_tsx, options.include_declarations) {
                    files.push(path.to_path_buf());
                }
            }
            Err(e) => tracing::warn!(error = %e, "walk error"),
        }
    }

    files.sort();
    (files, dir_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_normalize_lexically() {
        assert_eq!(normalize_lexically(Path::new("src/./a/../b.ts")), PathBuf::from("src/b.ts"));
        assert_eq!(normalize_lexically(Path::new("../x.ts")), PathBuf::from("../x.ts"));
        assert_eq!(normalize_lexically(Path::new("a/../../x.ts")), PathBuf::from("../x.ts"));
    }

    #[test]
    fn test_is_excluded_patterns() {
        let excludes = vec!["node_modules".to_owned(), "*.tsbuildinfo".to_owned()];
        assert!(is_excluded("node_modules", &excludes));
        assert!(is_excluded("app.tsbuildinfo", &excludes));
        assert!(!is_excluded("src", &excludes));
    }

    #[test]
    fn test_source_extensions() {
        assert!(is_typescript_source(Path::new("a.ts"), false, false));
        assert!(is_typescript_source(Path::new("a.mts"), false, false));
        assert!(!is_typescript_source(Path::new("a.tsx"), false, false));
        assert!(is_typescript_source(Path::new("a.tsx"), true, false));
        assert!(!is_typescript_source(Path::new("a.d.ts"), false, false));
        assert!(is_typescript_source(Path::new("a.d.ts"), false, true));
        assert!(!is_typescript_source(Path::new("a.js"), true, true));
    }

    #[test]
    fn test_collect_typescript_files_exclusion() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let root = temp.path();

        fs::write(root.join("main.ts"), "export {};")?;
        fs::write(root.join("types.d.ts"), "declare const x: number;")?;
        fs::create_dir_all(root.join("node_modules/pkg"))?;
        fs::write(root.join("node_modules/pkg/index.ts"), "export {};")?;
        fs::create_dir_all(root.join("src"))?;
        fs::write(root.join("src/module.ts"), "export {};")?;
        fs::write(root.join("src/view.tsx"), "export {};")?;

        let (files, _) = collect_typescript_files(root, &DiscoveryOptions::default());
        let names: Vec<_> = files
            .iter()
            .filter_map(|p| p.file_name())
            .filter_map(|f| f.to_str())
            .collect();

        assert_eq!(names, vec!["main.ts", "module.ts"]);
        Ok(())
    }

    #[test]
    fn test_collect_typescript_files_force_include() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let root = temp.path();
        fs::create_dir_all(root.join("dist"))?;
        fs::write(root.join("dist/out.ts"), "export {};")?;

        let options = DiscoveryOptions {
            include: vec!["dist".to_owned()],
            ..DiscoveryOptions::default()
        };
        let (files, _) = collect_typescript_files(root, &options);
        assert_eq!(files.len(), 1);
        Ok(())
    }
}
