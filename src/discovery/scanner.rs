//! File system scanner for discovering icon sources.
//!
//! Recursively walks a source directory and returns every `.svg` file found,
//! in a fully deterministic order.

use std::path::Path;

use walkdir::WalkDir;

use crate::error::{IconError, Result};
use crate::registry::{IconSource, ICON_EXTENSION};

use super::manifest::Manifest;

/// Scan a directory tree for icon files.
///
/// Entries are sorted by case-sensitive lexicographic comparison of the bare
/// file name, with the full path as tie-breaker for identical names. The
/// sort is mandatory, not an optimization: codepoint assignment downstream is
/// order-dependent and must be reproducible regardless of how the underlying
/// file system reports directory entries.
///
/// Fails if the root does not exist or is not a directory.
pub fn scan_directory(root: &Path, manifest: &Manifest) -> Result<Vec<IconSource>> {
    if !root.is_dir() {
        return Err(IconError::Scan {
            path: root.to_path_buf(),
            message: "source directory does not exist or is not a directory".to_string(),
        });
    }

    let mut sources = Vec::new();

    for entry in WalkDir::new(root).follow_links(true) {
        let entry = entry.map_err(|e| IconError::Scan {
            path: root.to_path_buf(),
            message: e.to_string(),
        })?;
        let path = entry.path();

        if path.is_dir() {
            continue;
        }

        if manifest.is_excluded(path) {
            continue;
        }

        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        if file_name.ends_with(ICON_EXTENSION) {
            sources.push(IconSource::new(file_name, path));
        }
    }

    sources.sort_by(|a, b| {
        a.file_name
            .cmp(&b.file_name)
            .then_with(|| a.path.cmp(&b.path))
    });

    Ok(sources)
}

/// Scan multiple source paths, merging and re-sorting the results.
pub fn scan_sources(
    sources: &[String],
    base_path: &Path,
    manifest: &Manifest,
) -> Result<Vec<IconSource>> {
    let mut all = Vec::new();

    for source in sources {
        let source_path = if Path::new(source).is_absolute() {
            Path::new(source).to_path_buf()
        } else {
            base_path.join(source)
        };

        all.extend(scan_directory(&source_path, manifest)?);
    }

    all.sort_by(|a, b| {
        a.file_name
            .cmp(&b.file_name)
            .then_with(|| a.path.cmp(&b.path))
    });

    Ok(all)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_scan_nonexistent_directory_fails() {
        let manifest = Manifest::default();
        let result = scan_directory(Path::new("/nonexistent/path"), &manifest);
        assert!(matches!(result, Err(IconError::Scan { .. })));
    }

    #[test]
    fn test_scan_ignores_other_extensions() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("sword.svg"), "<svg/>").unwrap();
        fs::write(dir.path().join("readme.md"), "# notes").unwrap();
        fs::write(dir.path().join("sword.png"), [0u8; 4]).unwrap();

        let sources = scan_directory(dir.path(), &Manifest::default()).unwrap();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].file_name, "sword.svg");
    }

    #[test]
    fn test_scan_recursive() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("weapons/melee")).unwrap();
        fs::write(dir.path().join("shield.svg"), "<svg/>").unwrap();
        fs::write(dir.path().join("weapons/melee/sword.svg"), "<svg/>").unwrap();

        let sources = scan_directory(dir.path(), &Manifest::default()).unwrap();
        assert_eq!(sources.len(), 2);
    }

    #[test]
    fn test_scan_order_ignores_creation_order() {
        let dir = tempdir().unwrap();
        // Created out of order; the scan must sort by bare file name.
        fs::write(dir.path().join("wand.svg"), "<svg/>").unwrap();
        fs::write(dir.path().join("axe.svg"), "<svg/>").unwrap();
        fs::write(dir.path().join("mace.svg"), "<svg/>").unwrap();

        let sources = scan_directory(dir.path(), &Manifest::default()).unwrap();
        let names: Vec<&str> = sources.iter().map(|s| s.file_name.as_str()).collect();
        assert_eq!(names, vec!["axe.svg", "mace.svg", "wand.svg"]);
    }

    #[test]
    fn test_scan_order_is_case_sensitive() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("Zebra.svg"), "<svg/>").unwrap();
        fs::write(dir.path().join("apple.svg"), "<svg/>").unwrap();

        let sources = scan_directory(dir.path(), &Manifest::default()).unwrap();
        let names: Vec<&str> = sources.iter().map(|s| s.file_name.as_str()).collect();
        // Uppercase sorts before lowercase in byte order.
        assert_eq!(names, vec!["Zebra.svg", "apple.svg"]);
    }

    #[test]
    fn test_scan_sorts_by_name_not_path() {
        let dir = tempdir().unwrap();
        // zz/axe.svg must come before aa/bow.svg: names order, paths do not.
        fs::create_dir_all(dir.path().join("zz")).unwrap();
        fs::create_dir_all(dir.path().join("aa")).unwrap();
        fs::write(dir.path().join("zz/axe.svg"), "<svg/>").unwrap();
        fs::write(dir.path().join("aa/bow.svg"), "<svg/>").unwrap();

        let sources = scan_directory(dir.path(), &Manifest::default()).unwrap();
        let names: Vec<&str> = sources.iter().map(|s| s.file_name.as_str()).collect();
        assert_eq!(names, vec!["axe.svg", "bow.svg"]);
    }

    #[test]
    fn test_scan_same_name_tie_broken_by_path() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("axe.svg"), "<svg/>").unwrap();
        fs::write(dir.path().join("nested/axe.svg"), "<svg/>").unwrap();

        let sources = scan_directory(dir.path(), &Manifest::default()).unwrap();
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].file_name, "axe.svg");
        assert_eq!(sources[1].file_name, "axe.svg");
        // Root-level path sorts before the nested one.
        assert!(sources[0].path < sources[1].path);
    }

    #[test]
    fn test_scan_with_excludes() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("drafts")).unwrap();
        fs::write(dir.path().join("sword.svg"), "<svg/>").unwrap();
        fs::write(dir.path().join("drafts/wip.svg"), "<svg/>").unwrap();

        let manifest = Manifest {
            excludes: vec!["**/drafts/*".to_string()],
            ..Default::default()
        };

        let sources = scan_directory(dir.path(), &manifest).unwrap();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].file_name, "sword.svg");
    }

    #[test]
    fn test_scan_sources_merges_and_resorts() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("one")).unwrap();
        fs::create_dir_all(dir.path().join("two")).unwrap();
        fs::write(dir.path().join("one/zephyr.svg"), "<svg/>").unwrap();
        fs::write(dir.path().join("two/anchor.svg"), "<svg/>").unwrap();

        let sources = scan_sources(
            &["one".to_string(), "two".to_string()],
            dir.path(),
            &Manifest::default(),
        )
        .unwrap();

        let names: Vec<&str> = sources.iter().map(|s| s.file_name.as_str()).collect();
        assert_eq!(names, vec!["anchor.svg", "zephyr.svg"]);
    }
}
