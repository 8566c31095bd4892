// src/scanner.rs

//! Source tree scanning
//!
//! Walks a directory, extracts the imports of every markup file in it and
//! returns one reference per distinct module name.

use crate::error::{Error, Result};
use crate::imports::{extract_imports, ModuleRef};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

/// Default markup file extension
pub const DEFAULT_MARKUP_EXTENSION: &str = "qml";

/// Scanner for markup files below a directory
#[derive(Debug, Clone)]
pub struct ProjectScanner {
    extension: String,
}

impl Default for ProjectScanner {
    fn default() -> Self {
        Self::new(DEFAULT_MARKUP_EXTENSION)
    }
}

impl ProjectScanner {
    /// Create a scanner matching files with `extension` (without the dot)
    pub fn new(extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
        }
    }

    /// Collect the module references imported anywhere below `dir`
    ///
    /// References are deduplicated by name; when two files import the same
    /// module with different majors, the first one encountered is kept.
    /// Files are visited in file-name order, so the result is deterministic.
    pub fn scan(&self, dir: &Path) -> Result<Vec<ModuleRef>> {
        if !dir.is_dir() {
            return Err(Error::MissingSourceRoot(dir.to_path_buf()));
        }

        let mut seen = HashSet::new();
        let mut refs = Vec::new();
        let mut files = 0usize;

        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry.map_err(|source| Error::Walk {
                path: dir.to_path_buf(),
                source,
            })?;
            // Symlinked files count; a dangling link fails in the read below.
            let is_file = entry.file_type().is_file()
                || (entry.path_is_symlink() && !entry.path().is_dir());
            if !is_file || !self.is_markup(entry.path()) {
                continue;
            }
            files += 1;

            let bytes = fs::read(entry.path()).map_err(|source| Error::Read {
                path: entry.path().to_path_buf(),
                source,
            })?;
            let text = String::from_utf8_lossy(&bytes);

            for module in extract_imports(&text) {
                if seen.insert(module.name.clone()) {
                    refs.push(module);
                }
            }
        }

        debug!(
            "Scanned {}: {} markup files, {} distinct imports",
            dir.display(),
            files,
            refs.len()
        );
        Ok(refs)
    }

    fn is_markup(&self, path: &Path) -> bool {
        path.extension()
            .is_some_and(|ext| ext.to_string_lossy() == self.extension.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_scan_nested_files() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("pages/detail")).unwrap();
        fs::write(root.join("main.qml"), "import QtQuick 2.0\nimport QtQuick.Window 2.2\n").unwrap();
        fs::write(
            root.join("pages/detail/Detail.qml"),
            "import QtQuick 2.0\nimport QtQuick.Controls 2.5\n",
        )
        .unwrap();

        let refs = ProjectScanner::default().scan(root).unwrap();
        let names: Vec<&str> = refs.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["QtQuick", "QtQuick.Window", "QtQuick.Controls"]);
    }

    #[test]
    fn test_first_version_wins() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::write(root.join("a.qml"), "import QtQuick.Controls 1.4\n").unwrap();
        fs::write(root.join("b.qml"), "import QtQuick.Controls 2.0\n").unwrap();

        let refs = ProjectScanner::default().scan(root).unwrap();
        assert_eq!(refs, vec![ModuleRef::new("QtQuick.Controls", 1)]);
    }

    #[test]
    fn test_other_extensions_ignored() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::write(root.join("util.js"), "import QtQuick 2.0\n").unwrap();
        fs::write(root.join("main.qmlc"), "import QtQuick 2.0\n").unwrap();
        fs::write(root.join("qmldir"), "module Foo\n").unwrap();

        assert!(ProjectScanner::default().scan(root).unwrap().is_empty());
    }

    #[test]
    fn test_custom_extension() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("main.ui"), "import QtQuick 2.0\n").unwrap();

        let refs = ProjectScanner::new("ui").scan(temp.path()).unwrap();
        assert_eq!(refs, vec![ModuleRef::new("QtQuick", 2)]);
    }

    #[test]
    fn test_non_utf8_content() {
        let temp = TempDir::new().unwrap();
        let mut content = b"import QtQuick 2.0\n".to_vec();
        content.extend_from_slice(&[0xff, 0xfe, b'\n']);
        fs::write(temp.path().join("main.qml"), content).unwrap();

        let refs = ProjectScanner::default().scan(temp.path()).unwrap();
        assert_eq!(refs, vec![ModuleRef::new("QtQuick", 2)]);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_markup_file_scanned() {
        let temp = TempDir::new().unwrap();
        let shared = temp.path().join("shared");
        let res = temp.path().join("res");
        fs::create_dir_all(&shared).unwrap();
        fs::create_dir_all(&res).unwrap();
        fs::write(shared.join("Main.qml"), "import QtQuick 2.0\n").unwrap();
        std::os::unix::fs::symlink(shared.join("Main.qml"), res.join("main.qml")).unwrap();

        let refs = ProjectScanner::default().scan(&res).unwrap();
        assert_eq!(refs, vec![ModuleRef::new("QtQuick", 2)]);
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_markup_file_aborts_scan() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.qml"), "import QtQuick 2.0\n").unwrap();
        std::os::unix::fs::symlink(temp.path().join("gone.qml"), temp.path().join("Foo.qml"))
            .unwrap();

        let err = ProjectScanner::default().scan(temp.path()).unwrap_err();
        match err {
            Error::Read { path, .. } => assert_eq!(path, temp.path().join("Foo.qml")),
            other => panic!("expected read error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_directory() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("res");
        let err = ProjectScanner::default().scan(&missing).unwrap_err();
        assert!(matches!(err, Error::MissingSourceRoot(_)));
        assert!(err.to_string().contains("does not exist"));
    }
}
