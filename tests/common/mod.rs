// tests/common/mod.rs

//! Shared fixture builder for integration tests.

#![allow(dead_code)]

use qmlstage::DeployConfig;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A throwaway Qt install, project and output directory.
///
/// Keep the struct alive for the duration of the test; dropping it removes
/// everything.
pub struct Workspace {
    _temp: TempDir,
    pub qml: PathBuf,
    pub project: PathBuf,
    pub output: PathBuf,
}

impl Workspace {
    pub fn new() -> Self {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path().canonicalize().unwrap();
        let qml = root.join("Qt/5.15.2/gcc_64/qml");
        let project = root.join("app");
        let output = root.join("dist");
        fs::create_dir_all(&qml).unwrap();
        fs::create_dir_all(&project).unwrap();
        fs::create_dir_all(&output).unwrap();

        Self {
            _temp: temp,
            qml,
            project,
            output,
        }
    }

    /// Write a file below the module root, creating parents.
    pub fn qt_file(&self, rel: &str, content: &str) -> PathBuf {
        write(&self.qml.join(rel), content)
    }

    /// Create an empty module directory below the module root.
    pub fn qt_dir(&self, rel: &str) -> PathBuf {
        let dir = self.qml.join(rel);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    /// Write a file below the project's `res` directory.
    pub fn res_file(&self, rel: &str, content: &str) -> PathBuf {
        write(&self.project.join("res").join(rel), content)
    }

    pub fn config(&self, target_os: &str) -> DeployConfig {
        DeployConfig {
            module_root: Some(self.qml.clone()),
            project_dir: self.project.clone(),
            output_dir: Some(self.output.clone()),
            target_os: Some(target_os.to_string()),
            ..Default::default()
        }
    }
}

fn write(path: &Path, content: &str) -> PathBuf {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
    path.to_path_buf()
}
