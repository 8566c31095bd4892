// src/closure.rs

//! Transitive module closure
//!
//! Starting from the project's resource directory, every resolved module
//! directory is scanned in turn for further imports until nothing new turns
//! up. Each directory is scanned at most once, which also makes cyclic
//! imports between modules harmless.

use crate::error::Result;
use crate::probe::{canonical_dir, ModuleProber};
use crate::scanner::ProjectScanner;
use std::collections::{BTreeSet, HashSet, VecDeque};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Default name of the project's resource directory
pub const DEFAULT_RESOURCE_DIR: &str = "res";

/// Every module directory a project transitively requires
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyClosure {
    /// Resolved module directories
    pub modules: BTreeSet<PathBuf>,
    /// Directories in the order they were scanned (seeds included)
    pub visited: Vec<PathBuf>,
}

impl DependencyClosure {
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }
}

/// Breadth-first closure computation over the implicit module graph
pub struct ClosureBuilder<'a> {
    prober: &'a ModuleProber,
    scanner: &'a ProjectScanner,
}

impl<'a> ClosureBuilder<'a> {
    pub fn new(prober: &'a ModuleProber, scanner: &'a ProjectScanner) -> Self {
        Self { prober, scanner }
    }

    /// Compute the closure reachable from `seeds`
    ///
    /// Unresolvable references are skipped. A scan failure on any queued
    /// directory aborts the whole computation.
    pub fn build(&self, seeds: &[PathBuf]) -> Result<DependencyClosure> {
        let mut closure = DependencyClosure::default();
        let mut queued: HashSet<PathBuf> = HashSet::new();
        let mut visited: HashSet<PathBuf> = HashSet::new();
        let mut queue: VecDeque<PathBuf> = VecDeque::new();

        for seed in seeds {
            if queued.insert(seed.clone()) {
                queue.push_back(seed.clone());
            }
        }

        while let Some(dir) = queue.pop_front() {
            if !visited.insert(dir.clone()) {
                continue;
            }

            let refs = self.scanner.scan(&dir)?;
            closure.visited.push(dir);

            for module in &refs {
                let Some(found) = self.prober.probe(module) else {
                    continue;
                };
                closure.modules.insert(found.clone());
                if queued.insert(found.clone()) {
                    debug!("Queued {}", found.display());
                    queue.push_back(found);
                }
            }
        }

        info!(
            "Dependency closure: {} module directories after scanning {} directories",
            closure.modules.len(),
            closure.visited.len()
        );
        Ok(closure)
    }
}

/// Initial directories to scan for a project
///
/// Returns the canonicalized resource directory, or nothing when the project
/// has none.
pub fn seed_dirs(project_dir: &Path, resource_dir: &str) -> Result<Vec<PathBuf>> {
    let res = project_dir.join(resource_dir);
    if !res.is_dir() {
        debug!("No resource directory at {}", res.display());
        return Ok(Vec::new());
    }
    Ok(vec![canonical_dir(&res)?])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    struct Fixture {
        _temp: TempDir,
        project: PathBuf,
        prober: ModuleProber,
    }

    impl Fixture {
        fn new() -> Self {
            let temp = TempDir::new().unwrap();
            let project = temp.path().join("project");
            let qml = temp.path().join("qml");
            fs::create_dir_all(project.join("res")).unwrap();
            fs::create_dir_all(&qml).unwrap();
            let prober = ModuleProber::new(&qml).unwrap();
            Self {
                _temp: temp,
                project,
                prober,
            }
        }

        fn module(&self, rel: &str, qml_content: Option<&str>) -> PathBuf {
            let dir = self.prober.root().join(rel);
            fs::create_dir_all(&dir).unwrap();
            if let Some(content) = qml_content {
                fs::write(dir.join("Module.qml"), content).unwrap();
            }
            dir
        }

        fn source(&self, name: &str, content: &str) {
            fs::write(self.project.join("res").join(name), content).unwrap();
        }

        fn build(&self) -> DependencyClosure {
            let scanner = ProjectScanner::default();
            let seeds = seed_dirs(&self.project, DEFAULT_RESOURCE_DIR).unwrap();
            ClosureBuilder::new(&self.prober, &scanner)
                .build(&seeds)
                .unwrap()
        }
    }

    #[test]
    fn test_transitive_discovery() {
        let fx = Fixture::new();
        let quick = fx.module("QtQuick.2", None);
        let controls = fx.module("QtQuick/Controls.2", Some("import QtQuick.Templates 2.0\n"));
        let templates = fx.module("QtQuick/Templates.2", Some("import QtQuick 2.0\n"));
        fx.source("main.qml", "import QtQuick 2.0\nimport QtQuick.Controls 2.0\n");

        let closure = fx.build();
        let expected: BTreeSet<PathBuf> = [quick, controls, templates].into_iter().collect();
        assert_eq!(closure.modules, expected);
    }

    #[test]
    fn test_unresolved_references_skipped() {
        let fx = Fixture::new();
        let quick = fx.module("QtQuick.2", None);
        fx.source("main.qml", "import QtQuick 2.0\nimport QtMissing 1.0\n");

        let closure = fx.build();
        assert_eq!(closure.modules.into_iter().collect::<Vec<_>>(), vec![quick]);
    }

    #[test]
    fn test_cycle_terminates_and_visits_once() {
        let fx = Fixture::new();
        fx.module("QtA", Some("import QtB 1.0\n"));
        fx.module("QtB", Some("import QtA 1.0\nimport QtC 1.0\n"));
        fx.module("QtC", Some("import QtA 1.0\nimport QtB 1.0\n"));
        fx.source("main.qml", "import QtA 1.0\n");
        fx.source("other.qml", "import QtB 1.0\nimport QtC 1.0\n");

        let closure = fx.build();
        assert_eq!(closure.len(), 3);

        // seed + three modules, each exactly once
        assert_eq!(closure.visited.len(), 4);
        let unique: HashSet<&PathBuf> = closure.visited.iter().collect();
        assert_eq!(unique.len(), closure.visited.len());
    }

    #[test]
    fn test_idempotent() {
        let fx = Fixture::new();
        fx.module("QtQuick.2", Some("import QtQml 2.0\n"));
        fx.module("QtQml", None);
        fx.source("main.qml", "import QtQuick 2.0\n");

        let first = fx.build();
        let second = fx.build();
        assert_eq!(first.modules, second.modules);
    }

    #[test]
    fn test_seed_excluded_from_closure() {
        let fx = Fixture::new();
        fx.source("main.qml", "import QtMissing 1.0\n");

        let closure = fx.build();
        assert!(closure.is_empty());
        assert_eq!(closure.visited.len(), 1);
    }

    #[test]
    fn test_no_resource_dir() {
        let temp = TempDir::new().unwrap();
        let seeds = seed_dirs(temp.path(), DEFAULT_RESOURCE_DIR).unwrap();
        assert!(seeds.is_empty());

        let prober = ModuleProber::new(temp.path()).unwrap();
        let scanner = ProjectScanner::default();
        let closure = ClosureBuilder::new(&prober, &scanner).build(&seeds).unwrap();
        assert!(closure.is_empty());
        assert!(closure.visited.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_file_in_discovered_module_aborts() {
        let fx = Fixture::new();
        let quick = fx.module("QtQuick.2", None);
        std::os::unix::fs::symlink(quick.join("missing.qml"), quick.join("Foo.qml")).unwrap();
        fx.source("main.qml", "import QtQuick 2.0\n");

        let scanner = ProjectScanner::default();
        let seeds = seed_dirs(&fx.project, DEFAULT_RESOURCE_DIR).unwrap();
        let result = ClosureBuilder::new(&fx.prober, &scanner).build(&seeds);
        match result {
            Err(crate::Error::Read { path, .. }) => assert_eq!(path, quick.join("Foo.qml")),
            other => panic!("expected read error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_seed_is_an_error() {
        let temp = TempDir::new().unwrap();
        let prober = ModuleProber::new(temp.path()).unwrap();
        let scanner = ProjectScanner::default();
        let result =
            ClosureBuilder::new(&prober, &scanner).build(&[temp.path().join("gone")]);
        assert!(matches!(result, Err(crate::Error::MissingSourceRoot(_))));
    }
}
