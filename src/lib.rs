// src/lib.rs

//! qmlstage
//!
//! Resolves the Qt QML modules a project imports, directly or through other
//! modules, and stages exactly those module directories for standalone
//! distribution.
//!
//! # Pipeline
//!
//! - `imports`: pull `import QtFoo.Bar 2.x` declarations out of a file
//! - `probe`: map a module name and major version to a directory under the Qt `qml` root
//! - `scanner`: collect the imports of every `.qml` file below a directory
//! - `closure`: breadth-first expansion until no new module directory appears
//! - `reduce`: drop entries already covered by an ancestor entry
//! - `stage`: copy the survivors, minus caches and redundant debug libraries
//!
//! Nothing is cached between runs; every call recomputes the closure.

pub mod closure;
pub mod config;
pub mod deploy;
mod error;
pub mod imports;
pub mod probe;
pub mod reduce;
pub mod scanner;
pub mod stage;

pub use closure::{ClosureBuilder, DependencyClosure};
pub use config::{ConfigError, DeployConfig};
pub use deploy::{deploy, resolve, Resolution};
pub use error::{Error, Result};
pub use imports::{extract_imports, ModuleRef};
pub use probe::{Layout, ModuleProber};
pub use scanner::ProjectScanner;
pub use stage::{Platform, StageFilter, StageReport, Stager};
