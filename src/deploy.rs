// src/deploy.rs

//! Resolve-and-stage pipeline
//!
//! Ties the pieces together: seed from the project's resource directory,
//! build the closure, reduce it, then stage the survivors.

use crate::closure::{seed_dirs, ClosureBuilder, DependencyClosure};
use crate::config::DeployConfig;
use crate::error::Result;
use crate::probe::ModuleProber;
use crate::reduce::reduce;
use crate::scanner::ProjectScanner;
use crate::stage::{StageReport, Stager};
use std::path::{Path, PathBuf};
use tracing::info;

/// Closure of a project and the reduced list of directories to copy
#[derive(Debug, Clone)]
pub struct Resolution {
    /// Normalized module root all paths are relative to
    pub module_root: PathBuf,
    pub closure: DependencyClosure,
    /// Top-level directories to stage
    pub reduced: Vec<PathBuf>,
}

impl Resolution {
    /// Reduced entries relative to the module root
    pub fn relative_modules(&self) -> Vec<&Path> {
        self.reduced
            .iter()
            .filter_map(|dir| dir.strip_prefix(&self.module_root).ok())
            .collect()
    }
}

/// Compute the reduced closure for the project described by `config`
pub fn resolve(config: &DeployConfig) -> Result<Resolution> {
    config.validate()?;
    let prober = ModuleProber::new(config.module_root()?)?;
    let scanner = ProjectScanner::new(config.markup_extension.as_str());

    info!(
        "Resolving QML dependencies of {} against {}",
        config.project_dir.display(),
        prober.root().display()
    );

    let seeds = seed_dirs(&config.project_dir, &config.resource_dir)?;
    let closure = ClosureBuilder::new(&prober, &scanner).build(&seeds)?;
    let reduced = reduce(&closure.modules);

    info!(
        "{} module directories required, {} after reduction",
        closure.len(),
        reduced.len()
    );

    Ok(Resolution {
        module_root: prober.root().to_path_buf(),
        closure,
        reduced,
    })
}

/// Resolve the project's dependencies and stage them into the output directory
///
/// Either every module is staged or the first error is returned; output
/// already written before a failure is left in place.
pub fn deploy(config: &DeployConfig) -> Result<StageReport> {
    let output_dir = config.output_dir()?;
    let resolution = resolve(config)?;

    let platform = config.platform();
    info!("Staging for target platform {}", platform);

    Stager::new(&resolution.module_root, output_dir, &platform, &config.qml_subdir)
        .with_filter(config.stage_filter())
        .with_parallel(config.parallel)
        .stage(&resolution.reduced)
}
