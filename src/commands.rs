// src/commands.rs

//! Command handlers for the qmlstage CLI

use crate::cli::ProjectArgs;
use anyhow::{Context, Result};
use qmlstage::config::{self, ConfigOverrides, DeployConfig, DEFAULT_CONFIG_NAME};
use std::path::PathBuf;
use tracing::info;

/// Build the effective config from the profile file and flags
fn load_config(args: &ProjectArgs, overrides: ConfigOverrides) -> Result<DeployConfig> {
    let implicit = args
        .project
        .clone()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_CONFIG_NAME);

    let mut config = match &args.config {
        Some(path) => config::load_config(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None if implicit.is_file() => {
            info!("Using profile {}", implicit.display());
            config::load_config(&implicit)
                .with_context(|| format!("Failed to load {}", implicit.display()))?
        }
        None => DeployConfig::default(),
    };

    config.merge_overrides(ConfigOverrides {
        module_root: args.qml_dir.clone(),
        project_dir: args.project.clone(),
        target_os: args.os.clone(),
        ..overrides
    });
    Ok(config)
}

/// Stage the project's QML dependencies
pub fn cmd_deploy(args: &ProjectArgs, output: Option<PathBuf>, parallel: bool) -> Result<()> {
    let config = load_config(
        args,
        ConfigOverrides {
            output_dir: output,
            parallel,
            ..Default::default()
        },
    )?;

    let report = qmlstage::deploy(&config)?;

    println!(
        "Staged {} QML module(s): {} files copied, {} skipped",
        report.directories.len(),
        report.files_copied,
        report.files_skipped
    );
    for dir in &report.directories {
        println!("  {}", dir.display());
    }
    Ok(())
}

/// Print the project's QML dependencies
pub fn cmd_deps(args: &ProjectArgs, absolute: bool, all: bool) -> Result<()> {
    let config = load_config(args, ConfigOverrides::default())?;
    let resolution = qmlstage::resolve(&config)?;

    let dirs: Vec<&PathBuf> = if all {
        resolution.closure.modules.iter().collect()
    } else {
        resolution.reduced.iter().collect()
    };

    if dirs.is_empty() {
        println!("No QML modules required.");
        return Ok(());
    }

    for dir in dirs {
        let shown = if absolute {
            dir.as_path()
        } else {
            dir.strip_prefix(&resolution.module_root).unwrap_or(dir.as_path())
        };
        println!("{}", shown.display());
    }
    Ok(())
}
