// src/cli.rs
//! CLI definitions for qmlstage
//!
//! The actual command implementations are in the `commands` module.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "qmlstage")]
#[command(author = "qmlstage Contributors")]
#[command(version)]
#[command(about = "Stage the Qt QML modules a project depends on", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Inputs shared by every command
#[derive(Args, Debug, Clone)]
pub struct ProjectArgs {
    /// Deployment profile (default: qmlstage.toml in the project directory, if present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Qt QML module root, e.g. /opt/Qt/5.15.2/gcc_64/qml
    #[arg(short, long)]
    pub qml_dir: Option<PathBuf>,

    /// Project root containing the `res` directory
    #[arg(short, long)]
    pub project: Option<PathBuf>,

    /// Target OS (windows, darwin, linux, ...); defaults to the host
    #[arg(long)]
    pub os: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Copy every QML module the project needs into the output directory
    Deploy {
        #[command(flatten)]
        project: ProjectArgs,

        /// Output directory (must already exist)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Copy module trees in parallel
        #[arg(long)]
        parallel: bool,
    },

    /// List the QML module directories the project needs
    Deps {
        #[command(flatten)]
        project: ProjectArgs,

        /// Print absolute paths instead of paths relative to the module root
        #[arg(long)]
        absolute: bool,

        /// Also list directories that are covered by an ancestor
        #[arg(long)]
        all: bool,
    },
}
