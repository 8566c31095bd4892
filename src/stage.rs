// src/stage.rs

//! Selective staging of module directories
//!
//! Copies each reduced closure entry into the output tree at its path
//! relative to the QML module root. Compiled QML/JS caches are never copied,
//! and debug builds of plugin libraries are dropped when the release build
//! sits next to them.
//!
//! Layout of the output tree:
//! - Windows: `<output>/<relative>`
//! - everything else: `<output>/qml/<relative>`

use crate::error::{Error, Result};
use rayon::prelude::*;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info};
use walkdir::WalkDir;

/// Default name of the QML subdirectory in the output tree
pub const DEFAULT_QML_SUBDIR: &str = "qml";

/// Extensions of derived cache files that are never staged
pub const DEFAULT_SKIP_EXTENSIONS: &[&str] = &["qmlc", "jsc"];

/// Target platform of the deployment
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Platform {
    Windows,
    MacOs,
    Linux,
    Other(String),
}

impl Platform {
    /// Parse a target OS identity such as `windows`, `darwin` or `linux`
    pub fn from_os(os: &str) -> Self {
        match os.to_ascii_lowercase().as_str() {
            "windows" => Self::Windows,
            "darwin" | "macos" => Self::MacOs,
            "linux" => Self::Linux,
            other => Self::Other(other.to_string()),
        }
    }

    /// The platform this binary was built for
    pub fn host() -> Self {
        Self::from_os(std::env::consts::OS)
    }

    /// Whether modules go below a `qml` subdirectory of the output
    pub fn uses_qml_subdir(&self) -> bool {
        !matches!(self, Self::Windows)
    }

    /// Naming convention for debug builds of shared libraries, if any
    pub fn debug_library_rule(&self) -> Option<DebugLibraryRule> {
        match self {
            Self::Windows => Some(DebugLibraryRule {
                extension: "dll",
                suffixes: &["_d", "d"],
            }),
            Self::MacOs => Some(DebugLibraryRule {
                extension: "dylib",
                suffixes: &["_debug"],
            }),
            Self::Linux | Self::Other(_) => None,
        }
    }
}

impl FromStr for Platform {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::from_os(s))
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Windows => write!(f, "windows"),
            Self::MacOs => write!(f, "darwin"),
            Self::Linux => write!(f, "linux"),
            Self::Other(os) => write!(f, "{}", os),
        }
    }
}

/// How a platform marks debug builds of shared libraries
///
/// A debug library is `<stem><suffix>.<extension>`; its release counterpart
/// is `<stem>.<extension>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebugLibraryRule {
    /// Library extension without the dot
    pub extension: &'static str,
    /// Debug suffixes, tried in order
    pub suffixes: &'static [&'static str],
}

impl DebugLibraryRule {
    /// File name of the release counterpart of `file_name`
    ///
    /// The first suffix that matches decides, so `bar_d.dll` pairs only with
    /// `bar.dll`. `None` when `file_name` is not a debug library under this
    /// rule.
    pub fn release_counterpart(&self, file_name: &str) -> Option<String> {
        let stem = file_name
            .strip_suffix(self.extension)
            .and_then(|s| s.strip_suffix('.'))?;

        let base = self
            .suffixes
            .iter()
            .find_map(|suffix| stem.strip_suffix(suffix))?;
        if base.is_empty() {
            return None;
        }
        Some(format!("{}.{}", base, self.extension))
    }
}

/// Per-file inclusion predicate applied while copying
#[derive(Debug, Clone)]
pub struct StageFilter {
    skip_extensions: Vec<String>,
    debug_rule: Option<DebugLibraryRule>,
}

impl StageFilter {
    pub fn new(skip_extensions: Vec<String>, debug_rule: Option<DebugLibraryRule>) -> Self {
        Self {
            skip_extensions,
            debug_rule,
        }
    }

    /// Default filter for `platform`
    pub fn for_platform(platform: &Platform) -> Self {
        Self::new(
            DEFAULT_SKIP_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            platform.debug_library_rule(),
        )
    }

    /// Whether the file at `path` must not be staged
    pub fn should_skip(&self, path: &Path) -> bool {
        if let Some(ext) = path.extension().and_then(|e| e.to_str())
            && self.skip_extensions.iter().any(|s| s.eq_ignore_ascii_case(ext))
        {
            return true;
        }

        let (Some(rule), Some(name)) = (self.debug_rule, path.file_name().and_then(|n| n.to_str()))
        else {
            return false;
        };

        let Some(release) = rule.release_counterpart(name) else {
            return false;
        };
        if path.with_file_name(&release).is_file() {
            debug!("Skipping {} (release build {} present)", path.display(), release);
            return true;
        }
        debug!("Keeping debug library {} (no release build)", path.display());
        false
    }
}

/// What a staging run produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageReport {
    /// Destination directory of each staged module
    pub directories: Vec<PathBuf>,
    pub files_copied: usize,
    pub files_skipped: usize,
    pub bytes_copied: u64,
}

impl StageReport {
    fn merge(mut self, other: StageReport) -> Self {
        self.directories.extend(other.directories);
        self.files_copied += other.files_copied;
        self.files_skipped += other.files_skipped;
        self.bytes_copied += other.bytes_copied;
        self
    }
}

/// Copies module directories into the output tree
#[derive(Debug, Clone)]
pub struct Stager {
    module_root: PathBuf,
    dest_root: PathBuf,
    filter: StageFilter,
    parallel: bool,
}

impl Stager {
    /// Create a stager for `platform` with the default filter
    pub fn new(
        module_root: impl Into<PathBuf>,
        output_dir: impl AsRef<Path>,
        platform: &Platform,
        qml_subdir: &str,
    ) -> Self {
        let output_dir = output_dir.as_ref();
        let dest_root = if platform.uses_qml_subdir() {
            output_dir.join(qml_subdir)
        } else {
            output_dir.to_path_buf()
        };

        Self {
            module_root: module_root.into(),
            dest_root,
            filter: StageFilter::for_platform(platform),
            parallel: false,
        }
    }

    pub fn with_filter(mut self, filter: StageFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Copy entries concurrently; they must be disjoint subtrees
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Directory the modules are staged into
    pub fn dest_root(&self) -> &Path {
        &self.dest_root
    }

    /// Output location for `module_dir`
    pub fn destination_for(&self, module_dir: &Path) -> Result<PathBuf> {
        let relative = module_dir
            .strip_prefix(&self.module_root)
            .map_err(|_| Error::OutsideModuleRoot {
                path: module_dir.to_path_buf(),
                root: self.module_root.clone(),
            })?;
        Ok(self.dest_root.join(relative))
    }

    /// Stage every directory in `dirs`
    ///
    /// Stops at the first failure; whatever was already written stays.
    pub fn stage(&self, dirs: &[PathBuf]) -> Result<StageReport> {
        let reports: Vec<StageReport> = if self.parallel {
            dirs.par_iter()
                .map(|dir| self.stage_one(dir))
                .collect::<Result<_>>()?
        } else {
            dirs.iter()
                .map(|dir| self.stage_one(dir))
                .collect::<Result<_>>()?
        };

        let report = reports
            .into_iter()
            .fold(StageReport::default(), StageReport::merge);
        info!(
            "Staged {} modules into {} ({} files, {} bytes, {} skipped)",
            report.directories.len(),
            self.dest_root.display(),
            report.files_copied,
            report.bytes_copied,
            report.files_skipped
        );
        Ok(report)
    }

    fn stage_one(&self, module_dir: &Path) -> Result<StageReport> {
        let dest = self.destination_for(module_dir)?;
        debug!("Staging {} -> {}", module_dir.display(), dest.display());

        let mut report = copy_tree(module_dir, &dest, &self.filter)?;
        report.directories.push(dest);
        Ok(report)
    }
}

/// Recursively copy `src` to `dst`, leaving out files the filter rejects
///
/// Symlinks are followed, so the copy contains regular files only.
fn copy_tree(src: &Path, dst: &Path, filter: &StageFilter) -> Result<StageReport> {
    let mut report = StageReport::default();

    for entry in WalkDir::new(src).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|source| Error::Walk {
            path: src.to_path_buf(),
            source,
        })?;
        let Ok(relative) = entry.path().strip_prefix(src) else {
            continue;
        };
        let target = dst.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|source| Error::Copy {
                from: entry.path().to_path_buf(),
                to: target.clone(),
                source,
            })?;
            continue;
        }

        if filter.should_skip(entry.path()) {
            report.files_skipped += 1;
            continue;
        }

        let bytes = fs::copy(entry.path(), &target).map_err(|source| Error::Copy {
            from: entry.path().to_path_buf(),
            to: target.clone(),
            source,
        })?;
        report.files_copied += 1;
        report.bytes_copied += bytes;
    }

    Ok(report)
}
