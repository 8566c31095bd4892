// src/config.rs

//! Deployment profile
//!
//! Settings can come from a `qmlstage.toml` file, from command-line flags, or
//! both; flags win over the file.
//!
//! # Example qmlstage.toml
//!
//! ```toml
//! [deploy]
//! module_root = "/opt/Qt/5.15.2/gcc_64/qml"
//! project_dir = "."
//! output_dir = "dist"
//! target_os = "linux"
//!
//! # Optional, shown with their defaults
//! resource_dir = "res"
//! markup_extension = "qml"
//! qml_subdir = "qml"
//! skip_extensions = ["qmlc", "jsc"]
//! parallel = false
//! ```

use crate::closure::DEFAULT_RESOURCE_DIR;
use crate::scanner::DEFAULT_MARKUP_EXTENSION;
use crate::stage::{Platform, StageFilter, DEFAULT_QML_SUBDIR, DEFAULT_SKIP_EXTENSIONS};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default profile file name
pub const DEFAULT_CONFIG_NAME: &str = "qmlstage.toml";

/// Errors that can occur when loading a deployment profile
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", .path.display())]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing required setting: {0}")]
    MissingField(&'static str),

    #[error("Invalid setting {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Result type for config operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ProfileFile {
    #[serde(default)]
    deploy: DeployConfig,
}

/// Settings for one resolve/deploy run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeployConfig {
    /// Qt QML module-library root (e.g. `<qt>/qml`)
    #[serde(default)]
    pub module_root: Option<PathBuf>,

    /// Project root containing the resource directory
    #[serde(default = "default_project_dir")]
    pub project_dir: PathBuf,

    /// Output directory; required for deploy only
    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    /// Target OS identity; the host OS when unset
    #[serde(default)]
    pub target_os: Option<String>,

    #[serde(default = "default_resource_dir")]
    pub resource_dir: String,

    /// Markup file extension, without the dot
    #[serde(default = "default_markup_extension")]
    pub markup_extension: String,

    #[serde(default = "default_qml_subdir")]
    pub qml_subdir: String,

    /// Extensions of files never staged, without the dot
    #[serde(default = "default_skip_extensions")]
    pub skip_extensions: Vec<String>,

    /// Copy module trees in parallel
    #[serde(default)]
    pub parallel: bool,
}

fn default_project_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_resource_dir() -> String {
    DEFAULT_RESOURCE_DIR.to_string()
}

fn default_markup_extension() -> String {
    DEFAULT_MARKUP_EXTENSION.to_string()
}

fn default_qml_subdir() -> String {
    DEFAULT_QML_SUBDIR.to_string()
}

fn default_skip_extensions() -> Vec<String> {
    DEFAULT_SKIP_EXTENSIONS.iter().map(|s| s.to_string()).collect()
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            module_root: None,
            project_dir: default_project_dir(),
            output_dir: None,
            target_os: None,
            resource_dir: default_resource_dir(),
            markup_extension: default_markup_extension(),
            qml_subdir: default_qml_subdir(),
            skip_extensions: default_skip_extensions(),
            parallel: false,
        }
    }
}

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub module_root: Option<PathBuf>,
    pub project_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub target_os: Option<String>,
    pub parallel: bool,
}

impl DeployConfig {
    /// Apply command-line values on top of this config
    pub fn merge_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(root) = overrides.module_root {
            self.module_root = Some(root);
        }
        if let Some(project) = overrides.project_dir {
            self.project_dir = project;
        }
        if let Some(output) = overrides.output_dir {
            self.output_dir = Some(output);
        }
        if let Some(os) = overrides.target_os {
            self.target_os = Some(os);
        }
        self.parallel |= overrides.parallel;
    }

    /// Check settings that serde cannot
    pub fn validate(&self) -> ConfigResult<()> {
        for (field, value) in [
            ("markup_extension", &self.markup_extension),
            ("qml_subdir", &self.qml_subdir),
            ("resource_dir", &self.resource_dir),
        ] {
            if value.is_empty() {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must not be empty".to_string(),
                });
            }
        }

        if self.markup_extension.starts_with('.') {
            return Err(ConfigError::Invalid {
                field: "markup_extension",
                reason: format!("'{}' must not start with a dot", self.markup_extension),
            });
        }
        if let Some(ext) = self.skip_extensions.iter().find(|e| e.is_empty() || e.starts_with('.')) {
            return Err(ConfigError::Invalid {
                field: "skip_extensions",
                reason: format!("'{}' must be a non-empty extension without a dot", ext),
            });
        }

        Ok(())
    }

    pub fn module_root(&self) -> ConfigResult<&Path> {
        self.module_root
            .as_deref()
            .ok_or(ConfigError::MissingField("module_root"))
    }

    pub fn output_dir(&self) -> ConfigResult<&Path> {
        self.output_dir
            .as_deref()
            .ok_or(ConfigError::MissingField("output_dir"))
    }

    /// Target platform, defaulting to the host
    pub fn platform(&self) -> Platform {
        self.target_os
            .as_deref()
            .map(Platform::from_os)
            .unwrap_or_else(Platform::host)
    }

    /// File filter for staging on the target platform
    pub fn stage_filter(&self) -> StageFilter {
        StageFilter::new(self.skip_extensions.clone(), self.platform().debug_library_rule())
    }
}

/// Load a deployment profile from a TOML file
pub fn load_config(path: &Path) -> ConfigResult<DeployConfig> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config_string(&content)
}

/// Parse a deployment profile from a TOML string
pub fn parse_config_string(content: &str) -> ConfigResult<DeployConfig> {
    let profile: ProfileFile = toml::from_str(content)?;
    profile.deploy.validate()?;
    Ok(profile.deploy)
}
