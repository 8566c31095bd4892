// src/probe.rs

//! Module directory probing
//!
//! Qt does not ship a manifest mapping module names to directories. A module
//! `QtQuick.Controls 2` may live at `QtQuick/Controls.2`, `QtQuick.2/Controls`
//! or plain `QtQuick/Controls` depending on the Qt release. The prober tries
//! each layout hypothesis in a fixed order and takes the first that exists.

use crate::error::{Error, Result};
use crate::imports::ModuleRef;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One hypothesis about where a module lives relative to the module root
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// `.<major>` appended to the segment at this index, others bare
    Versioned(usize),
    /// All segments bare
    Unversioned,
}

impl Layout {
    /// Layouts to try for a name with `segment_count` segments, in order
    ///
    /// The last segment is versioned first since that is the layout Qt uses
    /// most; the unversioned layout is the final fallback.
    pub fn candidates(segment_count: usize) -> Vec<Layout> {
        (0..segment_count)
            .rev()
            .map(Layout::Versioned)
            .chain(std::iter::once(Layout::Unversioned))
            .collect()
    }

    /// Relative directory this layout produces for `module`
    pub fn relative_path(&self, module: &ModuleRef) -> PathBuf {
        module
            .segments()
            .into_iter()
            .enumerate()
            .map(|(i, segment)| match self {
                Layout::Versioned(index) if *index == i => {
                    format!("{}.{}", segment, module.major)
                }
                _ => segment.to_string(),
            })
            .collect()
    }
}

/// Resolves module references to directories under the QML module root
#[derive(Debug, Clone)]
pub struct ModuleProber {
    root: PathBuf,
}

impl ModuleProber {
    /// Create a prober for the given module root
    ///
    /// The root is canonicalized once so every path handed out is normalized.
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(Error::MissingModuleRoot(root.to_path_buf()));
        }
        Ok(Self {
            root: canonical_dir(root)?,
        })
    }

    /// The normalized module root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Find the directory hosting `module`, if it is available locally
    pub fn probe(&self, module: &ModuleRef) -> Option<PathBuf> {
        let segments = module.segments();
        if !segments.iter().all(|s| is_plain_segment(s)) {
            debug!("Ignoring malformed module name: {}", module.name);
            return None;
        }

        let found = Layout::candidates(segments.len())
            .into_iter()
            .map(|layout| self.root.join(layout.relative_path(module)))
            .find(|candidate| candidate.is_dir());

        match &found {
            Some(dir) => debug!("Resolved {} -> {}", module, dir.display()),
            None => debug!("Module {} not found under {}", module, self.root.display()),
        }
        found
    }
}

fn is_plain_segment(segment: &str) -> bool {
    !segment.is_empty() && !segment.contains(['/', '\\'])
}

/// Canonicalize `path`, naming it in the error
pub(crate) fn canonical_dir(path: &Path) -> Result<PathBuf> {
    path.canonicalize().map_err(|source| Error::Canonicalize {
        path: path.to_path_buf(),
        source,
    })
}
