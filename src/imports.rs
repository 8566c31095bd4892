// src/imports.rs

//! QML import declaration extraction
//!
//! Recognises lines such as `import QtQuick.Controls 2.11` and yields the
//! module name together with its major version. Only Qt modules (names with
//! the `Qt` prefix) are considered; everything else in a file is ignored.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static IMPORT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^import\s+(Qt\S*)\s+(\d+)").unwrap());

/// A module referenced by an import declaration
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModuleRef {
    /// Dotted structural name, e.g. `QtQuick.Controls`
    pub name: String,
    /// Major version; minor and patch components are discarded
    pub major: u32,
}

impl ModuleRef {
    pub fn new(name: impl Into<String>, major: u32) -> Self {
        Self {
            name: name.into(),
            major,
        }
    }

    /// Dot-separated segments of the name
    pub fn segments(&self) -> Vec<&str> {
        self.name.split('.').collect()
    }
}

impl fmt::Display for ModuleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.major)
    }
}

/// Parse a single source line as an import declaration
///
/// Surrounding whitespace is trimmed first. Returns `None` for anything that
/// is not a versioned Qt import.
pub fn parse_import_line(line: &str) -> Option<ModuleRef> {
    let caps = IMPORT_RE.captures(line.trim())?;
    let name = caps.get(1)?.as_str();
    let major = caps.get(2)?.as_str().parse().ok()?;
    Some(ModuleRef::new(name, major))
}

/// Lazily extract every import declaration from the text of one file
///
/// # Examples
///
/// ```
/// use qmlstage::imports::{extract_imports, ModuleRef};
///
/// let text = "import QtQuick 2.0\nimport QtQuick.Controls 2.11\n\nItem {}\n";
/// let refs: Vec<_> = extract_imports(text).collect();
/// assert_eq!(refs, vec![
///     ModuleRef::new("QtQuick", 2),
///     ModuleRef::new("QtQuick.Controls", 2),
/// ]);
/// ```
pub fn extract_imports(text: &str) -> impl Iterator<Item = ModuleRef> + '_ {
    text.lines().filter_map(parse_import_line)
}
