// src/reduce.rs

//! Ancestor reduction for the dependency closure
//!
//! Copying a directory copies everything beneath it, so any closure entry
//! that lives inside another entry is dropped before staging.

use std::collections::BTreeSet;
use std::path::PathBuf;

/// Drop every path that has a proper ancestor in `closure`
///
/// Ancestry is decided component by component, so `qml/QtQuick` does not
/// shadow `qml/QtQuick.2` or `qml/QtQuickExtras`. The result is sorted.
///
/// # Examples
///
/// ```
/// use qmlstage::reduce::reduce;
/// use std::collections::BTreeSet;
/// use std::path::PathBuf;
///
/// let closure: BTreeSet<PathBuf> = ["/qml/QtQuick", "/qml/QtQuick/Controls.2", "/qml/QtQuick.2"]
///     .into_iter()
///     .map(PathBuf::from)
///     .collect();
/// assert_eq!(
///     reduce(&closure),
///     vec![PathBuf::from("/qml/QtQuick"), PathBuf::from("/qml/QtQuick.2")]
/// );
/// ```
pub fn reduce(closure: &BTreeSet<PathBuf>) -> Vec<PathBuf> {
    closure
        .iter()
        .filter(|path| !path.ancestors().skip(1).any(|a| closure.contains(a)))
        .cloned()
        .collect()
}
