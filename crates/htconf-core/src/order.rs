//! Shallow-first ordering of discovered files.
//!
//! Apache applies `<Directory>` sections from the shortest path to the
//! longest, so emitting shallow blocks first keeps the generated config
//! readable in the same order the server merges it.

use crate::types::HtaccessFile;
use std::path::Path;

/// Number of segments in a path.
#[must_use]
pub fn depth(path: &Path) -> usize {
    path.components().count()
}

/// Sorts files by ascending depth. Files of equal depth keep their discovery order.
pub fn sort_by_depth(files: &mut [HtaccessFile]) {
    files.sort_by_key(HtaccessFile::depth);
}
