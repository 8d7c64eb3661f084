//! Filtered discovery of `.htaccess` files.

use crate::types::HtaccessFile;

use std::path::Path;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// File name the walker looks for.
pub const HTACCESS_FILE_NAME: &str = ".htaccess";

/// Version-control directories skipped by default.
pub const DEFAULT_FILTERS: &[&str] = &[".svn", ".cvs", ".git"];

/// Ordered list of path substrings to exclude.
///
/// A path is excluded if any filter occurs anywhere in its full string form.
/// Filters are matched case-sensitively and are never deduplicated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSet {
    filters: Vec<String>,
}

impl Default for FilterSet {
    fn default() -> Self {
        Self {
            filters: DEFAULT_FILTERS.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

impl FilterSet {
    /// Creates a filter set without the default version-control filters.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// Appends a filter.
    ///
    /// An empty filter matches every path.
    pub fn push(&mut self, filter: impl Into<String>) {
        let filter = filter.into();
        if filter.is_empty() {
            warn!("Empty exclude filter excludes every path");
        }
        self.filters.push(filter);
    }

    /// Returns `true` if the path contains any filter substring.
    #[must_use]
    pub fn excludes(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();
        self.filters.iter().any(|f| path_str.contains(f.as_str()))
    }

    /// Iterates over the filters in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.filters.iter().map(String::as_str)
    }

    /// Returns the number of filters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Returns `true` if there are no filters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl<S: Into<String>> Extend<S> for FilterSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for filter in iter {
            self.push(filter);
        }
    }
}

/// Returns `true` if the final path component is exactly `.htaccess`.
#[must_use]
pub fn is_htaccess(path: &Path) -> bool {
    path.file_name().is_some_and(|name| name == HTACCESS_FILE_NAME)
}

/// Lazily walks `root`, yielding every `.htaccess` file not excluded by `filters`.
///
/// Entries come back in file-name order within each directory. Excluded
/// directories are pruned rather than descended into, which is equivalent
/// since every descendant path contains the directory's path. Unreadable
/// entries and symlink loops are logged and skipped.
pub fn walk<'a>(
    root: &Path,
    filters: &'a FilterSet,
    follow_links: bool,
) -> impl Iterator<Item = HtaccessFile> + 'a {
    WalkDir::new(root)
        .follow_links(follow_links)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(move |entry| {
            let excluded = filters.excludes(entry.path());
            if excluded {
                debug!("Excluding: {}", entry.path().display());
            }
            !excluded
        })
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!("Skipping entry: {err}");
                None
            }
        })
        .filter(|entry| !entry.file_type().is_dir() && is_htaccess(entry.path()))
        .map(|entry| HtaccessFile::new(entry.into_path()))
}
