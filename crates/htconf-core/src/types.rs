//! Core types shared across the conversion pipeline.

use std::path::{Path, PathBuf};

/// A discovered `.htaccess` file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HtaccessFile {
    path: PathBuf,
}

impl HtaccessFile {
    /// Wraps an absolute path to a `.htaccess` file.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path of the file itself.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the directory the file applies to.
    #[must_use]
    pub fn directory(&self) -> &Path {
        self.path.parent().unwrap_or(&self.path)
    }

    /// Returns the number of path segments, used for shallow-first ordering.
    #[must_use]
    pub fn depth(&self) -> usize {
        crate::order::depth(&self.path)
    }
}

/// A line flagged by a [`DirectiveRule`](crate::DirectiveRule).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    /// Rule code (e.g., "HT001").
    pub code: &'static str,
    /// Directive name as configured (e.g., "RedirectBase").
    pub directive: String,
    /// File containing the flagged line.
    pub file: PathBuf,
    /// Line number (1-indexed).
    pub line: usize,
}

impl Finding {
    /// Returns the comment written below the flagged line, without a terminator.
    #[must_use]
    pub fn comment(&self) -> String {
        format!(
            "# WARNING The above line contains {} which may not convert directly to a conf file. Please check manually",
            self.directive
        )
    }
}

/// Outcome of a conversion run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionSummary {
    /// Number of `<Directory>` blocks written.
    pub files_rendered: usize,
    /// Every flagged line, in output order.
    pub findings: Vec<Finding>,
}

impl ConversionSummary {
    /// Creates an empty summary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of warnings, one per flagged directive occurrence.
    #[must_use]
    pub fn warnings(&self) -> usize {
        self.findings.len()
    }

    /// Returns `true` if any line was flagged.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.findings.is_empty()
    }
}
