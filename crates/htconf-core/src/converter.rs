//! Converter orchestrating discovery, ordering, rendering and the summary.

use crate::config::Config;
use crate::order::sort_by_depth;
use crate::render::RenderedBlock;
use crate::rule::{FlaggedDirective, RedirectBase, RuleBox};
use crate::summary::write_summary;
use crate::types::{ConversionSummary, HtaccessFile};
use crate::walker::{walk, FilterSet};

use miette::Diagnostic;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Errors that stop a conversion.
#[derive(Debug, Error, Diagnostic)]
pub enum ConvertError {
    /// The start directory does not exist.
    #[error("The given path '{path}' doesn't exist.")]
    #[diagnostic(code(htconf::invalid_root))]
    InvalidRootPath {
        /// Path as supplied by the caller.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },

    /// Traversal and filtering found nothing to convert.
    #[error("No .htaccess files found")]
    #[diagnostic(
        code(htconf::no_matching_files),
        help("check the start directory and the exclude filters")
    )]
    NoMatchingFiles {
        /// Resolved start directory.
        root: PathBuf,
    },

    /// A discovered file could not be read.
    #[error("Failed to read {path}: {source}")]
    #[diagnostic(code(htconf::read))]
    Read {
        /// File that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },

    /// Writing the generated configuration failed.
    #[error("Failed to write output: {0}")]
    #[diagnostic(code(htconf::write))]
    Write(#[from] io::Error),
}

/// Builder for configuring a [`Converter`].
#[derive(Default)]
pub struct ConverterBuilder {
    root: Option<PathBuf>,
    exclude_patterns: Vec<String>,
    directives: Vec<String>,
    follow_links: Option<bool>,
    config: Option<Config>,
}

impl ConverterBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the directory to start from.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Adds an exclude substring.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Adds multiple exclude substrings.
    #[must_use]
    pub fn excludes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_patterns
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Adds a directive to flag in addition to `RedirectBase`.
    #[must_use]
    pub fn directive(mut self, name: impl Into<String>) -> Self {
        self.directives.push(name.into());
        self
    }

    /// Sets whether symbolic links are followed while walking.
    #[must_use]
    pub fn follow_links(mut self, follow: bool) -> Self {
        self.follow_links = Some(follow);
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Builds the converter.
    ///
    /// Builder values take precedence over the configuration; exclude
    /// patterns and directives from both are combined, configuration first.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::InvalidRootPath`] if the start directory
    /// cannot be resolved.
    pub fn build(self) -> Result<Converter, ConvertError> {
        let config = self.config.unwrap_or_default();

        let requested = self
            .root
            .or_else(|| config.walker.root.clone())
            .unwrap_or_else(|| PathBuf::from("."));

        let root = std::fs::canonicalize(&requested).map_err(|source| {
            ConvertError::InvalidRootPath {
                path: requested.clone(),
                source,
            }
        })?;

        let mut filters = FilterSet::default();
        filters.extend(config.walker.exclude);
        filters.extend(self.exclude_patterns);

        // Directive names are case-insensitive; one rule per name
        let mut rules: Vec<RuleBox> = vec![Box::new(RedirectBase::new())];
        for name in config.lint.directives.into_iter().chain(self.directives) {
            if rules
                .iter()
                .any(|rule| rule.directive().eq_ignore_ascii_case(&name))
            {
                debug!("Skipping duplicate directive: {name}");
                continue;
            }
            rules.push(Box::new(FlaggedDirective::new(name)));
        }

        Ok(Converter {
            root,
            filters,
            rules,
            follow_links: self.follow_links.unwrap_or(config.walker.follow_links),
        })
    }
}

/// Converts every `.htaccess` file under a root into `<Directory>` blocks.
///
/// Use [`Converter::builder()`] to construct an instance.
pub struct Converter {
    root: PathBuf,
    filters: FilterSet,
    rules: Vec<RuleBox>,
    follow_links: bool,
}

impl Converter {
    /// Creates a new builder for configuring a converter.
    #[must_use]
    pub fn builder() -> ConverterBuilder {
        ConverterBuilder::new()
    }

    /// Returns the resolved start directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the active exclude filters.
    #[must_use]
    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    /// Returns the number of directive rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Finds all `.htaccess` files, shallowest first.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::NoMatchingFiles`] if nothing survives filtering.
    pub fn discover(&self) -> Result<Vec<HtaccessFile>, ConvertError> {
        info!("Searching {} for .htaccess files", self.root.display());

        let mut files: Vec<HtaccessFile> =
            walk(&self.root, &self.filters, self.follow_links).collect();

        if files.is_empty() {
            return Err(ConvertError::NoMatchingFiles {
                root: self.root.clone(),
            });
        }

        sort_by_depth(&mut files);
        info!("Found {} .htaccess files", files.len());

        Ok(files)
    }

    /// Discovers, renders and summarises in one pass.
    ///
    /// Nothing is written if discovery fails.
    ///
    /// # Errors
    ///
    /// Returns an error if discovery finds nothing, a file cannot be read,
    /// or writing fails.
    pub fn convert<W: Write>(&self, out: &mut W) -> Result<ConversionSummary, ConvertError> {
        let files = self.discover()?;
        self.render(&files, out)
    }

    /// Renders the given files in order, then the summary.
    ///
    /// Each file is read completely before its block is started, so a read
    /// failure never leaves a half-written block. Output is flushed after
    /// every block.
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be read or writing fails.
    pub fn render<W: Write>(
        &self,
        files: &[HtaccessFile],
        out: &mut W,
    ) -> Result<ConversionSummary, ConvertError> {
        let mut summary = ConversionSummary::new();

        for file in files {
            debug!("Rendering: {}", file.path().display());

            let contents = std::fs::read(file.path()).map_err(|source| ConvertError::Read {
                path: file.path().to_path_buf(),
                source,
            })?;
            let directory = std::fs::canonicalize(file.directory())
                .unwrap_or_else(|_| file.directory().to_path_buf());

            let block = RenderedBlock::build(&directory, file.path(), &contents, &self.rules);
            block.write_to(out)?;
            out.flush()?;

            let findings = block.findings();
            for finding in &findings {
                debug!(
                    "{} {}:{} contains {}",
                    finding.code,
                    finding.file.display(),
                    finding.line,
                    finding.directive
                );
            }
            summary.findings.extend(findings.into_iter().cloned());
            summary.files_rendered += 1;
        }

        write_summary(out, &summary)?;
        out.flush()?;

        info!(
            "Conversion complete: {} blocks, {} warnings",
            summary.files_rendered,
            summary.warnings()
        );

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_builder_resolves_root() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("site")).unwrap();

        let converter = Converter::builder()
            .root(tmp.path().join("site/../site/."))
            .build()
            .expect("Failed to build converter");

        assert!(converter.root().is_absolute());
        assert_eq!(
            converter.root(),
            fs::canonicalize(tmp.path().join("site")).unwrap()
        );
    }

    #[test]
    fn test_builder_rejects_missing_root() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope");

        let err = Converter::builder().root(&missing).build().err().unwrap();
        assert!(matches!(err, ConvertError::InvalidRootPath { ref path, .. } if *path == missing));
        assert!(err.to_string().contains("doesn't exist"));
    }

    #[test]
    fn test_filters_combine_defaults_config_and_builder() {
        let tmp = TempDir::new().unwrap();
        let mut config = Config::default();
        config.walker.exclude = vec!["cache".to_string()];

        let converter = Converter::builder()
            .root(tmp.path())
            .config(config)
            .exclude("vendor")
            .build()
            .unwrap();

        assert_eq!(
            converter.filters().iter().collect::<Vec<_>>(),
            vec![".svn", ".cvs", ".git", "cache", "vendor"]
        );
    }

    #[test]
    fn test_rules_combine_builtin_config_and_builder() {
        let tmp = TempDir::new().unwrap();
        let mut config = Config::default();
        config.lint.directives = vec!["RewriteBase".to_string()];

        let converter = Converter::builder()
            .root(tmp.path())
            .config(config)
            .directive("Options")
            .build()
            .unwrap();

        assert_eq!(converter.rule_count(), 3);
    }

    #[test]
    fn test_duplicate_directives_register_once() {
        let tmp = TempDir::new().unwrap();
        let mut config = Config::default();
        config.lint.directives = vec!["RewriteBase".to_string()];

        let converter = Converter::builder()
            .root(tmp.path())
            .config(config)
            .directive("redirectbase")
            .directive("REWRITEBASE")
            .directive("Options")
            .directive("options")
            .build()
            .unwrap();

        let names: Vec<&str> = converter.rules.iter().map(|r| r.directive()).collect();
        assert_eq!(names, vec!["RedirectBase", "RewriteBase", "Options"]);
    }

    #[test]
    fn test_builder_root_overrides_config_root() {
        let tmp = TempDir::new().unwrap();
        let mut config = Config::default();
        config.walker.root = Some(tmp.path().join("missing"));

        let converter = Converter::builder()
            .root(tmp.path())
            .config(config)
            .build()
            .unwrap();

        assert_eq!(converter.root(), fs::canonicalize(tmp.path()).unwrap());
    }

    #[test]
    fn test_discover_empty_tree() {
        let tmp = TempDir::new().unwrap();
        let converter = Converter::builder().root(tmp.path()).build().unwrap();

        let err = converter.discover().unwrap_err();
        assert!(matches!(err, ConvertError::NoMatchingFiles { .. }));
        assert_eq!(err.to_string(), "No .htaccess files found");
    }

    #[test]
    fn test_read_failure_stops_before_block() {
        let tmp = TempDir::new().unwrap();
        let converter = Converter::builder().root(tmp.path()).build().unwrap();
        let gone = HtaccessFile::new(tmp.path().join("gone/.htaccess"));

        let mut out = Vec::new();
        let err = converter.render(&[gone], &mut out).unwrap_err();

        assert!(matches!(err, ConvertError::Read { .. }));
        assert!(out.is_empty());
    }
}
