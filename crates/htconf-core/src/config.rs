//! Configuration types for htconf.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration, usually loaded from `htconf.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Traversal configuration.
    #[serde(default)]
    pub walker: WalkerConfig,

    /// Directive lint configuration.
    #[serde(default)]
    pub lint: LintConfig,
}

impl Config {
    /// Loads configuration from a TOML file.
    ///
    /// A relative `walker.root` is taken relative to the directory holding
    /// the file, not the working directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let mut config = Self::parse(&content)?;
        if let Some(base) = path.parent() {
            config.walker.anchor_root(base);
        }
        Ok(config)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }
}

/// Traversal configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkerConfig {
    /// Start directory used when none is given on the command line.
    #[serde(default)]
    pub root: Option<PathBuf>,

    /// Path substrings to exclude, appended after the built-in filters.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Whether to follow symbolic links while walking.
    #[serde(default)]
    pub follow_links: bool,
}

impl WalkerConfig {
    /// Joins a relative `root` onto `base`; absolute roots are kept.
    pub fn anchor_root(&mut self, base: &Path) {
        if let Some(root) = self.root.as_mut() {
            if root.is_relative() {
                *root = base.join(&*root);
            }
        }
    }
}

/// Directive lint configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LintConfig {
    /// Directives to flag in addition to `RedirectBase`.
    #[serde(default)]
    pub directives: Vec<String>,
}

/// Configuration errors.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    #[diagnostic(code(htconf::config::io))]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    #[diagnostic(
        code(htconf::config::parse),
        help("expected [walker] and [lint] tables, see `htaccess2conf --help`")
    )]
    Parse {
        /// Parse error message.
        message: String,
    },
}
