//! Locates and loads the configuration for a run.
//!
//! Lookup order:
//!
//! 1. `--config` flag (explicit path)
//! 2. `htconf.toml` or `.htconf.toml` in the start directory
//! 3. `$HTCONF_CONFIG_DIR/config.toml`, else `~/.htconf/config.toml`
//! 4. Built-in defaults
//!
//! The start directory is `--dir` when given, otherwise `.`. When no
//! `--dir` is given and the global config names a `walker.root`, the
//! project lookup is repeated in that root, since that is where the
//! conversion will actually start.

use anyhow::{Context, Result};
use htconf_core::Config;
use std::path::{Path, PathBuf};

/// Where the configuration was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Given with `--config`.
    Explicit(PathBuf),
    /// Found in the start directory.
    Project(PathBuf),
    /// Found in the global config directory.
    Global(PathBuf),
    /// Nothing found.
    Default,
}

impl ConfigSource {
    /// Returns the config file path, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Project(p) | Self::Global(p) => Some(p),
            Self::Default => None,
        }
    }

    /// Loads the configuration this source points at.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(&self) -> Result<Config> {
        let Some(p) = self.path() else {
            return Ok(Config::default());
        };
        if matches!(self, Self::Global(_)) {
            tracing::info!("Using global config: {}", p.display());
        } else {
            tracing::debug!("Using config: {}", p.display());
        }
        Config::from_file(p).with_context(|| format!("Failed to load config: {}", p.display()))
    }
}

/// A loaded configuration and the file it came from.
#[derive(Debug)]
pub struct ResolvedConfig {
    /// Where the configuration was found.
    pub source: ConfigSource,
    /// Loaded configuration, with `walker.root` already absolute or
    /// relative to the working directory.
    pub config: Config,
}

const PROJECT_CONFIG_NAMES: &[&str] = &["htconf.toml", ".htconf.toml"];

const GLOBAL_CONFIG_NAME: &str = "config.toml";

/// Finds and loads the configuration for a conversion starting at `dir`.
///
/// # Errors
///
/// Returns an error if the selected config file cannot be loaded.
pub fn resolve(dir: Option<&Path>, explicit: Option<&Path>) -> Result<ResolvedConfig> {
    resolve_inner(dir, explicit, global_config_dir().as_deref())
}

fn resolve_inner(
    dir: Option<&Path>,
    explicit: Option<&Path>,
    global_dir: Option<&Path>,
) -> Result<ResolvedConfig> {
    let source = locate(dir.unwrap_or(Path::new(".")), explicit, global_dir);
    let config = source.load()?;

    if dir.is_some() || !matches!(source, ConfigSource::Global(_)) {
        return Ok(ResolvedConfig { source, config });
    }

    // Global config moved the start directory; a project file there wins
    let Some(root) = config.walker.root.clone() else {
        return Ok(ResolvedConfig { source, config });
    };
    let Some(project) = find_project_config(&root) else {
        return Ok(ResolvedConfig { source, config });
    };

    let source = ConfigSource::Project(project);
    let mut config = source.load()?;
    if config.walker.root.is_none() {
        config.walker.root = Some(root);
    }
    Ok(ResolvedConfig { source, config })
}

fn locate(start_dir: &Path, explicit: Option<&Path>, global_dir: Option<&Path>) -> ConfigSource {
    if let Some(p) = explicit {
        return ConfigSource::Explicit(p.to_path_buf());
    }

    if let Some(project) = find_project_config(start_dir) {
        return ConfigSource::Project(project);
    }

    if let Some(candidate) = global_dir.map(|dir| dir.join(GLOBAL_CONFIG_NAME)) {
        if candidate.is_file() {
            tracing::debug!("Found global config: {}", candidate.display());
            return ConfigSource::Global(candidate);
        }
    }

    ConfigSource::Default
}

fn find_project_config(dir: &Path) -> Option<PathBuf> {
    let found = PROJECT_CONFIG_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|candidate| candidate.is_file())?;
    tracing::debug!("Found project config: {}", found.display());
    Some(found)
}

/// Returns `$HTCONF_CONFIG_DIR`, or `~/.htconf`.
#[must_use]
pub fn global_config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("HTCONF_CONFIG_DIR") {
        return Some(PathBuf::from(dir));
    }
    home::home_dir().map(|h| h.join(".htconf"))
}
