//! Persistent defaults for the `scan` command.
//!
//! Values are layered with figment, later sources winning:
//!
//! 1. Built-in defaults ([`Config::default`])
//! 2. `config.toml` in the platform config directory
//! 3. `DUPSCAN_*` environment variables (e.g. `DUPSCAN_BUFFER_SIZE=131072`)
//!
//! Command-line flags are applied on top by the caller.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::cli::OutputFormat;
use crate::scanner::DEFAULT_BUFFER_SIZE;

/// Default report file name.
pub const DEFAULT_OUTPUT_FILE: &str = "duplicados.csv";

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "DUPSCAN_";

/// Scan defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Report file written after each scan.
    pub output_file: PathBuf,
    /// Report format.
    pub format: OutputFormat,
    /// Hashing read buffer in bytes.
    pub buffer_size: usize,
    /// Follow symbolic links while walking.
    pub follow_symlinks: bool,
    /// Show the progress spinner.
    pub progress: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_file: PathBuf::from(DEFAULT_OUTPUT_FILE),
            format: OutputFormat::Csv,
            buffer_size: DEFAULT_BUFFER_SIZE,
            follow_symlinks: false,
            progress: true,
        }
    }
}

impl Config {
    /// Load from the platform config file and environment.
    ///
    /// Any failure (unreadable file, bad TOML, wrong types) is logged and the
    /// built-in defaults are used instead.
    #[must_use]
    pub fn load() -> Self {
        let path = match Self::config_path() {
            Ok(path) => path,
            Err(e) => {
                log::debug!("No config directory ({e}), using defaults");
                return Self::default();
            }
        };
        Self::load_from(&path)
    }

    /// Load from `path` when given, otherwise from the platform config file.
    #[must_use]
    pub fn load_with(path: Option<&Path>) -> Self {
        match path {
            Some(path) => Self::load_from(path),
            None => Self::load(),
        }
    }

    /// Load with `path` as the config file.
    #[must_use]
    pub fn load_from(path: &Path) -> Self {
        match Self::figment(path).extract::<Self>() {
            Ok(config) => {
                log::debug!("Configuration loaded: {config:?}");
                config
            }
            Err(e) => {
                log::warn!(
                    "Ignoring invalid configuration ({}): {}",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// The provider stack behind [`load_from`](Self::load_from).
    #[must_use]
    pub fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Write to the platform config file.
    ///
    /// # Errors
    ///
    /// Fails if the config directory cannot be determined or written.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Write as TOML to `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Fails on serialization or I/O errors.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("serializing configuration")?;
        fs::write(path, content).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }

    /// Platform-specific location of `config.toml`.
    ///
    /// # Errors
    ///
    /// Fails when no home directory can be determined.
    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("org", "dupscan", "dupscan")
            .context("Failed to determine project directories")?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}
