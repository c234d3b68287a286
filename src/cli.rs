//! Command-line interface definitions for dupscan.
//!
//! Global options (verbosity, color, error format) apply to every
//! subcommand.
//!
//! # Example
//!
//! ```bash
//! # Scan a directory and write duplicados.csv
//! dupscan scan ~/Downloads
//!
//! # Prompt for the directory, write JSON instead
//! dupscan scan --format json --output-file dupes.json
//!
//! # Print SHA-256 digests
//! dupscan hash a.iso b.iso
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::config::Config;
use crate::duplicates::{format_size, parse_size};
use crate::scanner::MAX_BUFFER_SIZE;

/// Find duplicate files by SHA-256 content hash.
///
/// dupscan walks a directory tree, groups files with identical content and
/// reports how much space removing the extra copies would free.
#[derive(Debug, Parser)]
#[command(name = "dupscan")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Print fatal errors as JSON on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Read settings from FILE instead of the platform config.toml
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scan a directory for duplicate files and write a report
    Scan(ScanArgs),
    /// Print the SHA-256 digest of each file
    Hash(HashArgs),
    /// Show the effective configuration
    Config(ConfigArgs),
}

/// Arguments for the scan subcommand.
#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Directory to scan (prompted for when omitted)
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Report file, overwritten on every run [default: duplicados.csv]
    #[arg(short, long, value_name = "FILE")]
    pub output_file: Option<PathBuf>,

    /// Report format [default: csv]
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Follow symbolic links during the scan
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Hashing read buffer (e.g., 64KB, 1MB)
    #[arg(long, value_name = "SIZE", value_parser = parse_buffer_size)]
    pub buffer_size: Option<usize>,

    /// Hide the progress spinner
    #[arg(long)]
    pub no_progress: bool,
}

impl ScanArgs {
    /// Apply these flags on top of the loaded configuration.
    #[must_use]
    pub fn resolve(&self, mut config: Config) -> Config {
        if let Some(ref file) = self.output_file {
            config.output_file = file.clone();
        }
        if let Some(format) = self.format {
            config.format = format;
        }
        if let Some(size) = self.buffer_size {
            config.buffer_size = size;
        }
        if self.follow_symlinks {
            config.follow_symlinks = true;
        }
        if self.no_progress {
            config.progress = false;
        }
        config
    }
}

/// Arguments for the hash subcommand.
#[derive(Debug, Args)]
pub struct HashArgs {
    /// Files to hash
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,
}

/// Arguments for the config subcommand.
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Write the effective configuration to the config file
    #[arg(long)]
    pub save: bool,
}

/// Report format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Comma-separated `hash,path` rows
    #[default]
    Csv,
    /// JSON document with groups and summary
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Csv => write!(f, "csv"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

fn parse_buffer_size(s: &str) -> Result<usize, String> {
    let bytes = parse_size(s)?;
    if bytes == 0 {
        return Err("Buffer size must be at least 1 byte".to_string());
    }
    match usize::try_from(bytes) {
        Ok(size) if size <= MAX_BUFFER_SIZE => Ok(size),
        _ => Err(format!(
            "Buffer size too large: '{s}' (maximum {})",
            format_size(MAX_BUFFER_SIZE as u64)
        )),
    }
}
