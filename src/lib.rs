//! dupscan - duplicate file finder
//!
//! Walks a directory tree, hashes every regular file with SHA-256, groups
//! files with identical digests and reports the groups together with the
//! space that removing the extra copies would free. The report goes to a
//! CSV (or JSON) file; a summary goes to the console.

pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;
pub mod signal;
pub mod task;

use std::io::{BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::cli::{Cli, Commands, ConfigArgs, HashArgs, OutputFormat, ScanArgs};
use crate::config::Config;
use crate::duplicates::{FinderConfig, ScanResult};
use crate::error::ExitCode;
use crate::output::{render_summary, CsvOutput, JsonOutput, Report, Summary};
use crate::progress::Progress;
use crate::scanner::{hash_to_hex, Hasher, WalkerConfig};
use crate::task::ScanHandle;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Run the parsed command line and report how the process should exit.
///
/// # Errors
///
/// Returns fatal errors: an invalid root directory, a failed prompt, a
/// signal handler that cannot be installed, or an interrupted scan that
/// never started.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);
    if cli.no_color {
        yansi::disable();
    }

    let config_file = cli.config.as_deref();
    match cli.command {
        Commands::Scan(ref args) => run_scan(args, Config::load_with(config_file), cli.quiet),
        Commands::Hash(ref args) => run_hash(args, &Config::load_with(config_file)),
        Commands::Config(ref args) => run_config(args, config_file),
    }
}

fn run_scan(args: &ScanArgs, config: Config, quiet: bool) -> Result<ExitCode> {
    let config = args.resolve(config);
    let root = match args.path {
        Some(ref path) => path.clone(),
        None => prompt_root()?,
    };

    let handler = signal::install_handler()?;
    let progress = Arc::new(Progress::new(quiet || !config.progress));
    let finder_config = FinderConfig::default()
        .with_buffer_size(config.buffer_size)
        .with_walker_config(WalkerConfig::new(config.follow_symlinks))
        .with_shutdown_flag(handler.get_flag())
        .with_progress_callback(progress.clone());

    let mut handle = ScanHandle::spawn(root.clone(), finder_config);
    let outcome = loop {
        if let Some(outcome) = handle.try_result() {
            break outcome;
        }
        progress.tick();
        std::thread::sleep(POLL_INTERVAL);
    };
    let result = outcome?;

    let report = Report::render(&result);
    if result.interrupted {
        log::warn!("Scan interrupted, report not written");
        print_summary(&report.summary, quiet);
        return Ok(ExitCode::Interrupted);
    }

    if let Err(e) = write_report(&config, &root, &result, &report) {
        eprintln!(
            "[{}] Error: {:#}",
            ExitCode::ReportWriteFailed.code_prefix(),
            e
        );
        print_summary(&report.summary, quiet);
        return Ok(ExitCode::ReportWriteFailed);
    }

    if !quiet {
        println!("Report written to {}", config.output_file.display());
    }
    print_summary(&report.summary, quiet);

    Ok(scan_exit_code(&report.summary))
}

fn prompt_root() -> Result<PathBuf> {
    if !std::io::stdin().is_terminal() {
        return read_root_line(std::io::stdin().lock());
    }

    let input: String = dialoguer::Input::new()
        .with_prompt("Directory to scan")
        .interact_text()
        .context("Failed to read directory to scan")?;
    Ok(PathBuf::from(input.trim()))
}

/// Root directory from the first line of piped input.
fn read_root_line<R: BufRead>(mut reader: R) -> Result<PathBuf> {
    let mut line = String::new();
    reader
        .read_line(&mut line)
        .context("Failed to read directory to scan from stdin")?;
    let trimmed = line.trim();
    if trimmed.is_empty() {
        anyhow::bail!("No directory to scan given on stdin");
    }
    Ok(PathBuf::from(trimmed))
}

fn write_report(config: &Config, root: &Path, result: &ScanResult, report: &Report) -> Result<()> {
    match config.format {
        OutputFormat::Csv => CsvOutput::new(report).write_file(&config.output_file)?,
        OutputFormat::Json => {
            JsonOutput::new(root, result, &report.summary).write_file(&config.output_file)?;
        }
    }
    Ok(())
}

fn print_summary(summary: &Summary, quiet: bool) {
    if !quiet {
        print!("{}", render_summary(summary));
    }
}

/// Exit code for a finished scan whose report was written.
#[must_use]
pub fn scan_exit_code(summary: &Summary) -> ExitCode {
    if summary.interrupted {
        ExitCode::Interrupted
    } else if summary.errors > 0 {
        ExitCode::PartialSuccess
    } else if summary.duplicate_groups == 0 {
        ExitCode::NoDuplicates
    } else {
        ExitCode::Success
    }
}

fn run_hash(args: &HashArgs, config: &Config) -> Result<ExitCode> {
    let hasher = Hasher::new().with_buffer_size(config.buffer_size);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let mut failed = false;

    for file in &args.files {
        match hasher.hash(file) {
            Ok(digest) => writeln!(out, "{}  {}", hash_to_hex(&digest), file.display())?,
            Err(e) => {
                log::debug!("hash failed: {e:?}");
                eprintln!("dupscan: {e}");
                failed = true;
            }
        }
    }

    Ok(if failed {
        ExitCode::PartialSuccess
    } else {
        ExitCode::Success
    })
}

fn run_config(args: &ConfigArgs, config_file: Option<&Path>) -> Result<ExitCode> {
    let config = Config::load_with(config_file);
    let text = toml::to_string_pretty(&config).context("serializing configuration")?;
    match config_file {
        Some(path) => println!("# {}", path.display()),
        None => {
            if let Ok(path) = Config::config_path() {
                println!("# {}", path.display());
            }
        }
    }
    print!("{text}");

    if args.save {
        let path = match config_file {
            Some(path) => {
                config.save_to(path)?;
                path.to_path_buf()
            }
            None => config.save()?,
        };
        println!("Saved configuration to {}", path.display());
    }
    Ok(ExitCode::Success)
}
