//! Report rendering and output formatters.
//!
//! [`Report::render`] turns a [`ScanResult`] into rows (one per duplicated
//! file) plus a [`Summary`]. The formatters then write those:
//! - [`csv`]: the `hash,path` report file
//! - [`json`]: a JSON document for scripting
//! - [`summary`]: the console text
//!
//! # Example
//!
//! ```no_run
//! use dupscan::duplicates::DuplicateFinder;
//! use dupscan::output::{csv::CsvOutput, summary::render_summary, Report};
//! use std::path::Path;
//!
//! let result = DuplicateFinder::with_defaults()
//!     .find_duplicates(Path::new("."))
//!     .unwrap();
//! let report = Report::render(&result);
//!
//! CsvOutput::new(&report).write_file(Path::new("duplicados.csv")).unwrap();
//! println!("{}", render_summary(&report.summary));
//! ```

pub mod csv;
pub mod json;
pub mod summary;

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::duplicates::{format_size, ScanResult};

pub use self::csv::{CsvOutput, CsvOutputError};
pub use self::json::{JsonOutput, JsonOutputError};
pub use self::summary::render_summary;

/// One report line: a duplicated file tagged with its group's digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    /// Hex SHA-256 of the group
    pub hash: String,
    /// Path of the file
    pub path: PathBuf,
}

/// Headline numbers for a scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Regular files the walk produced
    pub files_scanned: usize,
    /// Number of duplicate groups
    pub duplicate_groups: usize,
    /// Removable copies: group size minus one, summed over groups
    pub duplicate_files: usize,
    /// Bytes freed by removing those copies
    pub reclaimable_bytes: u64,
    /// `reclaimable_bytes` formatted with [`format_size`]
    pub reclaimable_display: String,
    /// Files skipped because they could not be read
    pub errors: usize,
    /// Groups whose members disagree on size
    pub warnings: usize,
    /// Whether the scan stopped early
    pub interrupted: bool,
}

impl Summary {
    /// Summarize a scan result.
    #[must_use]
    pub fn from_result(result: &ScanResult) -> Self {
        Self {
            files_scanned: result.files_scanned,
            duplicate_groups: result.groups.len(),
            duplicate_files: result.duplicate_files(),
            reclaimable_bytes: result.total_reclaimable,
            reclaimable_display: format_size(result.total_reclaimable),
            errors: result.errors.len(),
            warnings: result.warnings.len(),
            interrupted: result.interrupted,
        }
    }
}

/// Rendered scan: report rows plus summary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    /// Rows in group order, members in scan order
    pub rows: Vec<ReportRow>,
    /// Headline numbers
    pub summary: Summary,
}

impl Report {
    /// Render a scan result. Files outside any group produce no row.
    #[must_use]
    pub fn render(result: &ScanResult) -> Self {
        let rows = result
            .groups
            .iter()
            .flat_map(|group| {
                let hash = group.hash_hex();
                group.paths().map(move |path| ReportRow {
                    hash: hash.clone(),
                    path: path.to_path_buf(),
                })
            })
            .collect();

        Self {
            rows,
            summary: Summary::from_result(result),
        }
    }
}

/// Path text for a UTF-8 report.
///
/// Paths that are not valid UTF-8 are written lossily and logged, since the
/// reported name will not match the file on disk.
pub(crate) fn report_path(path: &Path) -> Cow<'_, str> {
    match path.to_str() {
        Some(text) => Cow::Borrowed(text),
        None => {
            let lossy = path.to_string_lossy();
            log::warn!("Path is not valid UTF-8, reported as {lossy:?}");
            lossy
        }
    }
}
