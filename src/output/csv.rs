//! CSV report writer.
//!
//! One header row followed by one row per duplicated file.
//!
//! # Columns
//!
//! - `hash`: SHA-256 of the group (hexadecimal)
//! - `path`: path of the file as found during the scan
//!
//! # Example
//!
//! ```no_run
//! use dupscan::duplicates::DuplicateFinder;
//! use dupscan::output::{csv::CsvOutput, Report};
//! use std::path::Path;
//!
//! let result = DuplicateFinder::with_defaults()
//!     .find_duplicates(Path::new("."))
//!     .unwrap();
//! let report = Report::render(&result);
//! CsvOutput::new(&report).write_to(std::io::stdout()).unwrap();
//! ```

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::{report_path, Report, ReportRow};

const HEADER: [&str; 2] = ["hash", "path"];

/// The report could not be written.
#[derive(Debug, Error)]
pub enum CsvOutputError {
    /// The report file could not be created.
    #[error("Cannot create report {path}: {source}")]
    Create {
        /// Target file
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// I/O error during writing.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error during CSV serialization.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// CSV output formatter.
pub struct CsvOutput<'a> {
    rows: &'a [ReportRow],
}

impl<'a> CsvOutput<'a> {
    /// Create a formatter over a rendered report.
    #[must_use]
    pub fn new(report: &'a Report) -> Self {
        Self { rows: &report.rows }
    }

    /// Write the header and rows. An empty report yields the header only.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if writing or serialization fails.
    pub fn write_to<W: io::Write>(&self, writer: W) -> Result<(), CsvOutputError> {
        let mut csv_writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);

        csv_writer.write_record(HEADER)?;
        for row in self.rows {
            let path = report_path(&row.path);
            csv_writer.write_record([row.hash.as_str(), &*path])?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Create or truncate `path` and write the report into it (UTF-8).
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError::Create` when the file cannot be opened and
    /// the other variants when writing fails part-way.
    pub fn write_file(&self, path: &Path) -> Result<(), CsvOutputError> {
        let file = File::create(path).map_err(|source| CsvOutputError::Create {
            path: path.to_path_buf(),
            source,
        })?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer)?;
        writer.flush()?;
        log::info!("Wrote {} rows to {}", self.rows.len(), path.display());
        Ok(())
    }

    /// Generate CSV output as a string.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if serialization fails.
    pub fn to_string(&self) -> Result<String, CsvOutputError> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
