//! JSON report writer.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "generated_at": "2024-05-01T12:00:00+00:00",
//!   "root": "/data",
//!   "groups": [
//!     {
//!       "hash": "2d7116...",
//!       "size": 1024,
//!       "reclaimable": 1024,
//!       "files": ["/data/a.txt", "/data/b.txt"]
//!     }
//!   ],
//!   "summary": {
//!     "files_scanned": 3,
//!     "duplicate_groups": 1,
//!     "duplicate_files": 1,
//!     "reclaimable_bytes": 1024,
//!     "reclaimable_display": "1.00 KB",
//!     "errors": 0,
//!     "warnings": 0,
//!     "interrupted": false
//!   },
//!   "errors": [],
//!   "warnings": []
//! }
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::Utc;
use serde::Serialize;

use super::{report_path, Summary};
use crate::duplicates::{reclaimable, DuplicateGroup, IntegrityWarning, ScanIssue, ScanResult};

/// A duplicate group in JSON form.
#[derive(Debug, Clone, Serialize)]
pub struct JsonGroup {
    /// SHA-256 as hexadecimal string (64 characters)
    pub hash: String,
    /// Size of the kept copy in bytes
    pub size: u64,
    /// Bytes freed by removing the other copies
    pub reclaimable: u64,
    /// Member paths, kept copy first
    pub files: Vec<String>,
}

impl From<&DuplicateGroup> for JsonGroup {
    fn from(group: &DuplicateGroup) -> Self {
        Self {
            hash: group.hash_hex(),
            size: group.size(),
            reclaimable: reclaimable(group),
            files: group
                .paths()
                .map(|p| report_path(p).into_owned())
                .collect(),
        }
    }
}

/// Complete JSON document.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    /// Creation time, RFC 3339
    pub generated_at: String,
    /// Scanned directory
    pub root: String,
    /// Duplicate groups
    pub groups: Vec<JsonGroup>,
    /// Headline numbers
    pub summary: Summary,
    /// Skipped files
    pub errors: Vec<ScanIssue>,
    /// Size mismatches within groups
    pub warnings: Vec<IntegrityWarning>,
}

impl JsonOutput {
    /// Build the document for a scan of `root`.
    #[must_use]
    pub fn new(root: &Path, result: &ScanResult, summary: &Summary) -> Self {
        Self {
            generated_at: Utc::now().to_rfc3339(),
            root: report_path(root).into_owned(),
            groups: result.groups.iter().map(JsonGroup::from).collect(),
            summary: summary.clone(),
            errors: result.errors.clone(),
            warnings: result.warnings.clone(),
        }
    }

    /// Serialize to pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write pretty JSON plus a trailing newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<(), JsonOutputError> {
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    /// Create or truncate `path` and write the document into it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written.
    pub fn write_file(&self, path: &Path) -> Result<(), JsonOutputError> {
        let file = File::create(path).map_err(|source| JsonOutputError::Create {
            path: path.to_path_buf(),
            source,
        })?;
        self.write_to(BufWriter::new(file))?;
        log::info!("Wrote {} groups to {}", self.groups.len(), path.display());
        Ok(())
    }
}

/// Errors that can occur during JSON output.
#[derive(thiserror::Error, Debug)]
pub enum JsonOutputError {
    /// The report file could not be created.
    #[error("Cannot create report {path}: {source}")]
    Create {
        /// Target file
        path: std::path::PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error during writing
    #[error("I/O error during JSON generation: {0}")]
    Io(#[from] std::io::Error),
}
