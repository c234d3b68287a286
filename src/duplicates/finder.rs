//! Duplicate finder: walk, hash, group.
//!
//! # Overview
//!
//! This module orchestrates the duplicate detection pipeline in a single
//! sequential pass:
//! 1. **Walk** - Yield every regular file under the root in sorted order
//! 2. **Hash** - Stat and SHA-256 each file; failures are recorded and skipped
//! 3. **Group** - Collect records by digest and keep digests with 2+ members
//!
//! The result is returned as a [`ScanResult`] value. Nothing is kept between
//! calls, so a finder can be reused for repeated scans.
//!
//! # Example
//!
//! ```no_run
//! use dupscan::duplicates::{DuplicateFinder, FinderConfig};
//! use std::path::Path;
//!
//! let finder = DuplicateFinder::new(FinderConfig::default());
//! let result = finder.find_duplicates(Path::new(".")).unwrap();
//!
//! println!("Found {} duplicate groups", result.groups.len());
//! println!("Reclaimable: {}", result.reclaimable_display());
//! ```

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;

use super::groups::{DuplicateGroup, FileRecord, GroupIndex, IntegrityWarning};
use super::space::{check_integrity, format_size, total_reclaimable};
use crate::progress::ProgressCallback;
use crate::scanner::{
    hash_to_hex, HashError, Hasher, ScanError, Walker, WalkerConfig, DEFAULT_BUFFER_SIZE,
    MAX_BUFFER_SIZE,
};

/// Phase name reported to progress callbacks.
pub const SCAN_PHASE: &str = "scanning";

/// Configuration for the duplicate finder.
#[derive(Clone)]
pub struct FinderConfig {
    /// Read buffer size used for hashing.
    pub buffer_size: usize,
    /// Directory walking options.
    pub walker_config: WalkerConfig,
    /// Optional shutdown flag for cooperative cancellation.
    pub shutdown_flag: Option<Arc<AtomicBool>>,
    /// Optional progress callback.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinderConfig")
            .field("buffer_size", &self.buffer_size)
            .field("walker_config", &self.walker_config)
            .field("shutdown_flag", &self.shutdown_flag)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            walker_config: WalkerConfig::default(),
            shutdown_flag: None,
            progress_callback: None,
        }
    }
}

impl FinderConfig {
    /// Set the hashing buffer size, clamped to `1..=MAX_BUFFER_SIZE`.
    #[must_use]
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size.clamp(1, MAX_BUFFER_SIZE);
        self
    }

    /// Set the walker configuration.
    #[must_use]
    pub fn with_walker_config(mut self, config: WalkerConfig) -> Self {
        self.walker_config = config;
        self
    }

    /// Set the shutdown flag for graceful termination.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }
}

/// A file that could not be walked or hashed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanIssue {
    /// Path of the offending entry
    pub path: PathBuf,
    /// Human-readable reason
    pub reason: String,
}

impl From<&ScanError> for ScanIssue {
    fn from(err: &ScanError) -> Self {
        Self {
            path: err.path().to_path_buf(),
            reason: err.to_string(),
        }
    }
}

/// Outcome of one scan.
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    /// Duplicate groups in first-seen digest order
    pub groups: Vec<DuplicateGroup>,
    /// Sum of reclaimable bytes over all groups
    pub total_reclaimable: u64,
    /// Entries skipped because they could not be read
    pub errors: Vec<ScanIssue>,
    /// Groups whose members disagree on size
    pub warnings: Vec<IntegrityWarning>,
    /// Regular files yielded by the walk
    pub files_scanned: usize,
    /// Files hashed whose digest no other file shares
    pub unique_files: usize,
    /// Bytes read while hashing
    pub bytes_hashed: u64,
    /// Wall-clock duration of the scan
    pub scan_duration: Duration,
    /// Whether the scan stopped early on a shutdown request
    pub interrupted: bool,
}

impl ScanResult {
    /// Number of files flagged as removable (sum of group size - 1).
    #[must_use]
    pub fn duplicate_files(&self) -> usize {
        self.groups.iter().map(DuplicateGroup::duplicate_count).sum()
    }

    /// Format reclaimable space as human-readable string.
    #[must_use]
    pub fn reclaimable_display(&self) -> String {
        format_size(self.total_reclaimable)
    }

    /// Whether any per-file error was recorded.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Errors that abort a scan.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// The root path does not exist or is not a directory.
    #[error("Invalid root directory: {0}")]
    InvalidRoot(ScanError),

    /// The scan was interrupted before it started.
    #[error("Scan interrupted by user")]
    Interrupted,
}

/// Duplicate finder that runs the walk-hash-group pipeline.
pub struct DuplicateFinder {
    config: FinderConfig,
    hasher: Hasher,
}

impl DuplicateFinder {
    /// Create a new duplicate finder with the given configuration.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        let mut hasher = Hasher::new().with_buffer_size(config.buffer_size);
        if let Some(ref flag) = config.shutdown_flag {
            hasher = hasher.with_shutdown_flag(flag.clone());
        }
        Self { config, hasher }
    }

    /// Create a new duplicate finder with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(FinderConfig::default())
    }

    /// Find all duplicate files under `path`.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::InvalidRoot`] if the path does not exist or is
    /// not a directory, and [`FinderError::Interrupted`] if shutdown was
    /// requested before the walk began. Per-file failures never abort the
    /// scan; they end up in [`ScanResult::errors`].
    pub fn find_duplicates(&self, path: &Path) -> Result<ScanResult, FinderError> {
        let mut walker = Walker::new(path, self.config.walker_config.clone());
        walker.validate().map_err(FinderError::InvalidRoot)?;

        if self.config.is_shutdown_requested() {
            return Err(FinderError::Interrupted);
        }

        if let Some(ref flag) = self.config.shutdown_flag {
            walker = walker.with_shutdown_flag(flag.clone());
        }

        log::info!("Starting duplicate scan of {}", path.display());
        Ok(self.group_entries(walker.walk()))
    }

    /// Group already-listed paths by content.
    ///
    /// Each path is stat'ed and hashed in order; unreadable files are
    /// recorded in [`ScanResult::errors`] and contribute to no group.
    pub fn group_paths<I>(&self, paths: I) -> ScanResult
    where
        I: IntoIterator<Item = PathBuf>,
    {
        self.group_entries(paths.into_iter().map(Ok))
    }

    fn notify(&self, message: &str) {
        if let Some(ref callback) = self.config.progress_callback {
            callback.on_message(message);
        }
    }

    /// Group the output of a walk, recording walk errors alongside hash errors.
    pub fn group_entries<I>(&self, entries: I) -> ScanResult
    where
        I: IntoIterator<Item = Result<PathBuf, ScanError>>,
    {
        let start_time = Instant::now();
        let mut result = ScanResult::default();
        let mut index = GroupIndex::new();

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_start(SCAN_PHASE, 0);
        }

        for entry in entries {
            if self.config.is_shutdown_requested() {
                log::info!("Shutdown requested, stopping after {} files", result.files_scanned);
                result.interrupted = true;
                break;
            }

            let path = match entry {
                Ok(path) => path,
                Err(e) => {
                    self.notify(&format!("Skipped {}", e.path().display()));
                    result.errors.push(ScanIssue::from(&e));
                    continue;
                }
            };

            result.files_scanned += 1;
            if let Some(ref callback) = self.config.progress_callback {
                callback.on_progress(result.files_scanned, path.to_string_lossy().as_ref());
            }

            match self.hash_file(path) {
                Ok(record) => {
                    log::trace!(
                        "{} {}",
                        hash_to_hex(&record.digest),
                        record.path.display()
                    );
                    result.bytes_hashed += record.size;
                    if let Some(ref callback) = self.config.progress_callback {
                        callback.on_item_completed(record.size);
                    }
                    index.insert(record);
                }
                Err(ScanError::Hash(HashError::Interrupted(path))) => {
                    log::debug!("Hashing interrupted: {}", path.display());
                    result.interrupted = true;
                    break;
                }
                Err(e) => {
                    log::warn!("Skipping {}: {}", e.path().display(), e);
                    self.notify(&format!("Skipped {}", e.path().display()));
                    result.errors.push(ScanIssue::from(&e));
                }
            }
        }

        // The walker can stop on the flag before the loop above sees it.
        if self.config.is_shutdown_requested() {
            result.interrupted = true;
        }

        let (groups, unique) = index.into_groups();
        result.unique_files = unique;

        for group in &groups {
            log::debug!(
                "Duplicate group {}: {} files, {} bytes each",
                group.hash_hex(),
                group.len(),
                group.size()
            );
            if let Some(warning) = check_integrity(group) {
                log::warn!("Integrity warning: {}", warning);
                self.notify(&format!("Size mismatch in group {}", group.hash_hex()));
                result.warnings.push(warning);
            }
        }

        result.total_reclaimable = total_reclaimable(&groups);
        result.groups = groups;
        result.scan_duration = start_time.elapsed();

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_end(SCAN_PHASE);
        }

        log::info!(
            "Scan complete: {} files, {} duplicate groups, {} duplicate files, {} reclaimable, {} errors",
            result.files_scanned,
            result.groups.len(),
            result.duplicate_files(),
            result.reclaimable_display(),
            result.errors.len()
        );

        result
    }

    /// Stat and hash one file.
    fn hash_file(&self, path: PathBuf) -> Result<FileRecord, ScanError> {
        let size = std::fs::metadata(&path)
            .map_err(|e| ScanError::from(HashError::from_io(&path, e)))?
            .len();
        let digest = self.hasher.hash(&path)?;
        Ok(FileRecord::new(path, size, digest))
    }
}
