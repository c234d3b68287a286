//! Directory walker implementation using walkdir.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct for traversing a directory
//! tree and yielding every regular file it contains. Children of each
//! directory are visited in file-name order, so two walks over an unchanged
//! tree yield the same sequence of paths.
//!
//! # Features
//!
//! - Depth-first, lexicographically sorted traversal
//! - Optional symlink following (walkdir detects loops)
//! - Per-entry errors are yielded, never fatal
//! - Graceful shutdown via atomic flag
//!
//! # Example
//!
//! ```no_run
//! use dupscan::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("/home/user/Downloads"), WalkerConfig::default());
//! let files: Vec<_> = walker.walk().filter_map(Result::ok).collect();
//! println!("Found {} files", files.len());
//! ```

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use walkdir::WalkDir;

use super::{ScanError, WalkerConfig};

/// Directory walker for file discovery.
#[derive(Debug)]
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
    /// Walker configuration
    config: WalkerConfig,
    /// Optional shutdown flag for graceful termination
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl Walker {
    /// Create a new walker for the given path.
    #[must_use]
    pub fn new(path: &Path, config: WalkerConfig) -> Self {
        Self {
            root: path.to_path_buf(),
            config,
            shutdown_flag: None,
        }
    }

    /// Set the shutdown flag for graceful termination.
    ///
    /// When the flag is set to `true`, the walker stops yielding entries.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Root directory of this walk.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Check that the root exists and is a directory.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::NotFound`] if the root does not exist and
    /// [`ScanError::NotADirectory`] if it is something other than a directory.
    pub fn validate(&self) -> Result<(), ScanError> {
        let metadata = std::fs::metadata(&self.root).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ScanError::NotFound(self.root.clone()),
            _ => ScanError::from_io(&self.root, e),
        })?;

        if metadata.is_dir() {
            Ok(())
        } else {
            Err(ScanError::NotADirectory(self.root.clone()))
        }
    }

    /// Walk the directory tree, yielding regular file paths.
    ///
    /// Errors are yielded as [`ScanError`] values rather than stopping
    /// iteration. The sequence is lazy and each call performs a fresh walk.
    pub fn walk(&self) -> impl Iterator<Item = Result<PathBuf, ScanError>> + '_ {
        let walk_dir = WalkDir::new(&self.root)
            .follow_links(self.config.follow_symlinks)
            .sort_by_file_name();

        walk_dir
            .into_iter()
            .take_while(move |_| {
                if self.is_shutdown_requested() {
                    log::debug!("Walker: Shutdown requested, stopping iteration");
                    false
                } else {
                    true
                }
            })
            .filter_map(move |entry_result| match entry_result {
                Ok(entry) => {
                    let file_type = entry.file_type();

                    if file_type.is_dir() {
                        return None;
                    }

                    // With follow_links enabled walkdir resolves the target,
                    // so a symlink file type here means we are not following.
                    if file_type.is_symlink() {
                        return self.check_symlink(entry.path());
                    }

                    if !file_type.is_file() {
                        log::trace!("Skipping special file: {}", entry.path().display());
                        return None;
                    }

                    Some(Ok(entry.into_path()))
                }
                Err(e) => Some(Err(self.handle_walkdir_error(e))),
            })
    }

    /// Skip an unfollowed symlink, reporting it when it is dangling.
    fn check_symlink(&self, path: &Path) -> Option<Result<PathBuf, ScanError>> {
        match std::fs::metadata(path) {
            Ok(_) => {
                log::trace!("Skipping symlink: {}", path.display());
                None
            }
            Err(e) => {
                log::warn!("Broken symlink {}: {}", path.display(), e);
                Some(Err(ScanError::from_io(path, e)))
            }
        }
    }

    /// Convert walkdir errors into [`ScanError`].
    fn handle_walkdir_error(&self, error: walkdir::Error) -> ScanError {
        let path = error
            .path()
            .map_or_else(|| self.root.clone(), Path::to_path_buf);

        if let Some(ancestor) = error.loop_ancestor() {
            log::warn!(
                "Symlink loop at {} (points to {})",
                path.display(),
                ancestor.display()
            );
            return ScanError::Io {
                path,
                source: std::io::Error::other("filesystem loop detected"),
            };
        }

        let message = error.to_string();
        match error.into_io_error() {
            Some(io) => {
                log::warn!("Walker error for {}: {}", path.display(), io);
                ScanError::from_io(&path, io)
            }
            None => {
                log::warn!("Walker error for {}: {}", path.display(), message);
                ScanError::Io {
                    path,
                    source: std::io::Error::other(message),
                }
            }
        }
    }
}
