//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Content-hash grouping of scanned files
//! - Reclaimable-space accounting and integrity checks
//! - The scan pipeline tying walker and hasher together

pub mod finder;
pub mod groups;
pub mod space;

pub use finder::{DuplicateFinder, FinderConfig, FinderError, ScanIssue, ScanResult, SCAN_PHASE};
pub use groups::{DuplicateGroup, FileRecord, GroupIndex, IntegrityWarning};
pub use space::{check_integrity, format_size, parse_size, reclaimable, total_reclaimable};
