//! Duplicate groups and the digest index used to build them.
//!
//! # Overview
//!
//! Files are grouped purely by digest equality. [`GroupIndex`] keeps digests
//! in the order they were first seen and members in the order they were
//! inserted, so the groups it produces are reproducible for a given scan
//! order.
//!
//! # Example
//!
//! ```
//! use dupscan::duplicates::{FileRecord, GroupIndex};
//! use std::path::PathBuf;
//!
//! let mut index = GroupIndex::new();
//! index.insert(FileRecord::new(PathBuf::from("/a"), 1, [1u8; 32]));
//! index.insert(FileRecord::new(PathBuf::from("/b"), 1, [1u8; 32]));
//! index.insert(FileRecord::new(PathBuf::from("/c"), 1, [2u8; 32]));
//!
//! let (groups, unique) = index.into_groups();
//! assert_eq!(groups.len(), 1);
//! assert_eq!(unique, 1);
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::scanner::{hash_to_hex, Digest};

/// A hashed file. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRecord {
    /// Path to the file as found during the walk
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
    /// SHA-256 digest of the content
    #[serde(serialize_with = "serialize_digest")]
    pub digest: Digest,
}

impl FileRecord {
    /// Create a new file record.
    #[must_use]
    pub fn new(path: PathBuf, size: u64, digest: Digest) -> Self {
        Self { path, size, digest }
    }
}

fn serialize_digest<S: serde::Serializer>(digest: &Digest, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&hash_to_hex(digest))
}

/// Two or more files sharing the same digest.
///
/// The first member is the kept representative; every other member counts
/// as removable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    digest: Digest,
    members: Vec<FileRecord>,
}

impl DuplicateGroup {
    /// Build a group from members that share `digest`.
    ///
    /// Returns `None` when fewer than two members are supplied.
    ///
    /// # Panics
    ///
    /// Debug assertion fails if a member's digest differs from `digest`.
    #[must_use]
    pub fn new(digest: Digest, members: Vec<FileRecord>) -> Option<Self> {
        debug_assert!(members.iter().all(|m| m.digest == digest));
        if members.len() < 2 {
            return None;
        }
        Some(Self { digest, members })
    }

    /// Shared content digest.
    #[must_use]
    pub fn digest(&self) -> &Digest {
        &self.digest
    }

    /// Digest as hexadecimal string.
    #[must_use]
    pub fn hash_hex(&self) -> String {
        hash_to_hex(&self.digest)
    }

    /// Members in scan order.
    #[must_use]
    pub fn members(&self) -> &[FileRecord] {
        &self.members
    }

    /// The kept representative (first member in scan order).
    #[must_use]
    pub fn kept(&self) -> &FileRecord {
        &self.members[0]
    }

    /// Members flagged as removable (all but the first).
    #[must_use]
    pub fn removable(&self) -> &[FileRecord] {
        &self.members[1..]
    }

    /// Number of files in this group (always at least 2).
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Always false; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Number of duplicate copies (total - 1 kept).
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.members.len() - 1
    }

    /// Size of the kept representative.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.kept().size
    }

    /// Total size of all members.
    #[must_use]
    pub fn total_size(&self) -> u64 {
        self.members.iter().map(|m| m.size).sum()
    }

    /// Paths of all members.
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.members.iter().map(|m| m.path.as_path())
    }
}

/// Members of one group disagree on size despite a shared digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntegrityWarning {
    /// Hex digest of the affected group
    pub hash: String,
    /// Every member path with its observed size
    pub sizes: Vec<(PathBuf, u64)>,
}

impl std::fmt::Display for IntegrityWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "digest {} shared by files of different sizes ({} members)",
            self.hash,
            self.sizes.len()
        )
    }
}

/// Ordered mapping from digest to the records sharing it.
///
/// Iteration order is fixed at insertion: digests by first appearance,
/// records by insertion.
#[derive(Debug, Default)]
pub struct GroupIndex {
    slots: HashMap<Digest, usize>,
    entries: Vec<(Digest, Vec<FileRecord>)>,
}

impl GroupIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record under its digest.
    pub fn insert(&mut self, record: FileRecord) {
        match self.slots.get(&record.digest) {
            Some(&slot) => self.entries[slot].1.push(record),
            None => {
                self.slots.insert(record.digest, self.entries.len());
                self.entries.push((record.digest, vec![record]));
            }
        }
    }

    /// Number of distinct digests seen.
    #[must_use]
    pub fn digest_count(&self) -> usize {
        self.entries.len()
    }

    /// Number of records inserted.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.entries.iter().map(|(_, v)| v.len()).sum()
    }

    /// Keep only digests with 2+ members.
    ///
    /// Returns the duplicate groups in first-seen order together with the
    /// number of unique files that were discarded.
    #[must_use]
    pub fn into_groups(self) -> (Vec<DuplicateGroup>, usize) {
        let mut unique = 0;
        let groups = self
            .entries
            .into_iter()
            .filter_map(|(digest, members)| {
                if members.len() < 2 {
                    unique += members.len();
                    None
                } else {
                    DuplicateGroup::new(digest, members)
                }
            })
            .collect();
        (groups, unique)
    }
}
