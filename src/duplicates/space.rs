//! Reclaimable-space accounting and human-readable sizes.
//!
//! The kept copy of every group is its first member in scan order, so a
//! group's reclaimable space is the sum of all member sizes minus the size
//! of that first member.

use super::groups::{DuplicateGroup, IntegrityWarning};

const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Bytes freed by deleting every member of `group` except the first.
#[must_use]
pub fn reclaimable(group: &DuplicateGroup) -> u64 {
    group.total_size() - group.kept().size
}

/// Sum of [`reclaimable`] over all groups.
#[must_use]
pub fn total_reclaimable(groups: &[DuplicateGroup]) -> u64 {
    groups.iter().map(reclaimable).sum()
}

/// Detect a group whose members disagree on size.
///
/// Matching digests with different sizes should not happen; the group is
/// kept and [`reclaimable`] still subtracts the first member's size.
#[must_use]
pub fn check_integrity(group: &DuplicateGroup) -> Option<IntegrityWarning> {
    let expected = group.kept().size;
    if group.members().iter().all(|m| m.size == expected) {
        return None;
    }

    Some(IntegrityWarning {
        hash: group.hash_hex(),
        sizes: group
            .members()
            .iter()
            .map(|m| (m.path.clone(), m.size))
            .collect(),
    })
}

/// Format a byte count with 1024-based units and two decimals.
///
/// # Examples
///
/// ```
/// use dupscan::duplicates::format_size;
///
/// assert_eq!(format_size(1), "1.00 B");
/// assert_eq!(format_size(1024), "1.00 KB");
/// assert_eq!(format_size(1_572_864), "1.50 MB");
/// ```
#[must_use]
pub fn format_size(bytes: u64) -> String {
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.2} {}", value, UNITS[unit])
}

/// Parse a size string produced by [`format_size`] back into bytes.
///
/// Units are 1024-based and case-insensitive; a bare number is bytes.
///
/// # Examples
///
/// ```
/// use dupscan::duplicates::parse_size;
///
/// assert_eq!(parse_size("1.00 KB").unwrap(), 1024);
/// assert_eq!(parse_size("64kb").unwrap(), 65_536);
/// ```
///
/// # Errors
///
/// Returns an error if the string is empty, contains an invalid or negative
/// number, or an unknown unit.
pub fn parse_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("Size cannot be empty".to_string());
    }

    let (num_str, suffix) = match s.find(|c: char| !c.is_ascii_digit() && c != '.') {
        Some(idx) => (&s[..idx], s[idx..].trim().to_uppercase()),
        None => (s, String::new()),
    };

    let num: f64 = num_str
        .trim()
        .parse()
        .map_err(|_| format!("Invalid number: '{num_str}'"))?;

    let power = match suffix.as_str() {
        "" | "B" => 0,
        "K" | "KB" => 1,
        "M" | "MB" => 2,
        "G" | "GB" => 3,
        "T" | "TB" => 4,
        _ => return Err(format!("Unknown size unit: '{suffix}'")),
    };

    Ok((num * 1024f64.powi(power)).round() as u64)
}
