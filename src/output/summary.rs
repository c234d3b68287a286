//! Console summary.
//!
//! Colors come from yansi and are switched off globally by `--no-color`
//! (or `NO_COLOR`).

use std::fmt::Write;

use yansi::Paint;

use super::Summary;

/// Render the human-readable summary printed after a scan.
#[must_use]
pub fn render_summary(summary: &Summary) -> String {
    let mut out = String::new();

    if summary.interrupted {
        let _ = writeln!(out, "{}", "Scan interrupted; results are partial.".yellow());
    }

    if summary.duplicate_groups == 0 {
        let _ = writeln!(
            out,
            "{} ({} files scanned)",
            "No duplicates found.".green(),
            summary.files_scanned
        );
    } else {
        let _ = writeln!(
            out,
            "{:<19}{}",
            "Duplicate groups:",
            summary.duplicate_groups.bold()
        );
        let _ = writeln!(
            out,
            "{:<19}{}",
            "Duplicate files:",
            summary.duplicate_files.bold()
        );
        let _ = writeln!(
            out,
            "{:<19}{}",
            "Reclaimable space:",
            summary.reclaimable_display.as_str().green().bold()
        );
    }

    if summary.errors > 0 {
        let _ = writeln!(
            out,
            "{}",
            format!("{} file(s) could not be read and were skipped.", summary.errors).red()
        );
    }
    if summary.warnings > 0 {
        let _ = writeln!(
            out,
            "{}",
            format!(
                "{} group(s) contain files of different sizes; check the log.",
                summary.warnings
            )
            .yellow()
        );
    }

    out
}
